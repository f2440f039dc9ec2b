//! Logging helpers shared across the workspace.

/// Logs an error that is fatal in debug builds.
///
/// Configuration errors and broken invariants go through here: release
/// builds log and carry on, debug builds stop at the call site.
#[macro_export]
macro_rules! dfatal {
    ($($arg:tt)+) => {{
        $crate::__log::error!($($arg)+);
        debug_assert!(false, $($arg)+);
    }};
}
