//! Map and set aliases used for per-entity storage.
//!
//! `map` switches between the fx hasher and the std hasher with the
//! `std-hash` feature. `ordered` provides insertion-ordered maps for state
//! whose iteration order is observable, such as pending work queues.

#[cfg(feature = "std-hash")]
pub mod map {
    pub use std::collections::hash_map::Entry;
    pub use std::collections::{HashMap, HashSet};
}

#[cfg(not(feature = "std-hash"))]
pub mod map {
    pub use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
    pub use std::collections::hash_map::Entry;
}

pub mod ordered {
    #[cfg(feature = "std-hash")]
    pub type IndexMap<K, V> = indexmap::IndexMap<K, V>;

    #[cfg(not(feature = "std-hash"))]
    pub type IndexMap<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;

    pub use indexmap::map::Entry;
}
