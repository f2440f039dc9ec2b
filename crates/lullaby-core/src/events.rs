//! Structural events emitted by the transform system.

use crate::Entity;

/// Sent (deferred) when `target` moves from `old_parent` to `new_parent`.
///
/// A destroyed entity reports a null `new_parent`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParentChangedEvent {
    pub target: Entity,
    pub old_parent: Entity,
    pub new_parent: Entity,
}

/// Sent (deferred) whenever an entity's bounding box is assigned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AabbChangedEvent {
    pub target: Entity,
}
