//! Events of the box negotiation protocol.
//!
//! Every event is sent to its `target` entity, so it reaches both global
//! handlers and handlers connected to that entity.

use lullaby_core::Entity;

/// Sent (deferred) after [`crate::LayoutBoxSystem::set_original_box`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OriginalBoxChangedEvent {
    pub target: Entity,
}

/// Sent immediately after [`crate::LayoutBoxSystem::set_desired_size`], so
/// a client can resize before the layout that asked reads its actual box.
///
/// `source` is the entity at the root of the change; `None` axes are left
/// alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DesiredSizeChangedEvent {
    pub target: Entity,
    pub source: Entity,
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

/// Sent (deferred) after [`crate::LayoutBoxSystem::set_actual_box`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActualBoxChangedEvent {
    pub target: Entity,
    pub source: Entity,
}

/// Sent (deferred) every time a layout has been recomputed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutChangedEvent {
    pub target: Entity,
}
