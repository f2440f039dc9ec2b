//! Core runtime for Lullaby: entities, events and the scene graph
//!
//! The layout crates only see entities through the types re-exported here:
//! the [`Dispatcher`] that carries every event, the [`TransformSystem`] that
//! owns parent/child links and bounding boxes, and the [`EntityFactory`]
//! that creates and destroys entities.

pub mod collections;
mod dispatcher;
mod entity;
mod entity_factory;
pub mod events;
mod logging;
mod transform_system;

pub use dispatcher::*;
pub use entity::*;
pub use entity_factory::*;
pub use events::*;
pub use transform_system::*;

#[doc(hidden)]
pub use log as __log;

pub mod prelude {
    pub use crate::dispatcher::{DispatchMode, Dispatcher};
    pub use crate::entity::Entity;
    pub use crate::entity_factory::{EntityFactory, System};
    pub use crate::events::{AabbChangedEvent, ParentChangedEvent};
    pub use crate::transform_system::TransformSystem;
}
