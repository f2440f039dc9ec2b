//! Layout systems for Lullaby: box negotiation and dirty-layout scheduling.

mod desired_size_forwarder;
mod layout_box_system;
mod layout_defs;
mod layout_events;
mod layout_system;

pub use desired_size_forwarder::DesiredSizeForwarder;
pub use layout_box_system::LayoutBoxSystem;
pub use layout_defs::{LayoutDef, LayoutElementDef, RadialLayoutDef};
pub use layout_events::{
    ActualBoxChangedEvent, DesiredSizeChangedEvent, LayoutChangedEvent, OriginalBoxChangedEvent,
};
pub use layout_system::{DirtyLayout, LayoutPass, LayoutSystem, PositionAnimator};

pub mod prelude {
    pub use crate::layout_box_system::LayoutBoxSystem;
    pub use crate::layout_defs::{LayoutDef, LayoutElementDef, RadialLayoutDef};
    pub use crate::layout_events::*;
    pub use crate::layout_system::{LayoutSystem, PositionAnimator};
    pub use lullaby_layout::prelude::*;
}
