//! Testing utilities and harness for Lullaby layout

pub mod assertions;
pub mod recorder;
pub mod world;

pub use assertions::*;
pub use recorder::EventRecorder;
pub use world::LayoutWorld;

pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::recorder::EventRecorder;
    pub use crate::world::LayoutWorld;
}
