//! Pure math/data for Lullaby layout
//!
//! This crate contains the vector, rotation, transform and bounding box
//! types shared by the entity, layout and system crates.

mod geometry;
mod transform;
mod vector;

pub use geometry::*;
pub use transform::*;
pub use vector::*;

/// Degrees to radians conversion factor.
pub const DEGREES_TO_RADIANS: f32 = std::f32::consts::PI / 180.0;

pub mod prelude {
    pub use crate::geometry::Aabb;
    pub use crate::transform::{Quat, Sqt};
    pub use crate::vector::{Vec2, Vec3};
}
