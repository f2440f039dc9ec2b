//! Layout contracts & placement algorithms for Lullaby
//!
//! [`apply_layout`] arranges an ordered list of [`LayoutElement`]s on a grid
//! described by [`LayoutParams`], resolving weighted sizes and reporting the
//! bounding box of the result. [`apply_radial_layout`] spreads entities on an
//! ellipse. Both talk to the rest of the world through small host traits so
//! they can run against real systems or test doubles.

mod alignment;
mod arrangement;
mod axis;
mod cached_positions;
mod error;
mod fill_order;
mod grid;
mod grouping;
mod params;
mod radial;
mod weights;

pub use alignment::*;
pub use arrangement::*;
pub use axis::*;
pub use cached_positions::*;
pub use error::*;
pub use fill_order::*;
pub use grid::*;
pub use grouping::*;
pub use params::*;
pub use radial::*;

pub mod prelude {
    pub use crate::alignment::{HorizontalAlignment, VerticalAlignment};
    pub use crate::cached_positions::{calculate_insert_index_for_position, CachedPositions};
    pub use crate::fill_order::FillOrder;
    pub use crate::grid::{apply_layout, LayoutHost};
    pub use crate::params::{DesiredSize, LayoutElement, LayoutParams, RadialLayoutParams};
    pub use crate::radial::{apply_radial_layout, RadialHost};
}
