//! Layout configuration and per-element participation data.

use crate::{FillOrder, HorizontalAlignment, VerticalAlignment};
use lullaby_core::Entity;
use lullaby_math::{Vec2, Vec3};
use web_time::Duration;

/// Configuration for one grid layout node.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutParams {
    /// Nominal bounds of the layout, centered on the node's origin.
    pub canvas_size: Vec2,
    /// Gap between cells.
    pub spacing: Vec2,
    pub fill_order: FillOrder,
    /// Alignment of the whole grid within the canvas.
    pub horizontal_alignment: HorizontalAlignment,
    /// Alignment of the whole grid within the canvas.
    pub vertical_alignment: VerticalAlignment,
    /// Alignment of elements within a row, for horizontal-first fill orders.
    pub row_alignment: VerticalAlignment,
    /// Alignment of elements within a column, for vertical-first fill orders.
    pub column_alignment: HorizontalAlignment,
    /// Elements per row (or column). 0 keeps every element in one row.
    pub elements_per_wrap: usize,
    /// Report the bounds of the placed content instead of the canvas.
    pub shrink_to_fit: bool,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            canvas_size: Vec2::ZERO,
            spacing: Vec2::ZERO,
            fill_order: FillOrder::RightDown,
            horizontal_alignment: HorizontalAlignment::Left,
            vertical_alignment: VerticalAlignment::Top,
            row_alignment: VerticalAlignment::Top,
            column_alignment: HorizontalAlignment::Left,
            elements_per_wrap: 0,
            shrink_to_fit: false,
        }
    }
}

/// Configuration for an elliptical layout node.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialLayoutParams {
    pub degrees_per_element: f32,
    pub major_axis: Vec3,
    pub minor_axis: Vec3,
}

impl RadialLayoutParams {
    pub const DEFAULT_DEGREES_PER_ELEMENT: f32 = 45.0;
}

impl Default for RadialLayoutParams {
    fn default() -> Self {
        Self {
            degrees_per_element: Self::DEFAULT_DEGREES_PER_ELEMENT,
            major_axis: Vec3::new(1.0, 0.0, 0.0),
            minor_axis: Vec3::new(0.0, 1.0, 0.0),
        }
    }
}

/// How one child takes part in a grid layout.
///
/// A weight above zero makes the element flexible along that axis: it takes
/// a share of the space its fixed-size siblings leave over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutElement {
    pub entity: Entity,
    pub horizontal_weight: f32,
    pub vertical_weight: f32,
    /// Length of the tween used when the element moves after its first
    /// placement. Zero snaps.
    pub duration: Duration,
}

impl LayoutElement {
    pub fn new(entity: Entity) -> Self {
        Self {
            entity,
            horizontal_weight: 0.0,
            vertical_weight: 0.0,
            duration: Duration::ZERO,
        }
    }

    pub fn with_weights(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal_weight = horizontal;
        self.vertical_weight = vertical;
        self
    }

    pub fn is_weighted(&self) -> bool {
        self.horizontal_weight > 0.0 || self.vertical_weight > 0.0
    }
}

impl From<Entity> for LayoutElement {
    fn from(entity: Entity) -> Self {
        Self::new(entity)
    }
}

/// Per-axis size imposed on an entity by a parent layout. `None` leaves that
/// axis as it is; `Some(0.0)` hides the entity.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DesiredSize {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl DesiredSize {
    pub const UNCHANGED: DesiredSize = DesiredSize {
        x: None,
        y: None,
        z: None,
    };

    pub const fn new(x: Option<f32>, y: Option<f32>, z: Option<f32>) -> Self {
        Self { x, y, z }
    }

    /// True if any axis was explicitly set to exactly zero.
    pub fn is_hidden(&self) -> bool {
        [self.x, self.y, self.z].contains(&Some(0.0))
    }

    /// True if any axis is set.
    pub fn is_changed(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some()
    }
}
