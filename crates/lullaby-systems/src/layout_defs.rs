//! Pre-parsed layout definitions, as authored in entity blueprints.

use lullaby_layout::{FillOrder, HorizontalAlignment, LayoutParams, RadialLayoutParams, VerticalAlignment};
use lullaby_math::{Vec2, Vec3};
use web_time::Duration;

/// Grid layout definition.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutDef {
    pub canvas_size: Vec2,
    pub spacing: Vec2,
    pub fill_order: FillOrder,
    pub horizontal_alignment: HorizontalAlignment,
    pub vertical_alignment: VerticalAlignment,
    pub row_alignment: VerticalAlignment,
    pub column_alignment: HorizontalAlignment,
    pub elements_per_wrap: usize,
    pub shrink_to_fit: bool,
    /// Number of children to pad the layout to with `empty_blueprint`.
    pub max_elements: usize,
    /// Blueprint instantiated as placeholder children.
    pub empty_blueprint: Option<String>,
}

impl LayoutDef {
    pub fn params(&self) -> LayoutParams {
        LayoutParams {
            canvas_size: self.canvas_size,
            spacing: self.spacing,
            fill_order: self.fill_order,
            horizontal_alignment: self.horizontal_alignment,
            vertical_alignment: self.vertical_alignment,
            row_alignment: self.row_alignment,
            column_alignment: self.column_alignment,
            elements_per_wrap: self.elements_per_wrap,
            shrink_to_fit: self.shrink_to_fit,
        }
    }
}

/// Radial layout definition. A zero `degrees_per_element` keeps the default.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialLayoutDef {
    pub degrees_per_element: f32,
    pub major_axis: Vec3,
    pub minor_axis: Vec3,
    pub max_elements: usize,
    pub empty_blueprint: Option<String>,
}

impl Default for RadialLayoutDef {
    fn default() -> Self {
        let params = RadialLayoutParams::default();
        Self {
            degrees_per_element: 0.0,
            major_axis: params.major_axis,
            minor_axis: params.minor_axis,
            max_elements: 0,
            empty_blueprint: None,
        }
    }
}

impl RadialLayoutDef {
    pub fn params(&self) -> RadialLayoutParams {
        let mut params = RadialLayoutParams {
            major_axis: self.major_axis,
            minor_axis: self.minor_axis,
            ..RadialLayoutParams::default()
        };
        if self.degrees_per_element != 0.0 {
            params.degrees_per_element = self.degrees_per_element;
        }
        params
    }
}

/// Per-child layout participation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LayoutElementDef {
    pub horizontal_weight: f32,
    pub vertical_weight: f32,
    pub duration_ms: u64,
}

impl LayoutElementDef {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}
