//! Weighted resizing.
//!
//! Weighted elements share the space their fixed-size siblings leave free.
//! The primary axis is resolved per row. The secondary axis is resolved across
//! all rows at once: each row is as tall as its tallest fixed member or its
//! weighted share, whichever is larger, and a row whose share would be smaller
//! than its fixed members drops out of the weighting and the split restarts.

use crate::{DesiredSize, Grouping, LayoutElement, LayoutHost, LayoutParams};
use lullaby_core::Entity;
use lullaby_math::Vec3;

/// An element's weights and original size, split into the primary (inner)
/// and secondary (outer) axes.
#[derive(Clone, Copy, Debug)]
struct AxisWeights {
    weight: f32,
    size: f32,
    outer_weight: f32,
    outer_size: f32,
}

impl AxisWeights {
    fn new(horizontal_first: bool, element: &LayoutElement, size: Vec3) -> Self {
        if horizontal_first {
            Self {
                weight: element.horizontal_weight,
                size: size.x,
                outer_weight: element.vertical_weight,
                outer_size: size.y,
            }
        } else {
            Self {
                weight: element.vertical_weight,
                size: size.y,
                outer_weight: element.horizontal_weight,
                outer_size: size.x,
            }
        }
    }
}

/// Secondary-axis state of one row.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct RowExtent {
    weight: f32,
    size: f32,
    weighted_size: f32,
    pub(crate) all_hidden_by_weight: bool,
}

impl RowExtent {
    fn absorb(&mut self, member: &AxisWeights) {
        if member.outer_weight > 0.0 {
            self.weight = self.weight.max(member.outer_weight);
        } else {
            self.size = self.size.max(member.outer_size);
        }
    }

    fn desired_size(&self) -> f32 {
        self.size.max(self.weighted_size)
    }
}

fn accumulate(weight: f32, size: f32, total_weight: &mut f32, used_size: &mut f32) {
    if weight > 0.0 {
        *total_weight += weight;
    } else {
        *used_size += size;
    }
}

fn free_size_per_weight(
    used_size: f32,
    total_weight: f32,
    spacing: f32,
    canvas_size: f32,
    count: usize,
) -> f32 {
    let used_size = used_size + spacing * count.saturating_sub(1) as f32;
    (canvas_size - used_size).max(0.0) / total_weight
}

fn set_axis(desired: &mut DesiredSize, horizontal: bool, value: f32) {
    if horizontal {
        desired.x = Some(value);
    } else {
        desired.y = Some(value);
    }
}

/// Resolves weighted sizes into `desired` (one entry per element) and returns
/// the per-row secondary extents.
pub(crate) fn resolve_weights<H: LayoutHost + ?Sized>(
    host: &H,
    params: &LayoutParams,
    elements: &[LayoutElement],
    grouping: &Grouping,
    desired: &mut [DesiredSize],
) -> Vec<RowExtent> {
    let horizontal_first = params.fill_order.is_horizontal_first();
    let primary = params.fill_order.primary_axis();
    let secondary = params.fill_order.secondary_axis();
    let members: Vec<AxisWeights> = elements
        .iter()
        .map(|element| {
            AxisWeights::new(
                horizontal_first,
                element,
                host.original_box(element.entity).size(),
            )
        })
        .collect();

    let mut rows = vec![RowExtent::default(); grouping.outer_count()];
    resolve_primary(
        primary.main(params.spacing),
        primary.main(params.canvas_size),
        horizontal_first,
        grouping,
        &members,
        &mut rows,
        desired,
    );
    resolve_secondary(
        secondary.main(params.spacing),
        secondary.main(params.canvas_size),
        &mut rows,
    );

    for (outer_idx, row) in grouping.rows() {
        let extent = &mut rows[outer_idx];
        let mut any_showing = false;
        for index in row.indices() {
            if members[index].outer_weight > 0.0 {
                let size = extent.desired_size();
                set_axis(&mut desired[index], !horizontal_first, size);
                any_showing |= size > 0.0;
            } else {
                any_showing = true;
            }
        }
        extent.all_hidden_by_weight = !row.is_empty() && !any_showing;
    }
    rows
}

fn resolve_primary(
    spacing: f32,
    canvas_size: f32,
    horizontal_first: bool,
    grouping: &Grouping,
    members: &[AxisWeights],
    rows: &mut [RowExtent],
    desired: &mut [DesiredSize],
) {
    for (outer_idx, row) in grouping.rows() {
        let mut total_weight = 0.0;
        let mut used_size = 0.0;
        for index in row.indices() {
            let member = &members[index];
            rows[outer_idx].absorb(member);
            accumulate(member.weight, member.size, &mut total_weight, &mut used_size);
        }
        if total_weight <= 0.0 {
            continue;
        }
        let per_weight =
            free_size_per_weight(used_size, total_weight, spacing, canvas_size, row.len());
        for index in row.indices() {
            let weight = members[index].weight;
            if weight > 0.0 {
                set_axis(&mut desired[index], horizontal_first, weight * per_weight);
            }
        }
    }
}

fn resolve_secondary(spacing: f32, canvas_size: f32, rows: &mut [RowExtent]) {
    // Every pass that does not finish strips the weight from at least one
    // row, so the loop ends before running out of rows.
    for iteration in 0..=rows.len() {
        assert!(
            iteration < rows.len(),
            "weighted resize did not converge after {} iterations",
            rows.len()
        );

        let mut total_weight = 0.0;
        let mut used_size = 0.0;
        for row in rows.iter() {
            accumulate(row.weight, row.size, &mut total_weight, &mut used_size);
        }
        if total_weight == 0.0 {
            break;
        }

        let per_weight =
            free_size_per_weight(used_size, total_weight, spacing, canvas_size, rows.len());
        let mut undersized = false;
        let mut more_weight = false;
        for row in rows.iter_mut().filter(|row| row.weight > 0.0) {
            let candidate = row.weight * per_weight;
            if candidate < row.size {
                log::trace!("row share {} below fixed size {}, unweighting", candidate, row.size);
                row.weight = 0.0;
                row.weighted_size = row.size;
                undersized = true;
            } else {
                row.weighted_size = candidate;
                more_weight = true;
            }
        }
        if !undersized || !more_weight {
            break;
        }
    }
}

/// Hides elements sized to zero and hands the rest of the weighted elements
/// their new size.
pub(crate) fn apply_desired_sizes<H: LayoutHost + ?Sized>(
    host: &H,
    elements: &[LayoutElement],
    desired: &[DesiredSize],
    source: Entity,
) {
    for (element, desired) in elements.iter().zip(desired) {
        if desired.is_hidden() {
            log::trace!("no room for {}, disabling it", element.entity);
            host.set_enabled(element.entity, false);
        } else if element.is_weighted() {
            host.set_enabled(element.entity, true);
            if desired.is_changed() {
                host.set_desired_size(element.entity, source, *desired);
            }
        }
    }
}
