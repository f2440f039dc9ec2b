//! Grid placement.
//!
//! Elements are arranged in a tree of [`LayoutGroup`]s:
//!
//! ```text
//! outermost (primary direction, whole-grid alignment on the secondary axis)
//! ├── anchor group holding a zero-width leaf as tall as the canvas
//! └── outer group (secondary direction, whole-grid alignment on the primary axis)
//!     ├── anchor group holding a zero-height leaf as wide as the canvas
//!     └── one inner group per row (primary direction, row/column alignment)
//! ```
//!
//! The two anchor leaves span the canvas on each axis, so where they end up
//! tells where the canvas itself was aligned. Every element is re-origined
//! against them, which keeps overflowing content aligned to the canvas rather
//! than to its own extent.

use crate::arrangement::LayoutGroup;
use crate::cached_positions::CachedPositionsRecorder;
use crate::weights::{apply_desired_sizes, resolve_weights, RowExtent};
use crate::{
    Axis, CachedPositions, DesiredSize, GroupAlignment, Grouping, LayoutElement, LayoutParams,
};
use lullaby_core::Entity;
use lullaby_math::{Aabb, Vec2};

/// Everything [`apply_layout`] needs from the world around it.
pub trait LayoutHost {
    /// The box the entity asks for before any layout shrinks it.
    fn original_box(&self, entity: Entity) -> Aabb;
    /// The box the entity currently occupies.
    fn actual_box(&self, entity: Entity) -> Aabb;
    /// Imposes a per-axis size on `entity` on behalf of `source`.
    fn set_desired_size(&self, entity: Entity, source: Entity, desired: DesiredSize);
    fn set_enabled(&self, entity: Entity, enabled: bool);
    /// Moves the entity's local origin to `position`.
    fn set_position(&self, entity: Entity, position: Vec2);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Slot {
    AnchorX,
    AnchorY,
    Element { outer_idx: usize, index: usize },
}

impl Slot {
    fn anchor(axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => Slot::AnchorX,
            Axis::Vertical => Slot::AnchorY,
        }
    }
}

/// Arranges `elements` according to `params` and returns the bounds of the
/// result in the layout's local space.
///
/// Weighted resizing only runs when `desired_source` is not null; resized
/// elements receive their desired size with that entity as the source.
/// When `cached_positions` is given it is rebuilt for
/// [`crate::calculate_insert_index_for_position`].
pub fn apply_layout<H: LayoutHost + ?Sized>(
    host: &H,
    params: &LayoutParams,
    elements: &[LayoutElement],
    desired_source: Entity,
    cached_positions: Option<&mut CachedPositions>,
) -> Aabb {
    // Without shrinking the result covers at least the canvas.
    let mut bounds = (!params.shrink_to_fit)
        .then(|| (params.canvas_size * -0.5, params.canvas_size * 0.5));

    if elements.is_empty() {
        if let Some(cached) = cached_positions {
            cached.clear();
        }
        let (min, max) = bounds.unwrap_or((Vec2::ZERO, Vec2::ZERO));
        return Aabb::from_xy(min, max);
    }

    let grouping = Grouping::new(params.fill_order, params.elements_per_wrap, elements.len());
    let mut desired = vec![DesiredSize::UNCHANGED; elements.len()];
    let mut rows = vec![RowExtent::default(); grouping.outer_count()];
    if !desired_source.is_null() {
        rows = resolve_weights(host, params, elements, &grouping, &mut desired);
        // Desired sizes are delivered immediately, so clients that resize
        // synchronously are measured at their new size below.
        apply_desired_sizes(host, elements, &desired, desired_source);
    }

    let horizontal_first = params.fill_order.is_horizontal_first();
    let mut tree = build_tree(host, params, elements, &grouping, &rows, &desired);
    let mut recorder = CachedPositionsRecorder::new(
        cached_positions,
        horizontal_first,
        params.fill_order.is_inner_forward(),
        grouping.outer_count(),
        grouping.per_wrap(),
    );

    let half_canvas = params.canvas_size * 0.5;
    let mut anchor = Vec2::ZERO;
    tree.arrange(|slot, position, size| match *slot {
        Slot::AnchorX => anchor.x = position.x,
        Slot::AnchorY => anchor.y = position.y,
        Slot::Element { outer_idx, index } => {
            let half_size = size * 0.5;
            // Corner-anchored, y-down to centered, y-up.
            let mut center = Vec2::new(
                position.x + half_size.x - half_canvas.x - anchor.x,
                -position.y - half_size.y + half_canvas.y + anchor.y,
            );
            // The anchor group charges one gap ahead of the first row.
            if horizontal_first {
                center.y += params.spacing.y;
            } else {
                center.x -= params.spacing.x;
            }

            let min = center - half_size;
            let max = center + half_size;
            recorder.record(outer_idx, index, min, max);
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(min), hi.max(max)),
                None => (min, max),
            });

            let entity = elements[index].entity;
            let offset = host.actual_box(entity).center();
            host.set_position(entity, center - offset.xy());
        }
    });
    recorder.finish(params.spacing);

    let (min, max) = bounds.unwrap_or((Vec2::ZERO, Vec2::ZERO));
    Aabb::from_xy(min, max)
}

fn build_tree<H: LayoutHost + ?Sized>(
    host: &H,
    params: &LayoutParams,
    elements: &[LayoutElement],
    grouping: &Grouping,
    rows: &[RowExtent],
    desired: &[DesiredSize],
) -> LayoutGroup<Slot> {
    let primary = params.fill_order.primary_axis();
    let secondary = primary.cross_axis();
    let horizontal = GroupAlignment::from(params.horizontal_alignment);
    let vertical = GroupAlignment::from(params.vertical_alignment);
    let (outermost_alignment, outer_alignment, inner_alignment) = if primary.is_horizontal() {
        (vertical, horizontal, GroupAlignment::from(params.row_alignment))
    } else {
        (horizontal, vertical, GroupAlignment::from(params.column_alignment))
    };
    let outer_group = || LayoutGroup::new(secondary, outer_alignment, secondary.main(params.spacing));
    let inner_group = || LayoutGroup::new(primary, inner_alignment, primary.main(params.spacing));

    let mut secondary_anchor = outer_group();
    secondary_anchor.push_leaf(
        secondary.pack(secondary.main(params.canvas_size), 0.0),
        Slot::anchor(secondary),
    );

    let mut primary_anchor = inner_group();
    primary_anchor.push_leaf(
        primary.pack(primary.main(params.canvas_size), 0.0),
        Slot::anchor(primary),
    );

    let mut outer = outer_group();
    outer.push_group(primary_anchor);
    for (outer_idx, row) in grouping.rows() {
        if row.is_empty() || rows[outer_idx].all_hidden_by_weight {
            continue;
        }
        let mut group = inner_group();
        for index in row.indices() {
            if desired[index].is_hidden() {
                continue;
            }
            let size = host.actual_box(elements[index].entity).size();
            group.push_leaf(
                Vec2::new(size.x, size.y),
                Slot::Element { outer_idx, index },
            );
        }
        outer.push_group(group);
    }

    let mut outermost = LayoutGroup::new(primary, outermost_alignment, 0.0);
    outermost.push_group(secondary_anchor);
    outermost.push_group(outer);
    outermost
}

#[cfg(test)]
#[path = "tests/grid_tests.rs"]
mod tests;
