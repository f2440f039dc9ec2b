//! Insert-index lookups against the positions of the last grid layout.

use crate::LayoutError;
use lullaby_core::dfatal;
use lullaby_math::{Vec2, Vec3};

/// Element midpoints recorded by [`crate::apply_layout`], ordered so that a
/// point can be mapped to the slot it would be inserted at.
///
/// Both axes are stored in increasing order: `secondary_positions` holds the
/// boundaries between consecutive rows, `primary_positions` holds one list of
/// `(midpoint, element index)` per row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CachedPositions {
    pub primary_positions: Vec<Vec<(f32, usize)>>,
    pub secondary_positions: Vec<f32>,
    pub is_horizontal_first: bool,
    pub is_inner_forward: bool,
}

impl CachedPositions {
    pub fn is_empty(&self) -> bool {
        self.primary_positions.is_empty()
    }

    pub fn clear(&mut self) {
        *self = CachedPositions::default();
    }
}

/// Index at which an element dropped at `local_position` would be inserted.
///
/// Returns 0 when nothing has been laid out yet.
pub fn calculate_insert_index_for_position(
    cached_positions: &CachedPositions,
    local_position: Vec3,
) -> usize {
    match try_calculate_insert_index_for_position(cached_positions, local_position) {
        Ok(index) => index,
        Err(err) => {
            dfatal!("{}", err);
            0
        }
    }
}

/// Fallible form of [`calculate_insert_index_for_position`].
pub fn try_calculate_insert_index_for_position(
    cached_positions: &CachedPositions,
    local_position: Vec3,
) -> Result<usize, LayoutError> {
    if cached_positions.is_empty() {
        return Ok(0);
    }
    let (outer, inner) = if cached_positions.is_horizontal_first {
        (local_position.y, local_position.x)
    } else {
        (local_position.x, local_position.y)
    };

    let outer_idx = cached_positions
        .secondary_positions
        .iter()
        .take_while(|boundary| outer > **boundary)
        .count();
    let Some(row) = cached_positions.primary_positions.get(outer_idx) else {
        return Err(LayoutError::InvalidCachedPositions {
            rows: cached_positions.primary_positions.len(),
            boundaries: cached_positions.secondary_positions.len(),
        });
    };

    let mut found = false;
    let mut index = 0;
    for &(midpoint, element) in row {
        index = element;
        if inner < midpoint {
            found = true;
            break;
        }
    }
    if found != cached_positions.is_inner_forward {
        index += 1;
    }
    Ok(index)
}

/// Fills a [`CachedPositions`] while elements are placed, in placement order.
pub(crate) struct CachedPositionsRecorder<'a> {
    target: Option<&'a mut CachedPositions>,
    horizontal_first: bool,
    current_outer: usize,
    started: bool,
    min: Vec2,
    max: Vec2,
}

impl<'a> CachedPositionsRecorder<'a> {
    pub(crate) fn new(
        target: Option<&'a mut CachedPositions>,
        horizontal_first: bool,
        inner_forward: bool,
        outer_count: usize,
        per_wrap: usize,
    ) -> Self {
        let target = target.map(|cached| {
            cached.secondary_positions.clear();
            cached.secondary_positions.reserve(outer_count);
            cached.primary_positions.clear();
            cached
                .primary_positions
                .resize_with(outer_count, || Vec::with_capacity(per_wrap));
            cached.is_horizontal_first = horizontal_first;
            cached.is_inner_forward = inner_forward;
            cached
        });
        Self {
            target,
            horizontal_first,
            current_outer: 0,
            started: false,
            min: Vec2::ZERO,
            max: Vec2::ZERO,
        }
    }

    /// Records one placed element's bounds in the layout's local space.
    pub(crate) fn record(&mut self, outer_idx: usize, index: usize, min: Vec2, max: Vec2) {
        let Some(cached) = self.target.as_deref_mut() else {
            return;
        };
        let Some(row) = cached.primary_positions.get_mut(outer_idx) else {
            dfatal!("Exceeded rows in primary positions: {}", outer_idx);
            return;
        };
        let midpoint = (min + max) * 0.5;
        row.push((
            if self.horizontal_first {
                midpoint.x
            } else {
                midpoint.y
            },
            index,
        ));

        // Rows run top to bottom, columns left to right: the boundary after a
        // row is its bottom edge, after a column its right edge.
        if outer_idx != self.current_outer {
            cached.secondary_positions.push(if self.horizontal_first {
                self.min.y
            } else {
                self.max.x
            });
            self.min = min;
            self.max = max;
        } else if self.started {
            self.min = self.min.min(min);
            self.max = self.max.max(max);
        } else {
            self.min = min;
            self.max = max;
        }
        self.started = true;
        self.current_outer = outer_idx;
    }

    /// Centers boundaries in the gaps and sorts both axes increasing.
    pub(crate) fn finish(self, spacing: Vec2) {
        let Some(cached) = self.target else {
            return;
        };
        if self.horizontal_first {
            for boundary in &mut cached.secondary_positions {
                *boundary -= spacing.y / 2.0;
            }
            cached.secondary_positions.reverse();
            cached.primary_positions.reverse();
        } else {
            for boundary in &mut cached.secondary_positions {
                *boundary += spacing.x / 2.0;
            }
            for row in &mut cached.primary_positions {
                row.reverse();
            }
            cached.is_inner_forward = !cached.is_inner_forward;
        }
    }
}
