//! Partitioning of an element list into rows (or columns).

use crate::FillOrder;

/// Splits `len` elements into groups of `elements_per_wrap`, in the
/// traversal order of a [`FillOrder`].
///
/// Group `g` always holds the contiguous slice starting at
/// `g * elements_per_wrap`. The fill order only changes the order in which
/// groups, and the members inside a group, are visited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Grouping {
    fill_order: FillOrder,
    per_wrap: usize,
    outer_count: usize,
    len: usize,
}

impl Grouping {
    pub fn new(fill_order: FillOrder, elements_per_wrap: usize, len: usize) -> Self {
        let per_wrap = if elements_per_wrap > 0 {
            elements_per_wrap
        } else {
            len
        };
        let outer_count = if per_wrap == 0 {
            len
        } else {
            len.div_ceil(per_wrap)
        };
        Self {
            fill_order,
            per_wrap,
            outer_count,
            len,
        }
    }

    pub fn per_wrap(&self) -> usize {
        self.per_wrap
    }

    /// Number of rows (or columns).
    pub fn outer_count(&self) -> usize {
        self.outer_count
    }

    /// The group visited at position `outer_idx`.
    pub fn row(&self, outer_idx: usize) -> RowRange {
        debug_assert!(outer_idx < self.outer_count);
        let index = if self.fill_order.is_outer_forward() {
            outer_idx
        } else {
            self.outer_count - 1 - outer_idx
        };
        let start = index * self.per_wrap;
        let end = ((index + 1) * self.per_wrap).min(self.len);
        RowRange {
            start,
            size: end.saturating_sub(start),
            forward: self.fill_order.is_inner_forward(),
        }
    }

    /// Every group in visiting order, paired with its visiting position.
    pub fn rows(&self) -> impl Iterator<Item = (usize, RowRange)> + '_ {
        (0..self.outer_count).map(move |outer_idx| (outer_idx, self.row(outer_idx)))
    }
}

/// One row (or column) of a [`Grouping`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub size: usize,
    forward: bool,
}

impl RowRange {
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Element index of the `i`th member in visiting order.
    pub fn index(&self, i: usize) -> usize {
        debug_assert!(i < self.size);
        if self.forward {
            self.start + i
        } else {
            self.start + self.size - 1 - i
        }
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.size).map(move |i| self.index(i))
    }
}
