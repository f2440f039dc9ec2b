//! The eight grid traversal orders.

use crate::Axis;
use std::fmt;

/// Order in which elements fill the grid.
///
/// The first word is the primary direction, the one elements follow inside a
/// row (or column). The second word is the secondary direction, the one rows
/// (or columns) follow each other in. `RightDown` reads like text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FillOrder {
    #[default]
    RightDown,
    LeftDown,
    RightUp,
    LeftUp,
    DownRight,
    DownLeft,
    UpRight,
    UpLeft,
}

impl FillOrder {
    pub const ALL: [FillOrder; 8] = [
        FillOrder::RightDown,
        FillOrder::LeftDown,
        FillOrder::RightUp,
        FillOrder::LeftUp,
        FillOrder::DownRight,
        FillOrder::DownLeft,
        FillOrder::UpRight,
        FillOrder::UpLeft,
    ];

    /// True if rows run horizontally (`Right*` and `Left*`).
    pub fn is_horizontal_first(self) -> bool {
        matches!(
            self,
            FillOrder::RightDown | FillOrder::LeftDown | FillOrder::RightUp | FillOrder::LeftUp
        )
    }

    pub fn primary_axis(self) -> Axis {
        if self.is_horizontal_first() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }

    pub fn secondary_axis(self) -> Axis {
        self.primary_axis().cross_axis()
    }

    /// True if the primary direction is right or down.
    pub fn is_inner_forward(self) -> bool {
        matches!(
            self,
            FillOrder::RightDown | FillOrder::RightUp | FillOrder::DownRight | FillOrder::DownLeft
        )
    }

    /// True if the secondary direction is right or down.
    pub fn is_outer_forward(self) -> bool {
        matches!(
            self,
            FillOrder::RightDown | FillOrder::LeftDown | FillOrder::DownRight | FillOrder::UpRight
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            FillOrder::RightDown => "RightDown",
            FillOrder::LeftDown => "LeftDown",
            FillOrder::RightUp => "RightUp",
            FillOrder::LeftUp => "LeftUp",
            FillOrder::DownRight => "DownRight",
            FillOrder::DownLeft => "DownLeft",
            FillOrder::UpRight => "UpRight",
            FillOrder::UpLeft => "UpLeft",
        }
    }

    /// Looks a fill order up by its [`FillOrder::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|order| order.name() == name)
    }
}

impl fmt::Display for FillOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
