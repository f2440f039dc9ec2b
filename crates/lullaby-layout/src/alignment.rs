//! Alignment utilities for positioning content

/// Alignment along the horizontal axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalAlignment {
    /// Align to the left edge.
    #[default]
    Left,
    /// Align to the horizontal center.
    Center,
    /// Align to the right edge.
    Right,
}

impl HorizontalAlignment {
    /// Computes the horizontal offset of `child` inside `available`.
    ///
    /// The result is not clamped, so content wider than the available space
    /// overflows on the side opposite to the alignment.
    pub fn align(&self, available: f32, child: f32) -> f32 {
        GroupAlignment::from(*self).offset(available - child)
    }

    pub fn name(self) -> &'static str {
        match self {
            HorizontalAlignment::Left => "Left",
            HorizontalAlignment::Center => "Center",
            HorizontalAlignment::Right => "Right",
        }
    }
}

/// Alignment along the vertical axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalAlignment {
    /// Align to the top edge.
    #[default]
    Top,
    /// Align to the vertical center.
    Center,
    /// Align to the bottom edge.
    Bottom,
}

impl VerticalAlignment {
    /// Computes the vertical offset of `child` inside `available`, measured
    /// downwards from the top edge. Not clamped.
    pub fn align(&self, available: f32, child: f32) -> f32 {
        GroupAlignment::from(*self).offset(available - child)
    }

    pub fn name(self) -> &'static str {
        match self {
            VerticalAlignment::Top => "Top",
            VerticalAlignment::Center => "Center",
            VerticalAlignment::Bottom => "Bottom",
        }
    }
}

/// Axis-agnostic alignment used by [`crate::LayoutGroup`] on its cross axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GroupAlignment {
    #[default]
    Start,
    Center,
    End,
}

impl GroupAlignment {
    /// Offset for a child given the leftover `space` (group minus child).
    pub fn offset(self, space: f32) -> f32 {
        match self {
            GroupAlignment::Start => 0.0,
            GroupAlignment::Center => space / 2.0,
            GroupAlignment::End => space,
        }
    }
}

impl From<HorizontalAlignment> for GroupAlignment {
    fn from(alignment: HorizontalAlignment) -> Self {
        match alignment {
            HorizontalAlignment::Left => GroupAlignment::Start,
            HorizontalAlignment::Center => GroupAlignment::Center,
            HorizontalAlignment::Right => GroupAlignment::End,
        }
    }
}

impl From<VerticalAlignment> for GroupAlignment {
    fn from(alignment: VerticalAlignment) -> Self {
        match alignment {
            VerticalAlignment::Top => GroupAlignment::Start,
            VerticalAlignment::Center => GroupAlignment::Center,
            VerticalAlignment::Bottom => GroupAlignment::End,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alignment_offsets_are_unclamped() {
        assert_eq!(HorizontalAlignment::Left.align(3.0, 5.0), 0.0);
        assert_eq!(HorizontalAlignment::Center.align(3.0, 5.0), -1.0);
        assert_eq!(HorizontalAlignment::Right.align(3.0, 5.0), -2.0);
        assert_eq!(VerticalAlignment::Bottom.align(4.0, 1.0), 3.0);
    }
}
