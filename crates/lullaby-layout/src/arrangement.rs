//! Two-pass group arrangement: measure a tree of nested groups, then place it.
//!
//! A [`LayoutGroup`] stacks its children along its main axis and aligns each
//! one on its cross axis. Coordinates are top-left based with y growing
//! downwards; converting to centered, y-up space is the caller's job.
//!
//! Measuring follows a stacking rule with one quirk: spacing is only charged
//! once something with a non-zero extent has been stacked, so a zero-sized
//! first child adds no gap. Placing always advances by child size plus
//! spacing.

use crate::{Axis, GroupAlignment};
use lullaby_math::Vec2;

/// A node in an arrangement tree: a sized leaf carrying a caller tag, or a
/// nested group.
#[derive(Clone, Debug)]
pub enum LayoutNode<T> {
    Leaf { size: Vec2, tag: T },
    Group(LayoutGroup<T>),
}

impl<T> LayoutNode<T> {
    /// Measured size. Groups report zero until measured.
    pub fn size(&self) -> Vec2 {
        match self {
            LayoutNode::Leaf { size, .. } => *size,
            LayoutNode::Group(group) => group.size,
        }
    }

    fn measure(&mut self) -> Vec2 {
        match self {
            LayoutNode::Leaf { size, .. } => *size,
            LayoutNode::Group(group) => group.measure(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct LayoutGroup<T> {
    direction: Axis,
    alignment: GroupAlignment,
    spacing: f32,
    children: Vec<LayoutNode<T>>,
    size: Vec2,
}

impl<T> LayoutGroup<T> {
    pub fn new(direction: Axis, alignment: GroupAlignment, spacing: f32) -> Self {
        Self {
            direction,
            alignment,
            spacing,
            children: Vec::new(),
            size: Vec2::ZERO,
        }
    }

    pub fn direction(&self) -> Axis {
        self.direction
    }

    pub fn push_leaf(&mut self, size: Vec2, tag: T) {
        self.children.push(LayoutNode::Leaf { size, tag });
    }

    pub fn push_group(&mut self, group: LayoutGroup<T>) {
        self.children.push(LayoutNode::Group(group));
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Measured size from the last [`LayoutGroup::measure`].
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Measures the subtree bottom-up and returns this group's size.
    pub fn measure(&mut self) -> Vec2 {
        let axis = self.direction;
        let mut main = 0.0f32;
        let mut cross = 0.0f32;
        for child in &mut self.children {
            let extent = child.measure();
            let gap = if main != 0.0 { self.spacing } else { 0.0 };
            main += axis.main(extent) + gap;
            cross = cross.max(axis.cross(extent));
        }
        self.size = axis.pack(main, cross);
        self.size
    }

    /// Places the measured subtree with this group's corner at `origin`,
    /// calling `visit(tag, position, size)` for every leaf in tree order.
    pub fn place<F>(&self, origin: Vec2, visit: &mut F)
    where
        F: FnMut(&T, Vec2, Vec2),
    {
        let axis = self.direction;
        let mut cursor = 0.0f32;
        for child in &self.children {
            let child_size = child.size();
            let cross_offset = self
                .alignment
                .offset(axis.cross(self.size) - axis.cross(child_size));
            let position = origin + axis.pack(cursor, cross_offset);
            match child {
                LayoutNode::Leaf { tag, size } => visit(tag, position, *size),
                LayoutNode::Group(group) => group.place(position, visit),
            }
            cursor += axis.main(child_size) + self.spacing;
        }
    }

    /// Measures, then places the tree with its corner at the origin.
    pub fn arrange<F>(&mut self, mut visit: F)
    where
        F: FnMut(&T, Vec2, Vec2),
    {
        self.measure();
        self.place(Vec2::ZERO, &mut visit);
    }
}

#[cfg(test)]
#[path = "tests/arrangement_tests.rs"]
mod tests;
