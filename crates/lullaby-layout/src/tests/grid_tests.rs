use super::*;
use crate::{calculate_insert_index_for_position, FillOrder, HorizontalAlignment, VerticalAlignment};
use lullaby_math::Vec3;
use std::cell::RefCell;
use std::collections::HashMap;

const PARENT: Entity = Entity(123);
const EPSILON: f32 = 1e-4;

/// Host whose clients resize synchronously: a desired size immediately
/// becomes the actual box, the way a text or quad system would react.
#[derive(Default)]
struct MockHost {
    original: RefCell<HashMap<Entity, Aabb>>,
    actual: RefCell<HashMap<Entity, Aabb>>,
    desired: RefCell<HashMap<Entity, DesiredSize>>,
    enabled: RefCell<HashMap<Entity, bool>>,
    positions: RefCell<HashMap<Entity, Vec2>>,
    desired_calls: RefCell<usize>,
}

impl MockHost {
    fn with_children(count: u32) -> (Self, Vec<Entity>) {
        let host = MockHost::default();
        let children: Vec<Entity> = (1..=count).map(Entity).collect();
        for &child in &children {
            host.resize(child, 1.0, 1.0);
        }
        (host, children)
    }

    fn resize(&self, entity: Entity, x: f32, y: f32) {
        let aabb = Aabb::from_size(Vec3::new(x, y, 0.0));
        self.original.borrow_mut().insert(entity, aabb);
        self.actual.borrow_mut().insert(entity, aabb);
    }

    fn position(&self, entity: Entity) -> Vec2 {
        self.positions
            .borrow()
            .get(&entity)
            .copied()
            .unwrap_or(Vec2::ZERO)
    }

    fn desired(&self, entity: Entity) -> DesiredSize {
        self.desired
            .borrow()
            .get(&entity)
            .copied()
            .unwrap_or(DesiredSize::UNCHANGED)
    }

    fn is_enabled(&self, entity: Entity) -> bool {
        self.enabled.borrow().get(&entity).copied().unwrap_or(true)
    }
}

impl LayoutHost for MockHost {
    fn original_box(&self, entity: Entity) -> Aabb {
        self.original
            .borrow()
            .get(&entity)
            .copied()
            .unwrap_or(Aabb::ZERO)
    }

    fn actual_box(&self, entity: Entity) -> Aabb {
        self.actual
            .borrow()
            .get(&entity)
            .copied()
            .unwrap_or(Aabb::ZERO)
    }

    fn set_desired_size(&self, entity: Entity, _source: Entity, desired: DesiredSize) {
        *self.desired_calls.borrow_mut() += 1;
        self.desired.borrow_mut().insert(entity, desired);
        let mut size = self.original_box(entity).size();
        size.x = desired.x.unwrap_or(size.x);
        size.y = desired.y.unwrap_or(size.y);
        size.z = desired.z.unwrap_or(size.z);
        self.actual
            .borrow_mut()
            .insert(entity, Aabb::from_size(size));
    }

    fn set_enabled(&self, entity: Entity, enabled: bool) {
        self.enabled.borrow_mut().insert(entity, enabled);
    }

    fn set_position(&self, entity: Entity, position: Vec2) {
        self.positions.borrow_mut().insert(entity, position);
    }
}

fn elements(children: &[Entity]) -> Vec<LayoutElement> {
    children.iter().copied().map(LayoutElement::new).collect()
}

fn grid(fill_order: FillOrder, canvas: (f32, f32), per_wrap: usize) -> LayoutParams {
    LayoutParams {
        fill_order,
        canvas_size: Vec2::new(canvas.0, canvas.1),
        elements_per_wrap: per_wrap,
        ..LayoutParams::default()
    }
}

fn assert_positions(host: &MockHost, children: &[Entity], expected: &[(f32, f32)]) {
    assert_eq!(children.len(), expected.len());
    for (i, (child, &(x, y))) in children.iter().zip(expected).enumerate() {
        let position = host.position(*child);
        assert!(
            (position.x - x).abs() < EPSILON && (position.y - y).abs() < EPSILON,
            "child {i}: expected ({x}, {y}), got ({}, {})",
            position.x,
            position.y
        );
    }
}

fn layout_and_check(params: &LayoutParams, count: u32, expected: &[(f32, f32)]) {
    let (host, children) = MockHost::with_children(count);
    apply_layout(&host, params, &elements(&children), Entity::NULL, None);
    assert_positions(&host, &children, expected);
}

#[test]
fn spacing_right_down() {
    let mut params = grid(FillOrder::RightDown, (7.0, 1.0), 0);
    params.spacing = Vec2::new(2.0, 2.0);
    layout_and_check(&params, 3, &[(-3.0, 0.0), (0.0, 0.0), (3.0, 0.0)]);
}

#[test]
fn spacing_left_down_mirrors_right_down() {
    let mut params = grid(FillOrder::LeftDown, (7.0, 1.0), 0);
    params.spacing = Vec2::new(2.0, 2.0);
    layout_and_check(&params, 3, &[(3.0, 0.0), (0.0, 0.0), (-3.0, 0.0)]);
}

#[test]
fn spacing_down_right() {
    let mut params = grid(FillOrder::DownRight, (7.0, 1.0), 0);
    params.spacing = Vec2::new(0.0, 2.0);
    layout_and_check(&params, 3, &[(-3.0, 0.0), (-3.0, -3.0), (-3.0, -6.0)]);
}

#[test]
fn fill_orders_in_a_three_by_three_canvas() {
    let cases: [(FillOrder, HorizontalAlignment, [(f32, f32); 5]); 10] = [
        (
            FillOrder::RightDown,
            HorizontalAlignment::Left,
            [(-1.0, 1.0), (0.0, 1.0), (1.0, 1.0), (-1.0, 0.0), (0.0, 0.0)],
        ),
        (
            FillOrder::LeftDown,
            HorizontalAlignment::Left,
            [(1.0, 1.0), (0.0, 1.0), (-1.0, 1.0), (0.0, 0.0), (-1.0, 0.0)],
        ),
        (
            FillOrder::RightDown,
            HorizontalAlignment::Center,
            [(-1.0, 1.0), (0.0, 1.0), (1.0, 1.0), (-0.5, 0.0), (0.5, 0.0)],
        ),
        (
            FillOrder::RightDown,
            HorizontalAlignment::Right,
            [(-1.0, 1.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0), (1.0, 0.0)],
        ),
        (
            FillOrder::DownRight,
            HorizontalAlignment::Left,
            [(-1.0, 1.0), (-1.0, 0.0), (-1.0, -1.0), (0.0, 1.0), (0.0, 0.0)],
        ),
        (
            FillOrder::DownRight,
            HorizontalAlignment::Right,
            [(0.0, 1.0), (0.0, 0.0), (0.0, -1.0), (1.0, 1.0), (1.0, 0.0)],
        ),
        (
            FillOrder::DownLeft,
            HorizontalAlignment::Left,
            [(0.0, 1.0), (0.0, 0.0), (0.0, -1.0), (-1.0, 1.0), (-1.0, 0.0)],
        ),
        (
            FillOrder::RightUp,
            HorizontalAlignment::Left,
            [(-1.0, 0.0), (0.0, 0.0), (1.0, 0.0), (-1.0, 1.0), (0.0, 1.0)],
        ),
        (
            FillOrder::LeftUp,
            HorizontalAlignment::Left,
            [(1.0, 0.0), (0.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (-1.0, 1.0)],
        ),
        (
            FillOrder::UpRight,
            HorizontalAlignment::Left,
            [(-1.0, -1.0), (-1.0, 0.0), (-1.0, 1.0), (0.0, 0.0), (0.0, 1.0)],
        ),
    ];
    for (fill_order, horizontal_alignment, expected) in cases {
        let params = LayoutParams {
            horizontal_alignment,
            ..grid(fill_order, (3.0, 3.0), 3)
        };
        layout_and_check(&params, 5, &expected);
    }

    layout_and_check(
        &grid(FillOrder::UpLeft, (3.0, 3.0), 3),
        5,
        &[(0.0, -1.0), (0.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (-1.0, 1.0)],
    );
}

#[test]
fn center_alignment_centers_rows_and_members() {
    let (host, children) = MockHost::with_children(2);
    host.resize(children[1], 2.0, 2.0);
    let params = LayoutParams {
        vertical_alignment: VerticalAlignment::Center,
        horizontal_alignment: HorizontalAlignment::Center,
        row_alignment: VerticalAlignment::Center,
        ..grid(FillOrder::RightDown, (3.0, 3.0), 0)
    };
    apply_layout(&host, &params, &elements(&children), Entity::NULL, None);
    assert_positions(&host, &children, &[(-1.0, 0.0), (0.5, 0.0)]);
}

#[test]
fn bottom_aligned_columns() {
    let params = LayoutParams {
        vertical_alignment: VerticalAlignment::Bottom,
        ..grid(FillOrder::DownRight, (5.0, 3.0), 3)
    };
    layout_and_check(
        &params,
        5,
        &[(-2.0, 1.0), (-2.0, 0.0), (-2.0, -1.0), (-1.0, 0.0), (-1.0, -1.0)],
    );
}

#[test]
fn column_alignment_places_narrow_members() {
    for (column_alignment, first_x) in [
        (HorizontalAlignment::Left, -1.0),
        (HorizontalAlignment::Right, 1.0),
    ] {
        let (host, children) = MockHost::with_children(2);
        host.resize(children[1], 3.0, 3.0);
        let params = LayoutParams {
            column_alignment,
            ..grid(FillOrder::DownRight, (3.0, 5.0), 2)
        };
        apply_layout(&host, &params, &elements(&children), Entity::NULL, None);
        assert_positions(&host, &children, &[(first_x, 2.0), (0.0, 0.0)]);
    }
}

#[test]
fn overflow_stays_aligned_to_the_canvas() {
    let params = LayoutParams {
        vertical_alignment: VerticalAlignment::Bottom,
        horizontal_alignment: HorizontalAlignment::Right,
        ..grid(FillOrder::UpLeft, (3.0, 3.0), 4)
    };
    layout_and_check(
        &params,
        13,
        &[
            (1.0, -1.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (1.0, 2.0),
            (0.0, -1.0),
            (0.0, 0.0),
            (0.0, 1.0),
            (0.0, 2.0),
            (-1.0, -1.0),
            (-1.0, 0.0),
            (-1.0, 1.0),
            (-1.0, 2.0),
            (-2.0, -1.0),
        ],
    );

    let params = LayoutParams {
        fill_order: FillOrder::LeftUp,
        ..params
    };
    layout_and_check(
        &params,
        13,
        &[
            (1.0, -1.0),
            (0.0, -1.0),
            (-1.0, -1.0),
            (-2.0, -1.0),
            (1.0, 0.0),
            (0.0, 0.0),
            (-1.0, 0.0),
            (-2.0, 0.0),
            (1.0, 1.0),
            (0.0, 1.0),
            (-1.0, 1.0),
            (-2.0, 1.0),
            (1.0, 2.0),
        ],
    );
}

#[test]
fn empty_layout_reports_the_canvas() {
    let host = MockHost::default();
    let params = grid(FillOrder::RightDown, (3.0, 3.0), 0);
    let aabb = apply_layout(&host, &params, &[], PARENT, None);
    assert_eq!(
        aabb,
        Aabb::new(Vec3::new(-1.5, -1.5, 0.0), Vec3::new(1.5, 1.5, 0.0))
    );

    let shrink = LayoutParams {
        shrink_to_fit: true,
        ..params
    };
    assert_eq!(apply_layout(&host, &shrink, &[], PARENT, None), Aabb::ZERO);
}

#[test]
fn shrink_to_fit_hugs_content() {
    let (host, children) = MockHost::with_children(3);
    let params = LayoutParams {
        shrink_to_fit: true,
        ..grid(FillOrder::DownRight, (4.0, 4.0), 0)
    };
    let aabb = apply_layout(&host, &params, &elements(&children), Entity::NULL, None);
    assert_eq!(aabb.min, Vec3::new(-2.0, -1.0, 0.0));
    assert_eq!(aabb.max, Vec3::new(-1.0, 2.0, 0.0));
}

#[test]
fn weighted_row_shares_free_space() {
    let (host, children) = MockHost::with_children(3);
    let mut elements = elements(&children);
    elements[0].horizontal_weight = 3.0;
    elements[1].horizontal_weight = 1.0;
    let params = LayoutParams {
        spacing: Vec2::new(1.0, 0.0),
        ..grid(FillOrder::RightDown, (7.0, 1.0), 3)
    };

    apply_layout(&host, &params, &elements, PARENT, None);

    assert_positions(&host, &children, &[(-2.0, 0.0), (1.0, 0.0), (3.0, 0.0)]);
    assert_eq!(host.desired(children[0]), DesiredSize::new(Some(3.0), None, None));
    assert_eq!(host.desired(children[1]), DesiredSize::new(Some(1.0), None, None));
    assert_eq!(host.desired(children[2]), DesiredSize::UNCHANGED);
    assert!(children.iter().all(|child| host.is_enabled(*child)));
}

#[test]
fn weighted_columns_resolve_independently() {
    let (host, children) = MockHost::with_children(6);
    let mut elements = elements(&children);
    for (index, weight) in [(0, 3.0), (1, 1.0), (4, 10.0), (5, 10.0)] {
        elements[index].vertical_weight = weight;
    }
    let params = LayoutParams {
        spacing: Vec2::new(0.0, 1.0),
        ..grid(FillOrder::DownRight, (3.0, 7.0), 3)
    };

    apply_layout(&host, &params, &elements, PARENT, None);

    assert_positions(
        &host,
        &children,
        &[
            (-1.0, 2.0),
            (-1.0, -1.0),
            (-1.0, -3.0),
            (0.0, 3.0),
            (0.0, 0.5),
            (0.0, -2.5),
        ],
    );
    let heights: Vec<Option<f32>> = children.iter().map(|c| host.desired(*c).y).collect();
    assert_eq!(
        heights,
        vec![Some(3.0), Some(1.0), None, None, Some(2.0), Some(2.0)]
    );
}

#[test]
fn oversized_sibling_hides_weighted_elements() {
    let (host, children) = MockHost::with_children(3);
    host.resize(children[2], 7.0, 1.0);
    let mut elements = elements(&children);
    elements[0].horizontal_weight = 3.0;
    elements[1].horizontal_weight = 1.0;
    let params = LayoutParams {
        spacing: Vec2::new(1.0, 0.0),
        ..grid(FillOrder::RightDown, (7.0, 3.0), 3)
    };

    apply_layout(&host, &params, &elements, PARENT, None);

    assert!(!host.is_enabled(children[0]));
    assert!(!host.is_enabled(children[1]));
    assert!(host.is_enabled(children[2]));
    assert_eq!(*host.desired_calls.borrow(), 0);
    let position = host.position(children[2]);
    assert!((position.x - 0.0).abs() < EPSILON);
    assert!((position.y - 1.0).abs() < EPSILON);
}

#[test]
fn outer_weights_split_the_secondary_axis() {
    let (host, children) = MockHost::with_children(8);
    host.resize(children[4], 1.0, 2.0);
    let mut elements = elements(&children);
    for (index, weight) in [(2, 2.0), (5, 1.0), (6, 1.0), (7, 3.0)] {
        elements[index].vertical_weight = weight;
    }
    let params = LayoutParams {
        spacing: Vec2::new(0.0, 1.0),
        ..grid(FillOrder::RightDown, (3.0, 11.0), 2)
    };

    apply_layout(&host, &params, &elements, PARENT, None);

    assert_positions(
        &host,
        &children,
        &[
            (-1.0, 5.0),
            (0.0, 5.0),
            (-1.0, 2.5),
            (0.0, 3.0),
            (-1.0, -0.5),
            (0.0, -0.5),
            (-1.0, -4.0),
            (0.0, -4.0),
        ],
    );
    let heights: Vec<Option<f32>> = children.iter().map(|c| host.desired(*c).y).collect();
    assert_eq!(
        heights,
        vec![None, None, Some(2.0), None, None, Some(2.0), Some(3.0), Some(3.0)]
    );
}

#[test]
fn row_hidden_by_weight_takes_no_spacing() {
    let (host, children) = MockHost::with_children(4);
    host.resize(children[2], 1.0, 3.0);
    let mut elements = elements(&children);
    for (index, weight) in [(0, 1.0), (1, 2.0), (3, 3.0)] {
        elements[index].vertical_weight = weight;
    }
    let params = LayoutParams {
        spacing: Vec2::new(0.0, 1.0),
        ..grid(FillOrder::RightDown, (3.0, 3.0), 2)
    };

    apply_layout(&host, &params, &elements, PARENT, None);

    assert!(!host.is_enabled(children[0]));
    assert!(!host.is_enabled(children[1]));
    assert!(host.is_enabled(children[3]));
    assert_positions(
        &host,
        &children,
        &[(0.0, 0.0), (0.0, 0.0), (-1.0, 0.0), (0.0, 0.0)],
    );
    assert_eq!(host.desired(children[0]), DesiredSize::UNCHANGED);
    assert_eq!(host.desired(children[3]).y, Some(3.0));
}

#[test]
fn null_source_skips_weighting() {
    let (host, children) = MockHost::with_children(2);
    let elements: Vec<LayoutElement> = elements(&children)
        .into_iter()
        .map(|element| element.with_weights(1.0, 1.0))
        .collect();
    let params = grid(FillOrder::RightDown, (4.0, 1.0), 0);

    apply_layout(&host, &params, &elements, Entity::NULL, None);
    assert_eq!(*host.desired_calls.borrow(), 0);
    assert_positions(&host, &children, &[(-1.5, 0.0), (-0.5, 0.0)]);
}

#[test]
fn repeated_layout_is_idempotent() {
    let (host, children) = MockHost::with_children(5);
    let mut elements = elements(&children);
    elements[1].horizontal_weight = 2.0;
    let params = LayoutParams {
        spacing: Vec2::new(0.5, 0.5),
        ..grid(FillOrder::LeftUp, (6.0, 4.0), 2)
    };

    let mut first_cache = CachedPositions::default();
    let first = apply_layout(&host, &params, &elements, PARENT, Some(&mut first_cache));
    let first_positions: Vec<Vec2> = children.iter().map(|c| host.position(*c)).collect();

    let mut second_cache = CachedPositions::default();
    let second = apply_layout(&host, &params, &elements, PARENT, Some(&mut second_cache));
    let second_positions: Vec<Vec2> = children.iter().map(|c| host.position(*c)).collect();

    assert_eq!(first, second);
    assert_eq!(first_positions, second_positions);
    assert_eq!(first_cache, second_cache);
}

#[test]
fn insert_index_follows_fill_order() {
    let (host, children) = MockHost::with_children(4);
    let elements = elements(&children);
    let mut params = LayoutParams {
        spacing: Vec2::new(1.0, 1.0),
        ..grid(FillOrder::RightDown, (3.0, 3.0), 2)
    };
    let mut cached = CachedPositions::default();

    assert_eq!(calculate_insert_index_for_position(&cached, Vec3::ZERO), 0);
    apply_layout(&host, &params, &[], PARENT, Some(&mut cached));
    assert_eq!(calculate_insert_index_for_position(&cached, Vec3::ZERO), 0);

    apply_layout(&host, &params, &elements, PARENT, Some(&mut cached));
    assert_positions(
        &host,
        &children,
        &[(-1.0, 1.0), (1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)],
    );

    let horizontal_points = [
        Vec3::new(-2.5, 0.1, 0.0),
        Vec3::new(-0.5, 0.5, 0.0),
        Vec3::new(1.5, 1.5, 0.0),
        Vec3::new(-2.5, -0.1, 0.0),
        Vec3::new(0.5, -1.5, 0.0),
        Vec3::new(2.0, -1.0, 0.0),
    ];
    let vertical_points = [
        Vec3::new(-0.1, 2.5, 0.0),
        Vec3::new(-0.5, 0.5, 0.0),
        Vec3::new(-1.5, -1.5, 0.0),
        Vec3::new(0.1, 2.5, 0.0),
        Vec3::new(1.5, -0.5, 0.0),
        Vec3::new(1.0, -2.0, 0.0),
    ];
    let cases: [(FillOrder, &[Vec3; 6], [usize; 6]); 8] = [
        (FillOrder::RightDown, &horizontal_points, [0, 1, 2, 2, 3, 4]),
        (FillOrder::LeftDown, &horizontal_points, [2, 1, 0, 4, 3, 2]),
        (FillOrder::RightUp, &horizontal_points, [2, 3, 4, 0, 1, 2]),
        (FillOrder::LeftUp, &horizontal_points, [4, 3, 2, 2, 1, 0]),
        (FillOrder::DownRight, &vertical_points, [0, 1, 2, 2, 3, 4]),
        (FillOrder::DownLeft, &vertical_points, [2, 3, 4, 0, 1, 2]),
        (FillOrder::UpRight, &vertical_points, [2, 1, 0, 4, 3, 2]),
        (FillOrder::UpLeft, &vertical_points, [4, 3, 2, 2, 1, 0]),
    ];
    for (fill_order, points, expected) in cases {
        params.fill_order = fill_order;
        apply_layout(&host, &params, &elements, PARENT, Some(&mut cached));
        for (point, index) in points.iter().zip(expected) {
            assert_eq!(
                calculate_insert_index_for_position(&cached, *point),
                index,
                "{fill_order} at {point:?}"
            );
        }
    }
}
