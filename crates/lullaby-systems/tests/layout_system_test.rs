//! End-to-end layout runs with an immediate dispatcher: every event is
//! handled before the call that sent it returns.

use lullaby_core::Entity;
use lullaby_math::{Aabb, Vec2, Vec3, DEGREES_TO_RADIANS};
use lullaby_systems::{LayoutDef, PositionAnimator, RadialLayoutDef};
use lullaby_testing::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use web_time::Duration;

fn assert_translations_and_sizes(
    world: &LayoutWorld,
    children: &[Entity],
    translations: &[Vec2],
    sizes: &[Vec2],
) {
    for (i, &child) in children.iter().enumerate() {
        assert_vec2_approx_eq(
            world.translation(child),
            translations[i],
            EPSILON,
            &format!("translation of child {}", i),
        );
        assert_vec2_approx_eq(
            world.actual_size(child),
            sizes[i],
            EPSILON,
            &format!("size of child {}", i),
        );
    }
}

fn centered_box(half_x: f32, half_y: f32) -> Aabb {
    Aabb::new(Vec3::new(-half_x, -half_y, 0.0), Vec3::new(half_x, half_y, 0.0))
}

#[test]
fn layout_of_entity_without_layout_is_ignored() {
    let world = LayoutWorld::immediate();
    let entity = world.factory.create();
    let changed = world.count_layout_changes(entity);

    world.layouts.layout(entity);
    world.layouts.layout(world.factory.create());
    assert_eq!(changed.get(), 0);
}

#[test]
fn layout_without_transform_is_ignored() {
    let world = LayoutWorld::immediate();
    let parent = world.factory.allocate();
    world.layouts.create_from_def(parent, &LayoutWorld::parent_def());
    let changed = world.count_layout_changes(parent);

    world.layouts.layout(parent);
    assert_eq!(changed.get(), 0);
}

#[test]
fn empty_children_stack_in_the_top_left_corner() {
    let world = LayoutWorld::immediate();
    let parent = world.create_parent();
    let children: Vec<Entity> = (0..5)
        .map(|_| world.create_child(parent, 0.0, false))
        .collect();

    for child in children {
        assert_vec2_approx_eq(
            world.translation(child),
            Vec2::new(-1.0, 1.0),
            EPSILON,
            "zero-size child",
        );
    }
}

fn check_radial(degrees_per_element: f32, count: usize) {
    let world = LayoutWorld::immediate();
    let def = RadialLayoutDef {
        degrees_per_element,
        major_axis: Vec3::new(1.0, 0.0, 0.0),
        minor_axis: Vec3::new(0.0, 1.0, 0.0),
        ..RadialLayoutDef::default()
    };
    let parent = world.create_radial(&def);
    let children: Vec<Entity> = (0..count)
        .map(|_| world.create_child(parent, 0.0, false))
        .collect();

    for (i, &child) in children.iter().enumerate() {
        let angle = i as f32 * degrees_per_element * DEGREES_TO_RADIANS;
        let expected = def.major_axis * angle.cos() + def.minor_axis * angle.sin();
        let actual = world.transforms.local_translation(child).unwrap_or(Vec3::ZERO);
        assert_approx_eq(actual.x, expected.x, EPSILON, "radial x");
        assert_approx_eq(actual.y, expected.y, EPSILON, "radial y");
        assert_approx_eq(actual.z, expected.z, EPSILON, "radial z");
    }
}

#[test]
fn radial_layout_circle() {
    check_radial(45.0, 9);
}

#[test]
fn radial_layout_ellipse() {
    check_radial(30.0, 13);
}

#[test]
fn radial_def_without_degrees_uses_the_default() {
    let world = LayoutWorld::immediate();
    let parent = world.create_radial(&RadialLayoutDef::default());
    let params = world.layouts.radial_layout_params(parent);
    assert_eq!(params.map(|params| params.degrees_per_element), Some(45.0));
}

#[test]
fn destroy_stops_layout_events() {
    let world = LayoutWorld::immediate();
    let parent = world.create_parent();
    let changed = world.count_layout_changes(parent);

    let child = world.create_child(parent, 0.0, false);
    assert!(changed.get() > 0);
    changed.set(0);

    world.factory.destroy(child);
    assert!(changed.get() > 0);
    changed.set(0);

    world.factory.destroy(parent);
    assert_eq!(changed.get(), 0);
    assert!(!world.layouts.has_layout(parent));
    world.layouts.layout(parent);
    assert_eq!(changed.get(), 0);
}

#[test]
fn weighted_elements_share_the_canvas() {
    let world = LayoutWorld::immediate();
    let parent = world.create_parent();
    let children: Vec<Entity> = (0..4)
        .map(|_| world.create_child(parent, 1.0, true))
        .collect();

    assert_translations_and_sizes(
        &world,
        &children,
        &[
            Vec2::new(-0.5, 1.0),
            Vec2::new(0.5, 1.0),
            Vec2::new(-0.5, 1.0),
            Vec2::new(0.5, 1.0),
        ],
        &[Vec2::new(1.0, 0.0); 4],
    );
}

#[test]
fn nested_weighted_layouts_resize_their_children() {
    let world = LayoutWorld::immediate();
    let parent = world.create_parent();

    let fixed = world.create_child(parent, 0.0, false);
    world.boxes.set_original_box(fixed, centered_box(0.5, 0.0));
    let nested = world.create_child(parent, 1.0, true);
    let grandchildren: Vec<Entity> = (0..2)
        .map(|_| world.create_child(nested, 1.0, true))
        .collect();

    let children = [fixed, nested, grandchildren[0], grandchildren[1]];
    let translations = [
        Vec2::new(-0.5, 1.0),
        Vec2::new(0.5, 1.0),
        Vec2::new(-0.25, 0.0),
        Vec2::new(0.25, 0.0),
    ];
    let sizes = [
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.5, 0.0),
        Vec2::new(0.5, 0.0),
    ];
    assert_translations_and_sizes(&world, &children, &translations, &sizes);

    // A late actual box from an asynchronous client keeps the desired sizes.
    world
        .boxes
        .set_actual_box(grandchildren[0], Entity::NULL, centered_box(0.25, 0.0));
    assert_translations_and_sizes(&world, &children, &translations, &sizes);
}

#[test]
fn weighted_elements_without_room_are_disabled() {
    let world = LayoutWorld::immediate();
    let parent = world.create_parent();

    let fixed = world.create_child(parent, 0.0, false);
    world.boxes.set_original_box(fixed, centered_box(1.0, 1.0));
    let weighted = world.create_child(parent, 1.0, true);
    let grandchild = world.create_child(weighted, 0.0, false);

    assert_vec2_approx_eq(world.translation(fixed), Vec2::ZERO, EPSILON, "fixed position");
    assert_vec2_approx_eq(
        world.actual_size(fixed),
        Vec2::new(2.0, 2.0),
        EPSILON,
        "fixed size",
    );
    assert!(world.transforms.is_enabled(fixed));
    assert!(!world.transforms.is_enabled(weighted));
    assert!(!world.transforms.is_enabled(grandchild));
}

#[test]
fn insert_index_uses_the_world_transform() {
    let world = LayoutWorld::immediate();
    let parent = world.create_layout(&LayoutDef {
        canvas_size: Vec2::new(4.0, 1.0),
        ..LayoutDef::default()
    });
    world
        .transforms
        .set_local_translation(parent, Vec3::new(10.0, 0.0, 0.0));
    for _ in 0..4 {
        let child = world.create_child(parent, 0.0, false);
        world.boxes.set_original_box(child, centered_box(0.5, 0.5));
    }

    // Children sit at x = -1.5, -0.5, 0.5, 1.5 in the parent's space.
    let index = |x: f32| {
        world
            .layouts
            .get_insert_index_for_position(parent, Vec3::new(x, 0.0, 0.0))
    };
    assert_eq!(index(8.0), 0);
    assert_eq!(index(9.2), 1);
    assert_eq!(index(10.2), 2);
    assert_eq!(index(12.0), 4);
}

#[test]
fn insert_index_requires_a_grid_layout() {
    let world = LayoutWorld::immediate();
    let radial = world.create_radial(&RadialLayoutDef::default());
    assert!(world
        .layouts
        .try_get_insert_index_for_position(radial, Vec3::ZERO)
        .is_err());
    assert!(world
        .layouts
        .try_get_insert_index_for_position(Entity(999), Vec3::ZERO)
        .is_err());
}

#[derive(Default)]
struct RecordingAnimator {
    calls: RefCell<Vec<(Entity, Vec3, Duration)>>,
}

impl PositionAnimator for RecordingAnimator {
    fn animate_position(&self, entity: Entity, target: Vec3, duration: Duration) {
        self.calls.borrow_mut().push((entity, target, duration));
    }
}

#[test]
fn moves_after_the_first_placement_are_animated() {
    let world = LayoutWorld::immediate();
    let animator = Rc::new(RecordingAnimator::default());
    world.layouts.set_position_animator(animator.clone());

    let parent = world.create_layout(&LayoutDef {
        canvas_size: Vec2::new(2.0, 2.0),
        ..LayoutDef::default()
    });
    let child = world.create_child(parent, 0.0, false);
    world
        .transforms
        .set_local_translation(child, Vec3::new(0.0, 0.0, 3.0));
    world.layouts.set_duration(child, Duration::from_millis(250));
    world.boxes.set_original_box(child, centered_box(0.5, 0.5));

    // Only the second placement is animated, at the z set in between.
    assert_eq!(animator.calls.borrow().len(), 1);
    let (entity, target, duration) = animator.calls.borrow()[0];
    assert_eq!(entity, child);
    assert_eq!(duration, Duration::from_millis(250));
    assert_approx_eq(target.x, -0.5, EPSILON, "animated x");
    assert_approx_eq(target.y, 0.5, EPSILON, "animated y");
    assert_approx_eq(target.z, 3.0, EPSILON, "animated z");
}

#[test]
fn zero_duration_snaps_even_with_an_animator() {
    let world = LayoutWorld::immediate();
    let animator = Rc::new(RecordingAnimator::default());
    world.layouts.set_position_animator(animator.clone());

    let parent = world.create_parent();
    let child = world.create_child(parent, 0.0, false);
    world.boxes.set_original_box(child, centered_box(0.5, 0.5));

    assert!(animator.calls.borrow().is_empty());
    assert_vec2_approx_eq(
        world.translation(child),
        Vec2::new(-0.5, 0.5),
        EPSILON,
        "snapped",
    );
}

#[test]
fn setters_relayout_and_ignore_non_layouts() {
    let world = LayoutWorld::immediate();
    let parent = world.create_parent();
    let child = world.create_child(parent, 0.0, false);
    world.boxes.set_original_box(child, centered_box(0.5, 0.5));
    let changed = world.count_layout_changes(parent);

    world.layouts.set_canvas_size_x(parent, 4.0);
    assert_eq!(changed.get(), 1);
    assert_vec2_approx_eq(
        world.translation(child),
        Vec2::new(-1.5, 0.5),
        EPSILON,
        "wider canvas",
    );
    assert_eq!(
        world.layouts.layout_params(parent).map(|p| p.canvas_size),
        Some(Vec2::new(4.0, 2.0))
    );

    world.layouts.set_spacing_x(child, 1.0);
    world.layouts.set_max_elements(child, 3);
    assert!(world.layouts.layout_params(child).is_none());
    assert_eq!(world.layouts.max_elements(child), None);
    assert_eq!(changed.get(), 1);
}
