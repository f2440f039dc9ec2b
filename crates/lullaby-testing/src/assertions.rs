//! Approximate assertions for layout tests
//!
//! Positions and sizes come out of float arithmetic, so comparisons take a
//! tolerance.

use lullaby_math::{Aabb, Vec2};

/// Tolerance used by the layout tests.
pub const EPSILON: f32 = 1e-4;

/// Assert that a value is within `tolerance` of the expected one.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{}: expected {} (±{}), got {} (diff: {})",
        msg,
        expected,
        tolerance,
        actual,
        diff
    );
}

pub fn assert_vec2_approx_eq(actual: Vec2, expected: Vec2, tolerance: f32, msg: &str) {
    assert_approx_eq(actual.x, expected.x, tolerance, &format!("{} - x", msg));
    assert_approx_eq(actual.y, expected.y, tolerance, &format!("{} - y", msg));
}

/// Assert that the xy extent of a box matches `min`/`max`.
pub fn assert_aabb_approx_eq(actual: Aabb, min: Vec2, max: Vec2, tolerance: f32, msg: &str) {
    assert_vec2_approx_eq(actual.min.xy(), min, tolerance, &format!("{} - min", msg));
    assert_vec2_approx_eq(actual.max.xy(), max, tolerance, &format!("{} - max", msg));
}

/// Assert that a collection has an expected count.
pub fn assert_count<T>(items: &[T], expected: usize, msg: &str) {
    assert_eq!(
        items.len(),
        expected,
        "{}: expected {} items, got {}",
        msg,
        expected,
        items.len()
    );
}
