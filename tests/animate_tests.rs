// Host-side tests for per-frame point motion.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod animate {
    include!("../src/core/animate.rs");
}

use animate::*;
use glam::{Vec2, Vec3};

// At t == 0 with rest at the origin both breathing sines are zero, so the
// target is exactly the rest position.
#[test]
fn points_settle_monotonically_toward_rest() {
    let rest = [Vec3::ZERO];
    let mut positions = [Vec3::ONE];
    let mut prev = positions[0].length();
    for _ in 0..200 {
        step_points(&mut positions, &rest, None, 0.0);
        let d = positions[0].length();
        assert!(d < prev, "distance to rest increased");
        prev = d;
    }
    assert!(prev < 1e-3, "point failed to converge, still {prev} away");
}

#[test]
fn each_step_moves_a_fixed_fraction_of_the_remaining_gap() {
    let rest = [Vec3::ZERO];
    let mut positions = [Vec3::new(1.0, 0.0, 0.0)];
    step_points(&mut positions, &rest, None, 0.0);
    assert!((positions[0].x - (1.0 - POSITION_LERP)).abs() < 1e-6);
}

#[test]
fn pointer_inside_radius_attracts_and_lifts() {
    let rest = [Vec3::ZERO];
    let mut positions = [Vec3::ZERO];
    step_points(&mut positions, &rest, Some(Vec2::new(0.5, 0.0)), 0.0);
    assert!(positions[0].x > 0.0, "no pull toward the pointer");
    assert!(positions[0].z > 0.0, "no lift toward the camera");
    assert_eq!(positions[0].y, 0.0);
}

#[test]
fn pointer_outside_radius_has_no_effect() {
    let rest = [Vec3::ZERO];
    let mut positions = [Vec3::ZERO];
    step_points(
        &mut positions,
        &rest,
        Some(Vec2::new(ATTRACTION_RADIUS + 1.0, 0.0)),
        0.0,
    );
    assert_eq!(positions[0], Vec3::ZERO);
}

#[test]
fn attraction_weakens_with_distance() {
    // Same rest point, two pointer distances: the closer pointer lifts harder.
    let rest = [Vec3::ZERO];
    let mut near = [Vec3::ZERO];
    let mut far = [Vec3::ZERO];
    step_points(&mut near, &rest, Some(Vec2::new(0.2, 0.0)), 0.0);
    step_points(&mut far, &rest, Some(Vec2::new(1.2, 0.0)), 0.0);
    assert!(near[0].z > far[0].z, "closer pointer should lift harder");
}

#[test]
fn breathing_displaces_points_at_rest() {
    let rest = [Vec3::new(0.5, 0.5, 0.5)];
    let mut positions = rest;
    step_points(&mut positions, &rest, None, 1.0);
    assert_ne!(positions[0], rest[0], "breathing produced no motion");
    // Breathing is bounded by its amplitudes.
    assert!((positions[0].y - rest[0].y).abs() <= BREATHE_Y_AMP);
    assert!((positions[0].x - rest[0].x).abs() <= BREATHE_X_AMP);
}

#[test]
fn rotation_is_proportional_to_frame_time() {
    assert_eq!(rotation_delta(2.0), 2.0 * rotation_delta(1.0));
    // Matches 0.0008 radians per frame at 60 fps.
    assert!((rotation_delta(1.0 / 60.0) - 0.0008).abs() < 1e-6);
}

#[test]
fn empty_buffers_are_a_no_op() {
    let mut positions: [Vec3; 0] = [];
    step_points(&mut positions, &[], Some(Vec2::ZERO), 1.0);
}
