// Host-side tests for the point field and its engine.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod corelib {
    pub mod animate {
        include!("../src/core/animate.rs");
    }
    pub mod pulse {
        include!("../src/core/pulse.rs");
    }
    pub mod field {
        include!("../src/core/field.rs");
    }
}

use corelib::field::*;
use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn generated_points_lie_on_the_shell() {
    let mut rng = StdRng::seed_from_u64(7);
    let (positions, rest) = generate_field(500, &mut rng);
    assert_eq!(positions.len(), 500);
    assert_eq!(rest.len(), 500);
    for p in &rest {
        let n = p.length();
        assert!(
            (SHELL_INNER_RADIUS..=SHELL_OUTER_RADIUS).contains(&n),
            "point at radius {n} outside shell"
        );
    }
}

#[test]
fn zero_points_yields_empty_buffers() {
    let mut rng = StdRng::seed_from_u64(7);
    let (positions, rest) = generate_field(0, &mut rng);
    assert!(positions.is_empty());
    assert!(rest.is_empty());
}

#[test]
fn positions_start_at_rest() {
    let mut rng = StdRng::seed_from_u64(11);
    let (positions, rest) = generate_field(100, &mut rng);
    assert_eq!(positions, rest);
}

#[test]
fn same_seed_gives_same_field() {
    let mut a = StdRng::seed_from_u64(99);
    let mut b = StdRng::seed_from_u64(99);
    let (pa, _) = generate_field(64, &mut a);
    let (pb, _) = generate_field(64, &mut b);
    assert_eq!(pa, pb);
}

#[test]
fn connections_respect_distance_order_and_budget() {
    let mut rng = StdRng::seed_from_u64(3);
    let (_, rest) = generate_field(400, &mut rng);
    let budget = 600;
    let conns = build_connections(&rest, budget, &mut rng);
    assert!(conns.len() <= budget);
    for c in &conns {
        assert!(c.a < c.b, "edge endpoints out of order");
        assert!((c.b as usize) < rest.len());
        let d = rest[c.a as usize].distance(rest[c.b as usize]);
        assert!(d < CONNECTION_MAX_DISTANCE, "edge spans distance {d}");
    }
    // No duplicate edges; the ascending scan can visit a pair only once.
    let mut seen: Vec<(u32, u32)> = conns.iter().map(|c| (c.a, c.b)).collect();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), conns.len());
}

#[test]
fn dense_cluster_fills_the_budget_exactly() {
    // 30 points inside a 0.1 cube give 435 qualifying pairs; with keep
    // probability 0.5 a budget of 50 is always reached.
    let mut rng = StdRng::seed_from_u64(5);
    let points: Vec<Vec3> = (0..30)
        .map(|i| Vec3::splat(0.001 * i as f32))
        .collect();
    let conns = build_connections(&points, 50, &mut rng);
    assert_eq!(conns.len(), 50);
}

#[test]
fn engine_starts_with_requested_sizes() {
    let engine = FieldEngine::new(200, 300, 42);
    assert_eq!(engine.point_count(), 200);
    assert!(engine.connections().len() <= 300);
    assert_eq!(engine.rotation_y(), 0.0);
    assert_eq!(engine.pulse_count(), 0);
    assert!(!engine.reduced_motion());
}

#[test]
fn regenerate_shrinks_the_field() {
    let mut engine = FieldEngine::new(200, 300, 42);
    engine.regenerate(50, 75);
    assert_eq!(engine.point_count(), 50);
    assert!(engine.connections().len() <= 75);
    assert_eq!(engine.positions().len(), engine.rest().len());
}

#[test]
fn tick_advances_rotation_and_moves_points() {
    let mut engine = FieldEngine::new(50, 75, 1);
    let before = engine.positions().to_vec();
    engine.tick(Some(Vec2::new(0.5, 0.5)), 1.0 / 60.0, 1.0);
    assert!(engine.rotation_y() > 0.0);
    assert_ne!(engine.positions(), &before[..], "tick left all points still");
}

#[test]
fn reduced_motion_pins_points_to_rest_and_ignores_pulses() {
    let mut engine = FieldEngine::new(50, 75, 1);
    engine.tick(Some(Vec2::new(0.2, 0.1)), 1.0 / 60.0, 1.0);
    engine.set_reduced_motion(true);
    let rotation_before = engine.rotation_y();

    engine.trigger_pulse(Vec3::new(0.0, 0.0, 1.7), 1.0);
    assert_eq!(engine.pulse_count(), 0);

    engine.tick(Some(Vec2::new(0.2, 0.1)), 1.0 / 60.0, 2.0);
    assert_eq!(engine.positions(), engine.rest());
    assert_eq!(engine.rotation_y(), rotation_before);
}

#[test]
fn enabling_reduced_motion_drops_live_pulses() {
    let mut engine = FieldEngine::new(50, 75, 1);
    engine.trigger_pulse(Vec3::new(0.0, 0.0, 1.7), 1.0);
    engine.trigger_pulse(Vec3::new(1.7, 0.0, 0.0), 1.5);
    assert_eq!(engine.pulse_count(), 2);

    // A pulse live at toggle time must not keep rippling for the rest of
    // its lifetime; the uniforms read fully inactive on the next frame.
    engine.set_reduced_motion(true);
    assert_eq!(engine.pulse_count(), 0);
    let u = engine.pulse_uniforms(1.6);
    assert!(u.origins.iter().all(|o| *o == Vec3::ZERO));
    assert!(u.ages.iter().all(|a| *a == 0.0));
}

#[test]
fn pulses_survive_regeneration() {
    let mut engine = FieldEngine::new(50, 75, 1);
    engine.trigger_pulse(Vec3::new(0.0, 1.7, 0.0), 0.5);
    engine.regenerate(20, 30);
    assert_eq!(engine.pulse_count(), 1);
}

#[test]
fn line_positions_pair_connection_endpoints() {
    let engine = FieldEngine::new(100, 150, 9);
    let lines = engine.line_positions();
    let conns = engine.connections();
    assert_eq!(lines.len(), conns.len() * 2);
    for (k, c) in conns.iter().enumerate() {
        assert_eq!(lines[2 * k], engine.rest()[c.a as usize]);
        assert_eq!(lines[2 * k + 1], engine.rest()[c.b as usize]);
    }
}

#[test]
fn reseed_is_deterministic() {
    let mut a = FieldEngine::new(80, 120, 1);
    let mut b = FieldEngine::new(80, 120, 2);
    a.reseed(77);
    b.reseed(77);
    assert_eq!(a.rest(), b.rest());
    assert_eq!(a.connections(), b.connections());
}
