// Host-side tests for the pulse registry.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod pulse {
    include!("../src/core/pulse.rs");
}

use glam::Vec3;
use pulse::*;

#[test]
fn registry_starts_empty() {
    let mut reg = PulseRegistry::new();
    assert!(reg.is_empty());
    let u = reg.collect_uniforms(0.0);
    for i in 0..MAX_PULSES {
        assert_eq!(u.origins[i], Vec3::ZERO);
        assert_eq!(u.ages[i], 0.0);
    }
}

#[test]
fn adding_past_capacity_evicts_the_oldest() {
    let mut reg = PulseRegistry::new();
    for i in 0..6 {
        reg.add(Vec3::new(i as f32, 0.0, 0.0), i as f32 * 0.1);
    }
    assert_eq!(reg.len(), MAX_PULSES);

    let u = reg.collect_uniforms(1.0);
    // Pulse 0 was evicted; slots now hold pulses 1..=5 in arrival order.
    for (slot, expected) in (1..6).enumerate() {
        assert_eq!(u.origins[slot].x, expected as f32);
    }
}

#[test]
fn ages_are_measured_from_trigger_time() {
    let mut reg = PulseRegistry::new();
    reg.add(Vec3::X, 1.0);
    reg.add(Vec3::Y, 2.0);
    let u = reg.collect_uniforms(2.5);
    assert!((u.ages[0] - 1.5).abs() < 1e-6);
    assert!((u.ages[1] - 0.5).abs() < 1e-6);
}

#[test]
fn expired_pulses_are_dropped() {
    let mut reg = PulseRegistry::new();
    reg.add(Vec3::X, 0.0);
    reg.add(Vec3::Y, 2.0);

    let u = reg.collect_uniforms(PULSE_LIFETIME_SEC + 0.1);
    assert_eq!(reg.len(), 1);
    // Survivor packs into slot 0; the freed slot reads as inactive.
    assert_eq!(u.origins[0], Vec3::Y);
    assert!(u.ages[0] > 0.0);
    assert_eq!(u.ages[1], 0.0);
    assert_eq!(u.origins[1], Vec3::ZERO);
}

#[test]
fn pulse_exactly_at_lifetime_is_gone() {
    let mut reg = PulseRegistry::new();
    reg.add(Vec3::X, 0.0);
    reg.collect_uniforms(PULSE_LIFETIME_SEC);
    assert!(reg.is_empty());
}

#[test]
fn clear_removes_everything() {
    let mut reg = PulseRegistry::new();
    reg.add(Vec3::X, 0.0);
    reg.add(Vec3::Y, 0.0);
    reg.clear();
    assert!(reg.is_empty());
}
