// Per-frame point motion: pointer attraction, breathing, eased settling.
//
// All work here is synchronous arithmetic over the flat position buffers;
// the render loop calls `step_points` once per displayed frame.

use glam::{Vec2, Vec3};

// Pointer attraction: points within this radius of the pointer (measured in
// the XY plane) drift toward it.
pub const ATTRACTION_RADIUS: f32 = 1.5;
pub const ATTRACTION_STRENGTH: f32 = 0.4;
// Attracted points also lift slightly toward the camera.
pub const ATTRACTION_Z_LIFT: f32 = 0.3;

// Exponential smoothing factor applied once per update (not per second).
// Eases each point toward its target instead of snapping it there.
pub const POSITION_LERP: f32 = 0.08;

// Low-amplitude breathing offsets, phase-shifted by each point's rest
// position so the field shimmers instead of pumping in unison.
pub const BREATHE_Y_AMP: f32 = 0.03;
pub const BREATHE_Y_RATE: f32 = 0.5;
pub const BREATHE_X_AMP: f32 = 0.02;
pub const BREATHE_X_RATE: f32 = 0.3;

// Whole-field spin in radians per second. Frame-rate independent: equal to
// 0.0008 rad per frame at 60 fps.
pub const ROTATION_RATE: f32 = 0.048;

/// Advance every point one update toward its attraction/breathing target.
///
/// `pointer` is the attraction target on the field's XY plane, if any.
/// `t` is elapsed session time in seconds and only drives the breathing
/// phase; the settling rate is fixed per update.
pub fn step_points(positions: &mut [Vec3], rest: &[Vec3], pointer: Option<Vec2>, t: f32) {
    debug_assert_eq!(positions.len(), rest.len());
    for (p, r) in positions.iter_mut().zip(rest.iter()) {
        let mut target = *r;
        if let Some(m) = pointer {
            let d = m - Vec2::new(r.x, r.y);
            let dist = d.length();
            if dist < ATTRACTION_RADIUS {
                let f = (1.0 - dist / ATTRACTION_RADIUS) * ATTRACTION_STRENGTH;
                target.x += d.x * f;
                target.y += d.y * f;
                target.z += f * ATTRACTION_Z_LIFT;
            }
        }
        target.y += (t * BREATHE_Y_RATE + r.x * 2.0 + r.y * 2.0).sin() * BREATHE_Y_AMP;
        target.x += (t * BREATHE_X_RATE + r.z * 2.0).sin() * BREATHE_X_AMP;
        *p += (target - *p) * POSITION_LERP;
    }
}

/// Rotation advance for a frame of duration `dt` seconds.
#[inline]
pub fn rotation_delta(dt: f32) -> f32 {
    ROTATION_RATE * dt
}
