// Point-field generation, proximity connections, and the `FieldEngine`
// that owns all per-session simulation state.
//
// Points live in flat `Vec<Vec3>` buffers indexed by point id; there are no
// per-point heap objects, so a frame update is a single linear pass with no
// allocation.

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::animate;
use super::pulse::{PulseRegistry, PulseUniforms};

// Spherical shell the points are scattered over.
pub const SHELL_INNER_RADIUS: f32 = 1.5;
pub const SHELL_OUTER_RADIUS: f32 = 2.0;

// Pairs closer than this qualify for a connection; each qualifying pair is
// kept with independent probability 0.5.
pub const CONNECTION_MAX_DISTANCE: f32 = 0.8;
pub const CONNECTION_KEEP_PROBABILITY: f64 = 0.5;

/// An edge between two point indices. Always `a < b`, both valid into the
/// field buffers the connection was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Connection {
    pub a: u32,
    pub b: u32,
}

/// Sample `count` points uniformly on the shell and return
/// `(positions, rest)`. The two buffers start identical; only `positions`
/// is mutated afterward. `count == 0` yields empty buffers.
pub fn generate_field(count: usize, rng: &mut impl Rng) -> (Vec<Vec3>, Vec<Vec3>) {
    let mut rest = Vec::with_capacity(count);
    for _ in 0..count {
        // Inverse-transform sampling: uniform azimuth, acos-distributed
        // polar angle, uniform radius across the shell thickness.
        let theta = rng.gen::<f32>() * std::f32::consts::TAU;
        let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
        let r = SHELL_INNER_RADIUS + rng.gen::<f32>() * (SHELL_OUTER_RADIUS - SHELL_INNER_RADIUS);
        rest.push(Vec3::new(
            r * phi.sin() * theta.cos(),
            r * phi.sin() * theta.sin(),
            r * phi.cos(),
        ));
    }
    (rest.clone(), rest)
}

/// Scan index pairs (i, j > i) in ascending order and accept qualifying
/// pairs until the budget is reached.
///
/// The early exit biases the edge set toward low indices. That bias is
/// kept deliberately; a uniform sample over all qualifying pairs would need
/// a full scan.
pub fn build_connections(
    positions: &[Vec3],
    max_connections: usize,
    rng: &mut impl Rng,
) -> Vec<Connection> {
    let mut conns = Vec::with_capacity(max_connections);
    'scan: for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            if conns.len() >= max_connections {
                break 'scan;
            }
            let dist = positions[i].distance(positions[j]);
            if dist < CONNECTION_MAX_DISTANCE && rng.gen_bool(CONNECTION_KEEP_PROBABILITY) {
                conns.push(Connection {
                    a: i as u32,
                    b: j as u32,
                });
            }
        }
    }
    conns
}

/// Owns the animated field: point buffers, connections, live pulses, and
/// the whole-field rotation angle. Exclusively mutated on the render/update
/// thread; the renderer reads the buffers within the same frame.
pub struct FieldEngine {
    positions: Vec<Vec3>,
    rest: Vec<Vec3>,
    connections: Vec<Connection>,
    pulses: PulseRegistry,
    connection_budget: usize,
    rotation_y: f32,
    reduced_motion: bool,
    rng: StdRng,
}

impl FieldEngine {
    pub fn new(point_count: usize, max_connections: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let (positions, rest) = generate_field(point_count, &mut rng);
        let connections = build_connections(&rest, max_connections, &mut rng);
        Self {
            positions,
            rest,
            connections,
            pulses: PulseRegistry::new(),
            connection_budget: max_connections,
            rotation_y: 0.0,
            reduced_motion: false,
            rng,
        }
    }

    pub fn point_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn rest(&self) -> &[Vec3] {
        &self.rest
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn rotation_y(&self) -> f32 {
        self.rotation_y
    }

    pub fn pulse_count(&self) -> usize {
        self.pulses.len()
    }

    pub fn reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    pub fn set_reduced_motion(&mut self, reduced: bool) {
        self.reduced_motion = reduced;
        // A pulse live at toggle time would keep displacing vertices for the
        // rest of its lifetime; drop them so the field stops at once.
        if reduced {
            self.pulses.clear();
        }
    }

    /// Rebuild the field at a new size, e.g. after the particle budget
    /// shrank a degradation level. Live pulses are world-space disturbances
    /// and stay valid across a rebuild.
    pub fn regenerate(&mut self, point_count: usize, max_connections: usize) {
        let (positions, rest) = generate_field(point_count, &mut self.rng);
        self.positions = positions;
        self.rest = rest;
        self.connections = build_connections(&self.rest, max_connections, &mut self.rng);
        self.connection_budget = max_connections;
        log::info!(
            "[field] regenerated: {} points, {} connections",
            self.positions.len(),
            self.connections.len()
        );
    }

    /// Record a shockwave at `origin` (field-local space). Ignored under
    /// reduced motion, which zeroes all animation.
    pub fn trigger_pulse(&mut self, origin: Vec3, now: f32) {
        if self.reduced_motion {
            return;
        }
        self.pulses.add(origin, now);
    }

    /// One animation update. With reduced motion the points snap to rest
    /// and the rotation freezes; the field stays visible.
    pub fn tick(&mut self, pointer: Option<Vec2>, dt: f32, t: f32) {
        if self.reduced_motion {
            self.positions.copy_from_slice(&self.rest);
            return;
        }
        animate::step_points(&mut self.positions, &self.rest, pointer, t);
        self.rotation_y += animate::rotation_delta(dt);
    }

    /// Refresh the shader uniform bundle. Runs every frame regardless of
    /// whether any pulse is live so expired slots read as inactive.
    pub fn pulse_uniforms(&mut self, now: f32) -> PulseUniforms {
        self.pulses.collect_uniforms(now)
    }

    /// Line-segment endpoints for the connection pass, from rest positions.
    /// Built once per (re)generation; connections do not track the animated
    /// points.
    pub fn line_positions(&self) -> Vec<Vec3> {
        let mut out = Vec::with_capacity(self.connections.len() * 2);
        for c in &self.connections {
            out.push(self.rest[c.a as usize]);
            out.push(self.rest[c.b as usize]);
        }
        out
    }

    /// Reseed the point scatter without changing sizes.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
        let count = self.positions.len();
        let budget = self.connection_budget;
        self.regenerate(count, budget);
    }
}
