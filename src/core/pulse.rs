// Click-triggered shockwave pulses, collected into fixed-size shader
// uniform arrays every frame.

use glam::Vec3;
use smallvec::SmallVec;

/// Uniform array size; the shaders loop over exactly this many slots.
pub const MAX_PULSES: usize = 5;
/// Pulses older than this are dropped.
pub const PULSE_LIFETIME_SEC: f32 = 3.0;

#[derive(Clone, Copy, Debug)]
pub struct Pulse {
    pub origin: Vec3,
    pub start_time: f32,
}

/// Bounded FIFO of live pulses. Holds between 0 and `MAX_PULSES` entries;
/// adding to a full registry evicts the oldest. Single-threaded: all calls
/// happen on the render/update thread.
#[derive(Clone, Debug, Default)]
pub struct PulseRegistry {
    pulses: SmallVec<[Pulse; MAX_PULSES]>,
}

/// Shader-ready pulse data. Unused trailing slots carry a zero origin and
/// age 0; the shaders treat age == 0 as inactive.
#[derive(Clone, Copy, Debug)]
pub struct PulseUniforms {
    pub origins: [Vec3; MAX_PULSES],
    pub ages: [f32; MAX_PULSES],
}

impl Default for PulseUniforms {
    fn default() -> Self {
        Self {
            origins: [Vec3::ZERO; MAX_PULSES],
            ages: [0.0; MAX_PULSES],
        }
    }
}

impl PulseRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    /// Record a pulse at `origin`, evicting the oldest entry when full.
    pub fn add(&mut self, origin: Vec3, now: f32) {
        if self.pulses.len() >= MAX_PULSES {
            self.pulses.remove(0);
        }
        self.pulses.push(Pulse {
            origin,
            start_time: now,
        });
    }

    /// Drop expired pulses, then pack the survivors into fixed-size arrays.
    /// Called every frame whether or not any pulse is active.
    pub fn collect_uniforms(&mut self, now: f32) -> PulseUniforms {
        self.pulses
            .retain(|p| now - p.start_time < PULSE_LIFETIME_SEC);
        let mut u = PulseUniforms::default();
        for (i, p) in self.pulses.iter().enumerate() {
            u.origins[i] = p.origin;
            u.ages[i] = now - p.start_time;
        }
        u
    }

    pub fn clear(&mut self) {
        self.pulses.clear();
    }
}
