// Device capability classification and the quality-degradation ladder.
//
// The capability decision table is pure so it can be tested natively; the
// web-side probe (`src/probe.rs`) feeds it observed values. The
// `DegradationController` is session-scoped state owned by the frame
// context, never a global, and only ever moves toward lower quality.

/// Coarse device classification, computed once at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    High,
    Mid,
    Low,
}

/// Used when the host cannot report a logical core count.
pub const DEFAULT_CPU_CORES: u32 = 4;

#[derive(Clone, Copy, Debug)]
pub struct DeviceCapability {
    pub is_mobile: bool,
    pub cpu_cores: u32,
    pub low_end_gpu: bool,
    pub tier: Tier,
}

impl DeviceCapability {
    /// Tier decision table:
    /// - mobile with fewer than 4 cores -> Low
    /// - mobile, fewer than 6 cores, or a flagged GPU -> Mid
    /// - otherwise -> High
    pub fn classify(is_mobile: bool, cpu_cores: u32, low_end_gpu: bool) -> Self {
        let tier = if is_mobile && cpu_cores < 4 {
            Tier::Low
        } else if is_mobile || cpu_cores < 6 || low_end_gpu {
            Tier::Mid
        } else {
            Tier::High
        };
        Self {
            is_mobile,
            cpu_cores,
            low_end_gpu,
            tier,
        }
    }
}

pub const MAX_LEVEL: u8 = 4;

const PARTICLE_COUNTS: [u32; 5] = [10_000, 5_000, 2_000, 1_000, 500];

/// Connection budget as a multiple of the particle count (3:2, i.e. 600
/// edges per 400 nodes).
const CONNECTIONS_PER_PARTICLE_NUM: u32 = 3;
const CONNECTIONS_PER_PARTICLE_DEN: u32 = 2;

/// Snapshot of the rendering quality at one degradation level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerformanceLevel {
    pub level: u8,
    pub bloom_enabled: bool,
    pub vignette_enabled: bool,
    /// WebGPU supports only 1 or 4 samples; "reduced" antialiasing keeps 4x
    /// while bloom drops, full off lands at 1.
    pub msaa_samples: u32,
    pub particle_count: u32,
}

impl PerformanceLevel {
    /// Quality table for a given level (clamped to `MAX_LEVEL`).
    pub fn at(level: u8) -> Self {
        let level = level.min(MAX_LEVEL);
        Self {
            level,
            bloom_enabled: level < 2,
            vignette_enabled: level < MAX_LEVEL,
            msaa_samples: if level < 3 { 4 } else { 1 },
            particle_count: PARTICLE_COUNTS[level as usize],
        }
    }

    /// The post-processing chain is skipped entirely at the last level.
    pub fn post_enabled(&self) -> bool {
        self.level < MAX_LEVEL
    }

    pub fn connection_budget(&self) -> u32 {
        self.particle_count * CONNECTIONS_PER_PARTICLE_NUM / CONNECTIONS_PER_PARTICLE_DEN
    }
}

/// Forward-only quality ladder. Starts from the probed tier and steps down
/// one level per `degrade()` call, saturating at `MAX_LEVEL`; it never
/// recovers within a session, so a struggling device cannot oscillate
/// between tiers. The controller does not measure time itself; an external,
/// debounced frame-rate observer decides when to call `degrade()`.
#[derive(Clone, Debug)]
pub struct DegradationController {
    current: PerformanceLevel,
}

impl DegradationController {
    pub fn for_tier(tier: Tier) -> Self {
        let level = match tier {
            Tier::Low => 3,
            Tier::Mid => 1,
            Tier::High => 0,
        };
        Self {
            current: PerformanceLevel::at(level),
        }
    }

    pub fn level(&self) -> PerformanceLevel {
        self.current
    }

    /// Advance one level, saturating at `MAX_LEVEL`. Safe to call rapidly;
    /// repeated calls past the end are no-ops.
    pub fn degrade(&mut self) -> PerformanceLevel {
        if self.current.level < MAX_LEVEL {
            self.current = PerformanceLevel::at(self.current.level + 1);
            log::info!(
                "[perf] degraded to level {} ({} particles, bloom {}, msaa {}x)",
                self.current.level,
                self.current.particle_count,
                if self.current.bloom_enabled { "on" } else { "off" },
                self.current.msaa_samples
            );
        }
        self.current
    }
}
