// Debounced frame-rate observer.
//
// Decides when the frame loop should request a quality degradation. It
// never measures time itself; the host feeds it `(now, dt)` once per
// frame, which keeps it testable without a clock.

/// Smoothed fps below this counts as struggling.
pub const TARGET_MIN_FPS: f32 = 30.0;
/// The fps must stay below target this long before a trigger fires.
pub const SUSTAIN_WINDOW_SEC: f32 = 2.0;
/// Minimum spacing between triggers, so one stutter cannot walk the ladder
/// down several levels at once.
pub const DEGRADE_COOLDOWN_SEC: f32 = 3.0;

const FPS_SMOOTHING_ALPHA: f32 = 0.1;

#[derive(Clone, Debug)]
pub struct FrameRateMonitor {
    smoothed_fps: f32,
    below_since: Option<f32>,
    last_trigger: Option<f32>,
}

impl FrameRateMonitor {
    pub fn new() -> Self {
        Self {
            // Optimistic start; the EMA settles within a second of samples.
            smoothed_fps: 60.0,
            below_since: None,
            last_trigger: None,
        }
    }

    pub fn smoothed_fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Feed one frame sample. Returns true when the host should degrade one
    /// quality level.
    pub fn sample(&mut self, now: f32, dt_sec: f32) -> bool {
        if dt_sec <= 0.0 {
            return false;
        }
        let fps = 1.0 / dt_sec;
        self.smoothed_fps += (fps - self.smoothed_fps) * FPS_SMOOTHING_ALPHA;

        if self.smoothed_fps >= TARGET_MIN_FPS {
            self.below_since = None;
            return false;
        }
        let since = *self.below_since.get_or_insert(now);
        if now - since < SUSTAIN_WINDOW_SEC {
            return false;
        }
        if let Some(t) = self.last_trigger {
            if now - t < DEGRADE_COOLDOWN_SEC {
                return false;
            }
        }
        self.last_trigger = Some(now);
        self.below_since = None;
        true
    }
}

impl Default for FrameRateMonitor {
    fn default() -> Self {
        Self::new()
    }
}
