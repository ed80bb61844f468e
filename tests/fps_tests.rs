// Host-side tests for the debounced frame-rate monitor.
// The main crate is wasm-only, so we include the pure-Rust module directly.

#![allow(dead_code)]
mod fps {
    include!("../src/fps.rs");
}
mod perf {
    include!("../src/core/perf.rs");
}

use fps::*;

fn run(monitor: &mut FrameRateMonitor, dt: f32, seconds: f32) -> Vec<f32> {
    let mut triggers = Vec::new();
    let steps = (seconds / dt) as usize;
    for i in 1..=steps {
        let now = i as f32 * dt;
        if monitor.sample(now, dt) {
            triggers.push(now);
        }
    }
    triggers
}

#[test]
fn healthy_frame_rate_never_triggers() {
    let mut m = FrameRateMonitor::new();
    let triggers = run(&mut m, 1.0 / 60.0, 10.0);
    assert!(triggers.is_empty());
    assert!(m.smoothed_fps() > TARGET_MIN_FPS);
}

#[test]
fn sustained_low_frame_rate_triggers_once_per_window() {
    let mut m = FrameRateMonitor::new();
    // 10 fps: the EMA sinks below target within a second, then the sustain
    // window and cooldown gate the triggers.
    let triggers = run(&mut m, 0.1, 10.0);
    assert!(!triggers.is_empty(), "no degradation requested at 10 fps");
    for pair in triggers.windows(2) {
        assert!(
            pair[1] - pair[0] >= DEGRADE_COOLDOWN_SEC - 1e-3,
            "triggers closer than the cooldown: {pair:?}"
        );
    }
    // First trigger needs at least the sustain window of bad frames.
    assert!(triggers[0] >= SUSTAIN_WINDOW_SEC);
}

#[test]
fn brief_stutter_does_not_trigger() {
    let mut m = FrameRateMonitor::new();
    // One second of jank is shorter than the sustain window.
    let t1 = run(&mut m, 0.1, 1.0);
    assert!(t1.is_empty());
    // Recovery resets the sustain tracking.
    let mut now = 1.0;
    for _ in 0..120 {
        now += 1.0 / 60.0;
        assert!(!m.sample(now, 1.0 / 60.0));
    }
}

#[test]
fn non_positive_dt_is_ignored() {
    let mut m = FrameRateMonitor::new();
    assert!(!m.sample(1.0, 0.0));
    assert!(!m.sample(2.0, -0.5));
    assert_eq!(m.smoothed_fps(), 60.0);
}

#[test]
fn saturated_ladder_stops_forcing_rebuilds() {
    // A device stuck at 10 fps keeps triggering every cooldown for the
    // whole session. Only triggers that actually change the level should
    // rebuild the field; past saturation every one is a no-op.
    let mut m = FrameRateMonitor::new();
    let mut c = perf::DegradationController::for_tier(perf::Tier::Low);
    let mut triggers = 0;
    let mut rebuilds = 0;
    let steps = (60.0_f32 / 0.1) as usize;
    for i in 1..=steps {
        let now = i as f32 * 0.1;
        if m.sample(now, 0.1) {
            triggers += 1;
            let before = c.level();
            if c.degrade() != before {
                rebuilds += 1;
            }
        }
    }
    assert!(triggers > 1, "expected repeated triggers over a minute");
    // Low starts at level 3, so exactly one real step remains.
    assert_eq!(rebuilds, 1);
}

#[test]
fn ema_tracks_the_observed_rate() {
    let mut m = FrameRateMonitor::new();
    run(&mut m, 1.0 / 120.0, 2.0);
    assert!(m.smoothed_fps() > 100.0);
    run(&mut m, 1.0 / 20.0, 4.0);
    assert!(m.smoothed_fps() < 30.0);
}
