//! Motion Coordination Demo
//!
//! Simulates a scrolling landing page on a headless host: a parallax layer and
//! a cursor-following orb share the native listeners, sections register their
//! entrance animations, and the frame loop reads one preference snapshot.
//!
//! Features demonstrated:
//! - Shared scroll/pointer listeners via `ViewportTracker`
//! - Animation load pushing the tier down and back up
//! - A user "reduce motion" toggle
//! - Diagnostics as JSON
//!
//! Run with: RUST_LOG=debug cargo run -p blinc_motion --example motion_demo

use std::rc::Rc;

use anyhow::Result;
use blinc_motion::viewport::ViewportThrottle;
use blinc_motion::{MotionRegistry, SignalValue, ViewportTracker};
use blinc_platform::testing::{ManualClock, RecordingSignalSource, ScriptedEnvironment};
use blinc_platform::{Clock, DeviceHints};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let source = Rc::new(RecordingSignalSource::new());
    let env = Rc::new(
        ScriptedEnvironment::new().with_hints(DeviceHints::unknown().cores(8).memory_gb(8.0)),
    );
    let clock = Rc::new(ManualClock::new(0.0));
    let registry = MotionRegistry::builder()
        .signal_source(source.clone())
        .environment(env.clone())
        .clock(clock.clone())
        .build();

    let viewport = ViewportTracker::with_throttle(
        &registry,
        "landing",
        ViewportThrottle {
            pointer_ms: 16.0,
            ..Default::default()
        },
    );

    source.emit(SignalValue::resize(1440.0, 900.0, clock.now_ms()));

    // Each section animates in as it scrolls into view
    let mut sections = Vec::new();
    for (i, y) in [0.0f32, 400.0, 800.0, 1200.0, 1600.0, 2000.0, 2400.0, 2800.0, 3200.0, 3600.0]
        .into_iter()
        .enumerate()
    {
        clock.advance(16.0);
        source.emit(SignalValue::scroll(0.0, y, 0.0, 3600.0, clock.now_ms()));
        source.emit(SignalValue::pointer(720.0 + y / 10.0, 450.0, clock.now_ms()));
        sections.push(registry.start_activity(format!("section-{i}"), "entrance"));

        let prefs = registry.preferences();
        let state = viewport.state();
        tracing::info!(
            progress = state.scroll_progress,
            pointer = ?state.pointer_normalized,
            active = registry.active_count(),
            tier = %prefs.performance_tier,
            parallax_offset = prefs.intensity(48.0),
            "frame"
        );
    }

    // Entrance animations finish
    sections.clear();
    tracing::info!(tier = %registry.performance_tier(), "sections settled");

    registry.set_reduced_motion_override(Some(true));
    tracing::info!(should_animate = registry.should_animate(), "user enabled reduce motion");

    println!("{}", registry.diagnostics().to_json()?);
    Ok(())
}
