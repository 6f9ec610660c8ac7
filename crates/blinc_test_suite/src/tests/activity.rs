//! Animation activity scenarios

use crate::harness::TestHarness;
use crate::runner::TestSuite;
use anyhow::ensure;
use blinc_motion::{MotionConfig, PerformanceTier};

/// Create the activity test suite
pub fn suite() -> TestSuite {
    let mut suite = TestSuite::new("activity");

    suite.add("track_is_idempotent", |ctx| {
        ctx.registry.track("x", "cat");
        ctx.registry.track("x", "cat");
        ensure!(ctx.registry.active_count() == 1);
        Ok(())
    });

    suite.add("untrack_unknown_is_noop", |ctx| {
        ctx.registry.untrack("never-tracked");
        ensure!(ctx.registry.active_count() == 0);
        Ok(())
    });

    // Sections scroll into view one by one, tier drops at the ninth
    suite.add("load_degrades_tier", |ctx| {
        ensure!(ctx.registry.performance_tier() == PerformanceTier::High);
        for i in 0..9 {
            ctx.registry.track(format!("section-{i}"), "entrance");
            let expected = if i < 8 {
                PerformanceTier::High
            } else {
                PerformanceTier::Medium
            };
            ensure!(
                ctx.registry.performance_tier() == expected,
                "{} tracked: {}",
                i + 1,
                ctx.registry.performance_tier()
            );
        }
        for i in 0..8 {
            ctx.registry.untrack(&format!("section-{i}"));
        }
        ensure!(ctx.registry.performance_tier() == PerformanceTier::High);
        Ok(())
    });

    suite.add("low_tier_stays_low", |ctx| {
        ctx.reconfigure(TestHarness::low_end_hints(), MotionConfig::default());
        for i in 0..20 {
            ctx.registry.track(format!("orb-{i}"), "mouse-tracking");
        }
        ensure!(ctx.registry.performance_tier() == PerformanceTier::Low);
        ensure!(ctx.registry.intensity(1.0) == 0.5);
        Ok(())
    });

    suite.add("activity_guards", |ctx| {
        let sections: Vec<_> = (0..4)
            .map(|i| ctx.registry.start_activity(format!("card-{i}"), "stagger"))
            .collect();
        ensure!(ctx.registry.active_count() == 4);
        ensure!(ctx.registry.active_categories() == vec!["stagger".to_string()]);

        drop(sections);
        ensure!(ctx.registry.active_count() == 0);
        Ok(())
    });

    suite.add("registered_at_uses_clock", |ctx| {
        ctx.advance(250.0);
        ctx.registry.track("hero", "about-section");
        let entry = ctx.registry.tracker().entry("hero");
        ensure!(entry.map(|e| e.registered_at_ms) == Some(250.0));
        Ok(())
    });

    suite
}
