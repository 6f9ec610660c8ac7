//! Preference resolution
//!
//! Combines three live inputs into one decision consumers read per frame:
//!
//! | Input | Source | Fallback when unavailable |
//! |---|---|---|
//! | Reduced motion | media query (+ change notification) or user override | `false` |
//! | Page visibility | host visibility state | visible |
//! | Performance tier | device hints, degraded by tracked animation load | medium |
//!
//! Nothing here is stored except the last observed reduced-motion value; every
//! other read goes back to the environment and the tracker.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use blinc_platform::MotionEnvironment;
use serde::{Deserialize, Serialize};

use crate::config::MotionConfig;
use crate::tracker::ActivityTracker;

/// Coarse device/load classification
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    Low,
    #[default]
    Medium,
    High,
}

impl PerformanceTier {
    /// One tier lower (low stays low)
    pub fn degraded(self) -> Self {
        match self {
            PerformanceTier::High => PerformanceTier::Medium,
            PerformanceTier::Medium | PerformanceTier::Low => PerformanceTier::Low,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PerformanceTier::Low => "low",
            PerformanceTier::Medium => "medium",
            PerformanceTier::High => "high",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scale `base` by `multiplier`, clamped to `[0, base]`
///
/// Non-positive and NaN bases yield 0, which keeps the result monotonically
/// non-decreasing in `base`. A NaN product also yields 0.
pub fn scale_intensity(base: f32, multiplier: f32) -> f32 {
    if base.is_nan() || base <= 0.0 {
        return 0.0;
    }
    let scaled = base * multiplier;
    if scaled.is_nan() {
        return 0.0;
    }
    scaled.clamp(0.0, base)
}

/// Snapshot of the motion decision for one render/frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionPreferences {
    /// Whether animations should run at all
    pub should_animate: bool,
    /// Reduced-motion preference (system or user override)
    pub reduced_motion: bool,
    /// Current performance tier
    pub performance_tier: PerformanceTier,
    /// Intensity multiplier for `performance_tier`
    pub multiplier: f32,
}

impl MotionPreferences {
    /// Decision used when no registry or host is available: animate normally
    pub fn fail_open() -> Self {
        let tier = PerformanceTier::default();
        Self {
            should_animate: true,
            reduced_motion: false,
            performance_tier: tier,
            multiplier: MotionConfig::default().multipliers.for_tier(tier),
        }
    }

    /// Scale an animation magnitude by the tier multiplier
    pub fn intensity(&self, base: f32) -> f32 {
        scale_intensity(base, self.multiplier)
    }
}

impl Default for MotionPreferences {
    fn default() -> Self {
        Self::fail_open()
    }
}

/// Computes [`MotionPreferences`] on demand
pub struct PreferenceResolver {
    environment: Rc<dyn MotionEnvironment>,
    tracker: Rc<ActivityTracker>,
    config: MotionConfig,
    /// Last value pushed by the environment; `None` when change notification
    /// is unavailable and every read queries the environment
    observed_reduced_motion: Rc<Cell<Option<bool>>>,
    reduced_motion_override: Cell<Option<bool>>,
}

impl PreferenceResolver {
    pub fn new(
        environment: Rc<dyn MotionEnvironment>,
        tracker: Rc<ActivityTracker>,
        config: MotionConfig,
    ) -> Self {
        let observed = Rc::new(Cell::new(None));

        let weak = Rc::downgrade(&observed);
        let watch = environment.watch_reduced_motion(Rc::new(move |reduced: bool| {
            if let Some(cell) = weak.upgrade() {
                tracing::debug!(reduced, "reduced-motion preference changed");
                cell.set(Some(reduced));
            }
        }));
        match watch {
            Ok(()) => {
                let initial = environment.prefers_reduced_motion().unwrap_or_else(|err| {
                    tracing::debug!(error = %err, "reduced-motion query failed, assuming false");
                    false
                });
                observed.set(Some(initial));
            }
            Err(err) => {
                tracing::debug!(
                    backend = environment.name(),
                    error = %err,
                    "reduced-motion changes not observable, querying per read"
                );
            }
        }

        Self {
            environment,
            tracker,
            config,
            observed_reduced_motion: observed,
            reduced_motion_override: Cell::new(None),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// Force reduced motion on or off; `None` follows the system preference
    pub fn set_reduced_motion_override(&self, value: Option<bool>) {
        self.reduced_motion_override.set(value);
    }

    pub fn reduced_motion_override(&self) -> Option<bool> {
        self.reduced_motion_override.get()
    }

    /// Current reduced-motion flag
    pub fn reduced_motion(&self) -> bool {
        if let Some(forced) = self.reduced_motion_override.get() {
            return forced;
        }
        if let Some(observed) = self.observed_reduced_motion.get() {
            return observed;
        }
        self.environment.prefers_reduced_motion().unwrap_or_else(|err| {
            tracing::trace!(error = %err, "reduced-motion query failed, assuming false");
            false
        })
    }

    /// Whether the page is visible (visible when unknown)
    pub fn page_visible(&self) -> bool {
        self.environment.is_page_visible().unwrap_or_else(|err| {
            tracing::trace!(error = %err, "visibility query failed, assuming visible");
            true
        })
    }

    /// Tier from device hints alone
    pub fn base_tier(&self) -> PerformanceTier {
        match self.environment.device_hints() {
            Ok(hints) => self.config.base_tier(&hints),
            Err(err) => {
                tracing::trace!(error = %err, "device hints unavailable, assuming medium tier");
                PerformanceTier::Medium
            }
        }
    }

    /// Whether tracked animation load exceeds the degrade threshold
    pub fn is_under_load(&self) -> bool {
        self.tracker.active_count() > self.config.degrade_threshold
    }

    /// Device tier, degraded by one under load
    pub fn performance_tier(&self) -> PerformanceTier {
        let base = self.base_tier();
        if self.is_under_load() {
            base.degraded()
        } else {
            base
        }
    }

    /// Scale `base` by the current tier's multiplier, clamped to `[0, base]`
    pub fn intensity(&self, base: f32) -> f32 {
        scale_intensity(base, self.multiplier_for(self.performance_tier()))
    }

    /// `false` under reduced motion or while the page is hidden
    pub fn should_animate(&self) -> bool {
        !self.reduced_motion() && self.page_visible()
    }

    /// Full decision snapshot
    pub fn snapshot(&self) -> MotionPreferences {
        let reduced_motion = self.reduced_motion();
        let performance_tier = self.performance_tier();
        MotionPreferences {
            should_animate: !reduced_motion && self.page_visible(),
            reduced_motion,
            performance_tier,
            multiplier: self.multiplier_for(performance_tier),
        }
    }

    fn multiplier_for(&self, tier: PerformanceTier) -> f32 {
        self.config.multipliers.for_tier(tier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blinc_platform::testing::ScriptedEnvironment;
    use blinc_platform::{DeviceHints, HeadlessEnvironment};

    fn resolver_with(env: Rc<dyn MotionEnvironment>) -> (PreferenceResolver, Rc<ActivityTracker>) {
        let tracker = Rc::new(ActivityTracker::new());
        let resolver = PreferenceResolver::new(env, Rc::clone(&tracker), MotionConfig::default());
        (resolver, tracker)
    }

    #[test]
    fn test_tier_ordering_and_degrade() {
        assert!(PerformanceTier::Low < PerformanceTier::Medium);
        assert!(PerformanceTier::Medium < PerformanceTier::High);
        assert_eq!(PerformanceTier::High.degraded(), PerformanceTier::Medium);
        assert_eq!(PerformanceTier::Medium.degraded(), PerformanceTier::Low);
        assert_eq!(PerformanceTier::Low.degraded(), PerformanceTier::Low);
    }

    #[test]
    fn test_intensity_bounds() {
        assert_eq!(scale_intensity(1.0, 0.5), 0.5);
        assert_eq!(scale_intensity(1.0, 1.0), 1.0);
        assert_eq!(scale_intensity(-3.0, 0.5), 0.0);
        assert_eq!(scale_intensity(f32::NAN, 0.5), 0.0);
        assert_eq!(scale_intensity(4.0, f32::NAN), 0.0);
        assert_eq!(scale_intensity(4.0, f32::INFINITY), 4.0);

        for multiplier in [0.5, 0.75, 1.0] {
            let mut previous = f32::NEG_INFINITY;
            for step in -10..=40 {
                let base = step as f32 * 0.25;
                let value = scale_intensity(base, multiplier);
                assert!(value >= previous, "not monotonic at base {base}");
                assert!(value >= 0.0);
                assert!(base <= 0.0 || value <= base);
                previous = value;
            }
        }
    }

    #[test]
    fn test_reduced_motion_disables_animation() {
        let env = Rc::new(ScriptedEnvironment::new().with_hints(DeviceHints::unknown().cores(16)));
        let (resolver, tracker) = resolver_with(env.clone());

        env.set_reduced_motion(true);
        for i in 0..12 {
            tracker.track(format!("anim-{i}"), "load");
            assert!(!resolver.should_animate());
        }
    }

    #[test]
    fn test_hidden_page_disables_animation() {
        let env = Rc::new(ScriptedEnvironment::new());
        let (resolver, _) = resolver_with(env.clone());

        assert!(resolver.should_animate());
        env.set_visible(false);
        assert!(!resolver.should_animate());
        assert!(!resolver.snapshot().should_animate);
        assert!(!resolver.reduced_motion());
    }

    #[test]
    fn test_live_change_is_observed() {
        let env = Rc::new(ScriptedEnvironment::new());
        let (resolver, _) = resolver_with(env.clone());
        assert_eq!(env.watcher_count(), 1);

        assert!(!resolver.reduced_motion());
        env.set_reduced_motion(true);
        assert!(resolver.reduced_motion());
        env.set_reduced_motion(false);
        assert!(!resolver.reduced_motion());
    }

    #[test]
    fn test_polls_without_change_notification() {
        let env = Rc::new(ScriptedEnvironment::without_change_notification());
        let (resolver, _) = resolver_with(env.clone());
        assert_eq!(env.watcher_count(), 0);

        env.set_reduced_motion(true);
        assert!(resolver.reduced_motion());
    }

    #[test]
    fn test_override_wins() {
        let env = Rc::new(ScriptedEnvironment::new());
        let (resolver, _) = resolver_with(env.clone());

        resolver.set_reduced_motion_override(Some(true));
        assert!(resolver.reduced_motion());
        assert!(!resolver.should_animate());

        env.set_reduced_motion(true);
        resolver.set_reduced_motion_override(Some(false));
        assert!(!resolver.reduced_motion());

        resolver.set_reduced_motion_override(None);
        assert!(resolver.reduced_motion());
    }

    #[test]
    fn test_headless_fails_open() {
        let (resolver, _) = resolver_with(Rc::new(HeadlessEnvironment));
        let snapshot = resolver.snapshot();
        assert!(!snapshot.reduced_motion);
        assert!(snapshot.should_animate);
        assert_eq!(snapshot.performance_tier, PerformanceTier::Medium);
        assert_eq!(snapshot, MotionPreferences::fail_open());
    }

    #[test]
    fn test_unavailable_after_construction_fails_open() {
        let env = Rc::new(ScriptedEnvironment::without_change_notification());
        let (resolver, _) = resolver_with(env.clone());
        env.set_reduced_motion(true);
        env.set_available(false);

        assert!(!resolver.reduced_motion());
        assert!(resolver.should_animate());
        assert_eq!(resolver.performance_tier(), PerformanceTier::Medium);
    }

    #[test]
    fn test_load_degrades_tier() {
        let env = Rc::new(ScriptedEnvironment::new().with_hints(DeviceHints::unknown().cores(8)));
        let (resolver, tracker) = resolver_with(env);

        for i in 0..8 {
            tracker.track(format!("a{i}"), "load");
        }
        assert_eq!(resolver.performance_tier(), PerformanceTier::High);

        tracker.track("a8", "load");
        assert!(resolver.is_under_load());
        assert_eq!(resolver.performance_tier(), PerformanceTier::Medium);
        assert_eq!(resolver.intensity(1.0), 0.75);
    }

    #[test]
    fn test_tier_intensity() {
        let low = Rc::new(ScriptedEnvironment::new().with_hints(DeviceHints::unknown().cores(2)));
        let (resolver, _) = resolver_with(low);
        assert_eq!(resolver.performance_tier(), PerformanceTier::Low);
        assert_eq!(resolver.intensity(1.0), 0.5);

        let high = Rc::new(ScriptedEnvironment::new().with_hints(DeviceHints::unknown().cores(10)));
        let (resolver, _) = resolver_with(high);
        assert_eq!(resolver.performance_tier(), PerformanceTier::High);
        assert_eq!(resolver.intensity(1.0), 1.0);
        assert_eq!(resolver.snapshot().intensity(40.0), 40.0);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        let json = serde_json::to_string(&PerformanceTier::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
