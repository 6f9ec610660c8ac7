//! Motion registry
//!
//! Owns the event multiplexer, the activity tracker and the preference
//! resolver. Built once at app startup and either passed to consumers or
//! installed as the thread's global registry.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use blinc_platform::{
    Clock, HeadlessEnvironment, HeadlessSignalSource, MotionEnvironment, SignalKind, SignalSource,
    SignalValue, SystemClock,
};
use serde::Serialize;

use crate::config::MotionConfig;
use crate::error::Result;
use crate::handle::{AnimationActivity, SignalSubscription};
use crate::multiplexer::{CallbackError, EventMultiplexer};
use crate::preferences::{MotionPreferences, PerformanceTier, PreferenceResolver};
use crate::tracker::ActivityTracker;

// ============================================================================
// Global Motion Registry
// ============================================================================

thread_local! {
    /// The registry for this (UI) thread
    static GLOBAL_REGISTRY: RefCell<Option<MotionRegistry>> = const { RefCell::new(None) };
}

/// Install the thread's global motion registry
///
/// This should be called once at app startup after building the registry.
///
/// # Panics
///
/// Panics if a registry is already installed on this thread. Call
/// [`clear_global_registry`] first to replace it.
pub fn set_global_registry(registry: MotionRegistry) {
    GLOBAL_REGISTRY.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            panic!("set_global_registry() called while a registry is installed");
        }
        *slot = Some(registry);
    });
}

/// Get the global registry (returns None if not installed)
pub fn try_get_registry() -> Option<MotionRegistry> {
    GLOBAL_REGISTRY.with(|slot| slot.borrow().clone())
}

/// Check if the global registry has been installed
pub fn is_registry_initialized() -> bool {
    GLOBAL_REGISTRY.with(|slot| slot.borrow().is_some())
}

/// Remove the global registry, returning it
///
/// Intended for test isolation and hot reload; outstanding handles become
/// inert once the returned registry is dropped, and its native listeners are
/// detached so a replacement can attach to the same source.
pub fn clear_global_registry() -> Option<MotionRegistry> {
    GLOBAL_REGISTRY.with(|slot| slot.borrow_mut().take())
}

// ============================================================================
// Registry
// ============================================================================

struct RegistryInner {
    multiplexer: EventMultiplexer,
    tracker: Rc<ActivityTracker>,
    resolver: PreferenceResolver,
    source_name: &'static str,
    environment_name: &'static str,
}

/// Builder for [`MotionRegistry`]
///
/// Defaults to a headless source and environment with the system clock. On
/// wasm32, supply a clock from the web backend; `SystemClock` panics there.
pub struct MotionRegistryBuilder {
    source: Rc<dyn SignalSource>,
    environment: Rc<dyn MotionEnvironment>,
    clock: Option<Rc<dyn Clock>>,
    config: MotionConfig,
}

impl MotionRegistryBuilder {
    pub fn signal_source(mut self, source: Rc<dyn SignalSource>) -> Self {
        self.source = source;
        self
    }

    pub fn environment(mut self, environment: Rc<dyn MotionEnvironment>) -> Self {
        self.environment = environment;
        self
    }

    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn config(mut self, config: MotionConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the registry
    ///
    /// A config that fails [`MotionConfig::validate`] is replaced by the
    /// default.
    pub fn build(self) -> MotionRegistry {
        let config = match self.config.validate() {
            Ok(()) => self.config,
            Err(err) => {
                tracing::debug!(error = %err, "invalid motion config, using defaults");
                MotionConfig::default()
            }
        };
        let clock = self
            .clock
            .unwrap_or_else(|| Rc::new(SystemClock::new()) as Rc<dyn Clock>);
        let tracker = Rc::new(ActivityTracker::with_clock(clock));
        let resolver =
            PreferenceResolver::new(Rc::clone(&self.environment), Rc::clone(&tracker), config);

        tracing::debug!(
            source = self.source.name(),
            environment = self.environment.name(),
            "motion registry created"
        );

        MotionRegistry {
            inner: Rc::new(RegistryInner {
                source_name: self.source.name(),
                environment_name: self.environment.name(),
                multiplexer: EventMultiplexer::new(self.source),
                tracker,
                resolver,
            }),
        }
    }
}

/// The animation coordination registry
///
/// Cloning is cheap; clones share state.
///
/// ```
/// use blinc_motion::MotionRegistry;
///
/// let registry = MotionRegistry::headless();
/// registry.track("hero", "about-section");
/// assert_eq!(registry.active_count(), 1);
///
/// let prefs = registry.preferences();
/// assert!(prefs.should_animate);
/// let offset = prefs.intensity(24.0);
/// assert!(offset <= 24.0);
/// ```
#[derive(Clone)]
pub struct MotionRegistry {
    inner: Rc<RegistryInner>,
}

impl MotionRegistry {
    pub fn builder() -> MotionRegistryBuilder {
        MotionRegistryBuilder {
            source: Rc::new(HeadlessSignalSource),
            environment: Rc::new(HeadlessEnvironment),
            clock: None,
            config: MotionConfig::default(),
        }
    }

    /// Registry with default config over the given host
    pub fn new(source: Rc<dyn SignalSource>, environment: Rc<dyn MotionEnvironment>) -> Self {
        Self::builder()
            .signal_source(source)
            .environment(environment)
            .build()
    }

    /// Registry with no host: subscriptions are no-ops, preferences fail open
    pub fn headless() -> Self {
        Self::builder().build()
    }

    /// Get a weak handle for components
    pub fn handle(&self) -> RegistryHandle {
        RegistryHandle {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // =========================================================================
    // Signals
    // =========================================================================

    /// Subscribe `callback` to `kind` under `id` (replaces an existing `id`)
    pub fn subscribe<F>(&self, kind: SignalKind, id: impl Into<String>, callback: F)
    where
        F: Fn(&SignalValue) + 'static,
    {
        self.inner.multiplexer.subscribe(kind, id, callback);
    }

    /// Subscribe a fallible `callback`; an `Err` is logged and the other
    /// subscribers still run
    pub fn try_subscribe<F, E>(&self, kind: SignalKind, id: impl Into<String>, callback: F)
    where
        F: Fn(&SignalValue) -> std::result::Result<(), E> + 'static,
        E: Into<CallbackError>,
    {
        self.inner.multiplexer.try_subscribe(kind, id, callback);
    }

    /// Remove a subscriber; unknown ids are ignored
    pub fn unsubscribe(&self, kind: SignalKind, id: &str) {
        self.inner.multiplexer.unsubscribe(kind, id);
    }

    /// Subscribe and return a guard that unsubscribes on drop
    pub fn subscription<F>(
        &self,
        kind: SignalKind,
        id: impl Into<String>,
        callback: F,
    ) -> SignalSubscription
    where
        F: Fn(&SignalValue) + 'static,
    {
        let id = id.into();
        self.subscribe(kind, id.clone(), callback);
        SignalSubscription::new(self.handle(), kind, id)
    }

    /// Deliver a host event directly (hosts without a native listener, tests)
    pub fn dispatch(&self, value: &SignalValue) -> usize {
        self.inner.multiplexer.dispatch(value)
    }

    pub fn multiplexer(&self) -> &EventMultiplexer {
        &self.inner.multiplexer
    }

    // =========================================================================
    // Activity
    // =========================================================================

    /// Track an animation (refreshes an existing `id`)
    pub fn track(&self, id: impl Into<String>, category: impl Into<String>) {
        let before = self.inner.tracker.active_count();
        self.inner.tracker.track(id, category);
        self.log_load_change(before);
    }

    /// Stop tracking an animation; unknown ids are ignored
    pub fn untrack(&self, id: &str) {
        let before = self.inner.tracker.active_count();
        self.inner.tracker.untrack(id);
        self.log_load_change(before);
    }

    /// Create an activity handle (not yet started)
    pub fn activity(&self, id: impl Into<String>, category: impl Into<String>) -> AnimationActivity {
        AnimationActivity::new(self.handle(), id, category)
    }

    /// Track an animation and return a handle that untracks on drop
    pub fn start_activity(
        &self,
        id: impl Into<String>,
        category: impl Into<String>,
    ) -> AnimationActivity {
        let mut activity = self.activity(id, category);
        activity.start();
        activity
    }

    pub fn active_count(&self) -> usize {
        self.inner.tracker.active_count()
    }

    pub fn active_categories(&self) -> Vec<String> {
        self.inner.tracker.active_categories()
    }

    pub fn tracker(&self) -> &ActivityTracker {
        &self.inner.tracker
    }

    fn log_load_change(&self, before: usize) {
        let threshold = self.inner.resolver.config().degrade_threshold;
        let after = self.inner.tracker.active_count();
        if before <= threshold && after > threshold {
            tracing::debug!(active = after, threshold, "animation load above threshold, degrading tier");
        } else if before > threshold && after <= threshold {
            tracing::debug!(active = after, threshold, "animation load back under threshold");
        }
    }

    // =========================================================================
    // Preferences
    // =========================================================================

    /// Decision snapshot for this frame
    pub fn preferences(&self) -> MotionPreferences {
        self.inner.resolver.snapshot()
    }

    pub fn reduced_motion(&self) -> bool {
        self.inner.resolver.reduced_motion()
    }

    pub fn performance_tier(&self) -> PerformanceTier {
        self.inner.resolver.performance_tier()
    }

    pub fn intensity(&self, base: f32) -> f32 {
        self.inner.resolver.intensity(base)
    }

    pub fn should_animate(&self) -> bool {
        self.inner.resolver.should_animate()
    }

    /// Force reduced motion on or off; `None` follows the system preference
    pub fn set_reduced_motion_override(&self, value: Option<bool>) {
        tracing::debug!(?value, "reduced-motion override set");
        self.inner.resolver.set_reduced_motion_override(value);
    }

    pub fn resolver(&self) -> &PreferenceResolver {
        &self.inner.resolver
    }

    pub fn config(&self) -> &MotionConfig {
        self.inner.resolver.config()
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Point-in-time view of the registry for debug overlays and logs
    pub fn diagnostics(&self) -> MotionDiagnostics {
        let mux = &self.inner.multiplexer;
        MotionDiagnostics {
            source: self.inner.source_name,
            environment: self.inner.environment_name,
            active_animations: self.active_count(),
            categories: self.active_categories(),
            subscribers: SubscriberCounts {
                scroll: mux.subscriber_count(SignalKind::Scroll),
                resize: mux.subscriber_count(SignalKind::Resize),
                pointer_move: mux.subscriber_count(SignalKind::PointerMove),
            },
            attached_listeners: SignalKind::ALL
                .into_iter()
                .filter(|kind| mux.is_attached(*kind))
                .count(),
            preferences: self.preferences(),
        }
    }

    /// Drop every subscriber and tracked animation
    pub fn reset(&self) {
        self.inner.multiplexer.clear();
        self.inner.tracker.clear();
        self.inner.resolver.set_reduced_motion_override(None);
    }
}

/// A weak handle to the motion registry
///
/// Held by guards and long-lived components. It won't keep the registry
/// alive; once the registry is dropped every operation is a no-op.
#[derive(Clone)]
pub struct RegistryHandle {
    inner: Weak<RegistryInner>,
}

impl RegistryHandle {
    /// Get a strong registry, if it is still alive
    pub fn upgrade(&self) -> Option<MotionRegistry> {
        self.inner.upgrade().map(|inner| MotionRegistry { inner })
    }

    /// Check if the registry is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn subscribe<F>(&self, kind: SignalKind, id: impl Into<String>, callback: F)
    where
        F: Fn(&SignalValue) + 'static,
    {
        if let Some(registry) = self.upgrade() {
            registry.subscribe(kind, id, callback);
        }
    }

    pub fn unsubscribe(&self, kind: SignalKind, id: &str) {
        if let Some(registry) = self.upgrade() {
            registry.unsubscribe(kind, id);
        }
    }

    pub fn track(&self, id: impl Into<String>, category: impl Into<String>) {
        if let Some(registry) = self.upgrade() {
            registry.track(id, category);
        }
    }

    pub fn untrack(&self, id: &str) {
        if let Some(registry) = self.upgrade() {
            registry.untrack(id);
        }
    }

    /// Current preferences, or the fail-open default if the registry is gone
    pub fn preferences(&self) -> MotionPreferences {
        self.upgrade()
            .map(|registry| registry.preferences())
            .unwrap_or_else(MotionPreferences::fail_open)
    }
}

/// Subscriber count per signal kind
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SubscriberCounts {
    pub scroll: usize,
    pub resize: usize,
    pub pointer_move: usize,
}

/// Immutable snapshot of registry state
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MotionDiagnostics {
    /// Signal source backend
    pub source: &'static str,
    /// Environment backend
    pub environment: &'static str,
    pub active_animations: usize,
    pub categories: Vec<String>,
    pub subscribers: SubscriberCounts,
    /// Native listeners currently attached
    pub attached_listeners: usize,
    pub preferences: MotionPreferences,
}

impl MotionDiagnostics {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
