//! RAII guards over the registry
//!
//! Components hold these instead of remembering to call `unsubscribe` or
//! `untrack` on teardown. Both hold the registry weakly, so a guard that
//! outlives its registry drops silently.

use blinc_platform::SignalKind;

use crate::registry::RegistryHandle;

// ============================================================================
// Signal Subscription
// ============================================================================

/// A live subscription; unsubscribes when dropped
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct SignalSubscription {
    handle: RegistryHandle,
    kind: SignalKind,
    id: String,
    active: bool,
}

impl SignalSubscription {
    pub(crate) fn new(handle: RegistryHandle, kind: SignalKind, id: String) -> Self {
        Self {
            handle,
            kind,
            id,
            active: true,
        }
    }

    pub fn kind(&self) -> SignalKind {
        self.kind
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Unsubscribe now instead of on drop
    pub fn cancel(&mut self) {
        if self.active {
            self.active = false;
            self.handle.unsubscribe(self.kind, &self.id);
        }
    }

    /// Keep the subscriber registered past the guard's lifetime
    pub fn detach(mut self) {
        self.active = false;
    }
}

impl Drop for SignalSubscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// Animation Activity
// ============================================================================

/// A tracked animation tied to a value's lifetime
///
/// ```
/// use blinc_motion::MotionRegistry;
///
/// let registry = MotionRegistry::headless();
/// {
///     let mut hero = registry.activity("hero", "about-section");
///     hero.start();
///     assert_eq!(registry.active_count(), 1);
/// } // untracked here
/// assert_eq!(registry.active_count(), 0);
/// ```
pub struct AnimationActivity {
    handle: RegistryHandle,
    id: String,
    category: String,
    running: bool,
}

impl AnimationActivity {
    pub(crate) fn new(
        handle: RegistryHandle,
        id: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            handle,
            id: id.into(),
            category: category.into(),
            running: false,
        }
    }

    /// Track the animation (refreshes it if already running)
    pub fn start(&mut self) {
        self.handle.track(self.id.as_str(), self.category.as_str());
        self.running = true;
    }

    /// Untrack the animation
    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            self.handle.untrack(&self.id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

impl Drop for AnimationActivity {
    fn drop(&mut self) {
        self.stop();
    }
}
