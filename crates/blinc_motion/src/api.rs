//! Free functions over the thread's global registry
//!
//! For code that has no registry reference at hand. Every function is a no-op
//! when no registry is installed, and [`animation_preferences`] returns the
//! fail-open default.
//!
//! ```
//! use blinc_motion::api::*;
//! use blinc_motion::{set_global_registry, clear_global_registry, MotionRegistry, SignalKind};
//!
//! set_global_registry(MotionRegistry::headless());
//!
//! track_animation("hero", "about-section");
//! subscribe_to_signal(SignalKind::Scroll, "parallax", |value| {
//!     let _ = value.timestamp_ms;
//! });
//!
//! let prefs = animation_preferences();
//! let offset = prefs.intensity(24.0);
//! assert!(offset <= 24.0);
//!
//! untrack_animation("hero");
//! unsubscribe_from_signal(SignalKind::Scroll, "parallax");
//! clear_global_registry();
//! ```

use blinc_platform::{SignalKind, SignalValue};

use crate::preferences::MotionPreferences;
use crate::registry::try_get_registry;

/// Subscribe `callback` to `kind` under `id`
pub fn subscribe_to_signal<F>(kind: SignalKind, id: impl Into<String>, callback: F)
where
    F: Fn(&SignalValue) + 'static,
{
    match try_get_registry() {
        Some(registry) => registry.subscribe(kind, id, callback),
        None => tracing::trace!(%kind, "no motion registry, subscribe ignored"),
    }
}

/// Remove the subscriber `id` from `kind`
pub fn unsubscribe_from_signal(kind: SignalKind, id: &str) {
    if let Some(registry) = try_get_registry() {
        registry.unsubscribe(kind, id);
    }
}

/// Register a running animation
pub fn track_animation(id: impl Into<String>, category: impl Into<String>) {
    if let Some(registry) = try_get_registry() {
        registry.track(id, category);
    }
}

/// Deregister a running animation
pub fn untrack_animation(id: &str) {
    if let Some(registry) = try_get_registry() {
        registry.untrack(id);
    }
}

/// Current motion decision
pub fn animation_preferences() -> MotionPreferences {
    try_get_registry()
        .map(|registry| registry.preferences())
        .unwrap_or_else(MotionPreferences::fail_open)
}
