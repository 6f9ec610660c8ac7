//! Blinc Motion Coordination
//!
//! Shared infrastructure every animated component consults: one native
//! listener per host signal, a count of running animations, and a single
//! per-frame decision about whether and how strongly to animate.
//!
//! # Features
//!
//! - **Event Multiplexer**: One native listener per signal kind, fanned out to keyed subscribers
//! - **Activity Tracker**: Idempotent registry of running animations
//! - **Preference Resolver**: Reduced motion, page visibility and performance tier in one snapshot
//! - **Load Degradation**: Tier drops by one while too many animations run
//! - **RAII Handles**: Subscriptions and activities deregister on drop
//! - **Viewport Tracking**: Scroll progress and normalized pointer position
//! - **Fail Open**: Every host failure resolves to "animate normally"
//!
//! # Example
//!
//! ```
//! use blinc_motion::{MotionRegistry, PerformanceTier, SignalKind};
//!
//! let registry = MotionRegistry::headless();
//!
//! let _scroll = registry.subscription(SignalKind::Scroll, "parallax", |value| {
//!     println!("{:?}", value.payload);
//! });
//! let _hero = registry.start_activity("hero", "about-section");
//!
//! let prefs = registry.preferences();
//! if prefs.should_animate {
//!     let offset = prefs.intensity(32.0);
//!     assert!(offset <= 32.0);
//! }
//! assert_eq!(prefs.performance_tier, PerformanceTier::Medium);
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod handle;
pub mod multiplexer;
pub mod preferences;
pub mod registry;
pub mod throttle;
pub mod tracker;
pub mod viewport;

pub use api::{
    animation_preferences, subscribe_to_signal, track_animation, unsubscribe_from_signal,
    untrack_animation,
};
pub use config::{MotionConfig, TierMultipliers};
pub use error::{MotionError, Result};
pub use handle::{AnimationActivity, SignalSubscription};
pub use multiplexer::{CallbackError, EventMultiplexer, SignalCallback};
pub use preferences::{scale_intensity, MotionPreferences, PerformanceTier, PreferenceResolver};
pub use registry::{
    clear_global_registry, is_registry_initialized, set_global_registry, try_get_registry,
    MotionDiagnostics, MotionRegistry, MotionRegistryBuilder, RegistryHandle, SubscriberCounts,
};
pub use throttle::throttled;
pub use tracker::{ActivityTracker, TrackedAnimation};
pub use viewport::{ViewportState, ViewportThrottle, ViewportTracker};

// Host types consumers need alongside the registry
pub use blinc_platform::{SignalKind, SignalPayload, SignalValue};
