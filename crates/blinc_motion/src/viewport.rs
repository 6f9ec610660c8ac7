//! Viewport tracking
//!
//! A ready-made consumer of the three signal kinds for scroll- and
//! pointer-driven effects (parallax, scroll progress bars, cursor-following
//! orbs). The tracker owns one subscription per kind under a shared id prefix
//! and keeps a [`ViewportState`] that render code reads each frame.

use std::cell::Cell;
use std::rc::Rc;

use blinc_platform::{SignalKind, SignalPayload, SignalValue};

use crate::handle::SignalSubscription;
use crate::registry::MotionRegistry;
use crate::throttle::throttled;

/// Last known scroll, size and pointer state
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportState {
    pub scroll_x: f32,
    pub scroll_y: f32,
    /// Vertical scroll progress in `[0, 1]`
    pub scroll_progress: f32,
    pub width: f32,
    pub height: f32,
    pub pointer_x: f32,
    pub pointer_y: f32,
    /// Pointer relative to the viewport center, each axis in `[-1, 1]`
    pub pointer_normalized: (f32, f32),
    /// Timestamp of the last applied signal
    pub updated_at_ms: f64,
}

impl ViewportState {
    /// Fold one signal into the state
    pub fn apply(&mut self, value: &SignalValue) {
        match value.payload {
            SignalPayload::Scroll { x, y, max_y, .. } => {
                self.scroll_x = x;
                self.scroll_y = y;
                self.scroll_progress = if max_y > 0.0 {
                    (y / max_y).clamp(0.0, 1.0)
                } else {
                    0.0
                };
            }
            SignalPayload::Resize { width, height } => {
                self.width = width;
                self.height = height;
                self.renormalize_pointer();
            }
            SignalPayload::Pointer { x, y } => {
                self.pointer_x = x;
                self.pointer_y = y;
                self.renormalize_pointer();
            }
        }
        self.updated_at_ms = value.timestamp_ms;
    }

    fn renormalize_pointer(&mut self) {
        self.pointer_normalized = (
            normalize_axis(self.pointer_x, self.width),
            normalize_axis(self.pointer_y, self.height),
        );
    }
}

fn normalize_axis(position: f32, extent: f32) -> f32 {
    if extent <= 0.0 || !extent.is_finite() {
        return 0.0;
    }
    let half = extent / 2.0;
    ((position - half) / half).clamp(-1.0, 1.0)
}

/// Per-kind throttle intervals in milliseconds (`0` delivers everything)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportThrottle {
    pub scroll_ms: f64,
    pub resize_ms: f64,
    pub pointer_ms: f64,
}

impl ViewportThrottle {
    fn for_kind(&self, kind: SignalKind) -> f64 {
        match kind {
            SignalKind::Scroll => self.scroll_ms,
            SignalKind::Resize => self.resize_ms,
            SignalKind::PointerMove => self.pointer_ms,
        }
    }
}

/// Subscribes to every signal kind and keeps a [`ViewportState`]
///
/// ```
/// use blinc_motion::viewport::ViewportTracker;
/// use blinc_motion::MotionRegistry;
/// use blinc_platform::SignalValue;
///
/// let registry = MotionRegistry::headless();
/// let viewport = ViewportTracker::new(&registry, "hero-parallax");
///
/// // Hosts without a native listener feed events through dispatch
/// registry.dispatch(&SignalValue::resize(800.0, 600.0, 0.0));
/// assert_eq!(viewport.state().width, 0.0); // headless: nothing subscribed
/// ```
pub struct ViewportTracker {
    state: Rc<Cell<ViewportState>>,
    _subscriptions: Vec<SignalSubscription>,
}

impl ViewportTracker {
    /// Track every signal unthrottled
    pub fn new(registry: &MotionRegistry, id_prefix: &str) -> Self {
        Self::with_throttle(registry, id_prefix, ViewportThrottle::default())
    }

    /// Track every signal, throttling each kind independently
    pub fn with_throttle(
        registry: &MotionRegistry,
        id_prefix: &str,
        throttle: ViewportThrottle,
    ) -> Self {
        let state = Rc::new(Cell::new(ViewportState::default()));

        let subscriptions = SignalKind::ALL
            .into_iter()
            .map(|kind| {
                let state = Rc::clone(&state);
                let update = move |value: &SignalValue| {
                    let mut next = state.get();
                    next.apply(value);
                    state.set(next);
                };
                let id = format!("{id_prefix}:{}", kind.event_name());
                let interval = throttle.for_kind(kind);
                if interval > 0.0 {
                    registry.subscription(kind, id, throttled(interval, update))
                } else {
                    registry.subscription(kind, id, update)
                }
            })
            .collect();

        Self {
            state,
            _subscriptions: subscriptions,
        }
    }

    /// Current state
    pub fn state(&self) -> ViewportState {
        self.state.get()
    }

    pub fn scroll_progress(&self) -> f32 {
        self.state.get().scroll_progress
    }

    pub fn pointer_normalized(&self) -> (f32, f32) {
        self.state.get().pointer_normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blinc_platform::testing::{RecordingSignalSource, ScriptedEnvironment};

    fn recording_registry() -> (MotionRegistry, Rc<RecordingSignalSource>) {
        let source = Rc::new(RecordingSignalSource::new());
        let registry = MotionRegistry::new(source.clone(), Rc::new(ScriptedEnvironment::new()));
        (registry, source)
    }

    #[test]
    fn test_state_from_signals() {
        let (registry, source) = recording_registry();
        let viewport = ViewportTracker::new(&registry, "orb");

        source.emit(SignalValue::resize(800.0, 600.0, 1.0));
        source.emit(SignalValue::scroll(0.0, 250.0, 0.0, 1000.0, 2.0));
        source.emit(SignalValue::pointer(600.0, 150.0, 3.0));

        let state = viewport.state();
        assert_eq!(state.width, 800.0);
        assert_eq!(state.scroll_progress, 0.25);
        assert_eq!(state.pointer_normalized, (0.5, -0.5));
        assert_eq!(state.updated_at_ms, 3.0);
    }

    #[test]
    fn test_pointer_normalization_is_clamped() {
        let mut state = ViewportState::default();
        state.apply(&SignalValue::pointer(5000.0, -20.0, 0.0));
        // Unknown viewport size
        assert_eq!(state.pointer_normalized, (0.0, 0.0));

        state.apply(&SignalValue::resize(100.0, 100.0, 1.0));
        assert_eq!(state.pointer_normalized, (1.0, -1.0));
    }

    #[test]
    fn test_unscrollable_page_has_zero_progress() {
        let mut state = ViewportState::default();
        state.apply(&SignalValue::scroll(0.0, 40.0, 0.0, 0.0, 0.0));
        assert_eq!(state.scroll_progress, 0.0);
    }

    #[test]
    fn test_throttled_pointer() {
        let (registry, source) = recording_registry();
        let viewport = ViewportTracker::with_throttle(
            &registry,
            "cursor",
            ViewportThrottle {
                pointer_ms: 100.0,
                ..Default::default()
            },
        );

        source.emit(SignalValue::pointer(10.0, 10.0, 0.0));
        source.emit(SignalValue::pointer(20.0, 20.0, 50.0));
        assert_eq!(viewport.state().pointer_x, 10.0);

        source.emit(SignalValue::pointer(30.0, 30.0, 100.0));
        assert_eq!(viewport.state().pointer_x, 30.0);
    }

    #[test]
    fn test_drop_releases_listeners() {
        let (registry, source) = recording_registry();
        let viewport = ViewportTracker::new(&registry, "hero");
        assert_eq!(source.attached_listeners(), 3);

        drop(viewport);
        assert_eq!(source.attached_listeners(), 0);
        assert_eq!(registry.diagnostics().subscribers.scroll, 0);
    }
}
