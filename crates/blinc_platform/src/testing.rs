//! Scriptable host doubles for headless tests
//!
//! - [`RecordingSignalSource`] counts native attach/detach calls and lets a
//!   test emit host events through the attached listener.
//! - [`ScriptedEnvironment`] exposes settable reduced-motion, visibility and
//!   device hints, including change notification.
//! - [`ManualClock`] is advanced by hand.

use std::cell::{Cell, RefCell};

use crate::clock::Clock;
use crate::environment::{DeviceHints, MotionEnvironment, ReducedMotionCallback};
use crate::error::{PlatformError, Result};
use crate::signal::{SignalKind, SignalValue};
use crate::source::{SignalSink, SignalSource};

/// Signal source that records every attach/detach
#[derive(Default)]
pub struct RecordingSignalSource {
    sinks: RefCell<[Option<SignalSink>; SignalKind::COUNT]>,
    attach_counts: [Cell<usize>; SignalKind::COUNT],
    detach_counts: [Cell<usize>; SignalKind::COUNT],
    failing: Cell<bool>,
}

impl RecordingSignalSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent attach calls fail (simulates a missing host)
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    /// Number of successful attach calls for `kind`
    pub fn attach_count(&self, kind: SignalKind) -> usize {
        self.attach_counts[kind.index()].get()
    }

    /// Number of detach calls for `kind`
    pub fn detach_count(&self, kind: SignalKind) -> usize {
        self.detach_counts[kind.index()].get()
    }

    /// Whether a native listener is currently attached for `kind`
    pub fn is_attached(&self, kind: SignalKind) -> bool {
        self.sinks.borrow()[kind.index()].is_some()
    }

    /// Total number of attached native listeners
    pub fn attached_listeners(&self) -> usize {
        self.sinks.borrow().iter().filter(|s| s.is_some()).count()
    }

    /// Deliver a host event through the attached listener
    ///
    /// Returns `false` when nothing is attached for the value's kind.
    pub fn emit(&self, value: SignalValue) -> bool {
        // Clone out of the borrow so the sink may re-enter attach/detach.
        let sink = self.sinks.borrow()[value.kind().index()].clone();
        match sink {
            Some(sink) => {
                sink(&value);
                true
            }
            None => false,
        }
    }
}

impl SignalSource for RecordingSignalSource {
    fn attach(&self, kind: SignalKind, sink: SignalSink) -> Result<()> {
        if self.failing.get() {
            return Err(PlatformError::Unavailable("recording source set to fail".to_string()));
        }
        let mut sinks = self.sinks.borrow_mut();
        if sinks[kind.index()].is_some() {
            return Err(PlatformError::Listener(format!("{kind} listener already attached")));
        }
        sinks[kind.index()] = Some(sink);
        let count = &self.attach_counts[kind.index()];
        count.set(count.get() + 1);
        Ok(())
    }

    fn detach(&self, kind: SignalKind) -> Result<()> {
        let removed = self.sinks.borrow_mut()[kind.index()].take();
        if removed.is_none() {
            return Err(PlatformError::Listener(format!("{kind} listener not attached")));
        }
        let count = &self.detach_counts[kind.index()];
        count.set(count.get() + 1);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Environment with settable state
pub struct ScriptedEnvironment {
    reduced_motion: Cell<bool>,
    visible: Cell<bool>,
    hints: Cell<DeviceHints>,
    available: Cell<bool>,
    supports_watch: bool,
    watchers: RefCell<Vec<ReducedMotionCallback>>,
}

impl ScriptedEnvironment {
    /// Visible page, no reduced motion, no hints, change notification supported
    pub fn new() -> Self {
        Self {
            reduced_motion: Cell::new(false),
            visible: Cell::new(true),
            hints: Cell::new(DeviceHints::unknown()),
            available: Cell::new(true),
            supports_watch: true,
            watchers: RefCell::new(Vec::new()),
        }
    }

    /// Environment whose reduced-motion query has no change notification
    pub fn without_change_notification() -> Self {
        Self {
            supports_watch: false,
            ..Self::new()
        }
    }

    /// Builder: set device hints
    pub fn with_hints(self, hints: DeviceHints) -> Self {
        self.hints.set(hints);
        self
    }

    /// Change the reduced-motion preference, notifying watchers
    pub fn set_reduced_motion(&self, reduced: bool) {
        self.reduced_motion.set(reduced);
        let watchers: Vec<_> = self.watchers.borrow().clone();
        for watcher in watchers {
            watcher(reduced);
        }
    }

    /// Show or hide the page
    pub fn set_visible(&self, visible: bool) {
        self.visible.set(visible);
    }

    /// Replace the device hints
    pub fn set_hints(&self, hints: DeviceHints) {
        self.hints.set(hints);
    }

    /// Make every query fail (simulates a non-browser host)
    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    /// Number of registered change watchers
    pub fn watcher_count(&self) -> usize {
        self.watchers.borrow().len()
    }

    fn check_available(&self, what: &str) -> Result<()> {
        if self.available.get() {
            Ok(())
        } else {
            Err(PlatformError::Unavailable(what.to_string()))
        }
    }
}

impl Default for ScriptedEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionEnvironment for ScriptedEnvironment {
    fn prefers_reduced_motion(&self) -> Result<bool> {
        self.check_available("media queries")?;
        Ok(self.reduced_motion.get())
    }

    fn watch_reduced_motion(&self, callback: ReducedMotionCallback) -> Result<()> {
        self.check_available("media queries")?;
        if !self.supports_watch {
            return Err(PlatformError::Unsupported(
                "reduced-motion change notification".to_string(),
            ));
        }
        self.watchers.borrow_mut().push(callback);
        Ok(())
    }

    fn is_page_visible(&self) -> Result<bool> {
        self.check_available("page visibility")?;
        Ok(self.visible.get())
    }

    fn device_hints(&self) -> Result<DeviceHints> {
        self.check_available("device hints")?;
        Ok(self.hints.get())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

/// Clock advanced explicitly by the test
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    /// Jump to an absolute time
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
