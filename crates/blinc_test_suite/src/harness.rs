//! Test harness for motion scenarios
//!
//! Provides infrastructure for running scenarios against a scripted host:
//! - A fresh registry per scenario over recording/scripted host doubles
//! - Helpers to emit host events and move the clock
//! - Panic capture so one broken scenario does not end the run

use anyhow::Result;
use blinc_motion::{MotionConfig, MotionRegistry, SignalValue};
use blinc_platform::testing::{ManualClock, RecordingSignalSource, ScriptedEnvironment};
use blinc_platform::{Clock, DeviceHints};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

/// Result of a scenario
#[derive(Debug)]
pub enum TestResult {
    /// Scenario passed
    Passed,
    /// Scenario returned an error or panicked
    Failed { reason: String },
    /// Scenario skipped (e.g., needs a backend this host lacks)
    Skipped { reason: String },
}

impl TestResult {
    pub fn is_passed(&self) -> bool {
        matches!(self, TestResult::Passed | TestResult::Skipped { .. })
    }
}

/// Context for a single scenario
pub struct TestContext {
    /// Registry under test
    pub registry: MotionRegistry,
    /// Native listener double
    pub source: Rc<RecordingSignalSource>,
    /// Host environment double
    pub env: Rc<ScriptedEnvironment>,
    /// Clock used for tracker stamps and emitted events
    pub clock: Rc<ManualClock>,
    /// Scenario name
    pub name: String,
}

impl TestContext {
    /// Create a context over a desktop-class device
    pub fn new(name: &str) -> Self {
        Self::with_hints(name, TestHarness::desktop_hints(), MotionConfig::default())
    }

    /// Create a context with explicit device hints and config
    pub fn with_hints(name: &str, hints: DeviceHints, config: MotionConfig) -> Self {
        let source = Rc::new(RecordingSignalSource::new());
        let env = Rc::new(ScriptedEnvironment::new().with_hints(hints));
        let clock = Rc::new(ManualClock::new(0.0));
        let registry = MotionRegistry::builder()
            .signal_source(source.clone())
            .environment(env.clone())
            .clock(clock.clone())
            .config(config)
            .build();

        Self {
            registry,
            source,
            env,
            clock,
            name: name.to_string(),
        }
    }

    /// Start over with new device hints and config
    pub fn reconfigure(&mut self, hints: DeviceHints, config: MotionConfig) {
        *self = Self::with_hints(&self.name, hints, config);
    }

    /// Advance the clock by a frame's worth of milliseconds
    pub fn advance(&self, ms: f64) {
        self.clock.advance(ms);
    }

    /// Emit a scroll event through the native listener
    pub fn scroll_to(&self, y: f32, max_y: f32) -> bool {
        self.source
            .emit(SignalValue::scroll(0.0, y, 0.0, max_y, self.clock.now_ms()))
    }

    /// Emit a resize event through the native listener
    pub fn resize(&self, width: f32, height: f32) -> bool {
        self.source
            .emit(SignalValue::resize(width, height, self.clock.now_ms()))
    }

    /// Emit a pointer move through the native listener
    pub fn move_pointer(&self, x: f32, y: f32) -> bool {
        self.source
            .emit(SignalValue::pointer(x, y, self.clock.now_ms()))
    }
}

/// Runs scenarios in isolation
pub struct TestHarness {
    /// Log failures at error level instead of debug
    verbose: bool,
}

impl TestHarness {
    /// Create a new test harness
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Log every failure reason at error level
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Hints for a desktop-class device (high tier)
    pub fn desktop_hints() -> DeviceHints {
        DeviceHints::unknown()
            .cores(12)
            .coarse_pointer(false)
            .memory_gb(16.0)
    }

    /// Hints for a low-end phone (low tier)
    pub fn low_end_hints() -> DeviceHints {
        DeviceHints::unknown()
            .cores(2)
            .coarse_pointer(true)
            .memory_gb(1.0)
    }

    /// Run a scenario with a fresh context
    pub fn run_test<F>(&self, name: &str, test_fn: F) -> TestResult
    where
        F: FnOnce(&mut TestContext) -> Result<()>,
    {
        let mut ctx = TestContext::new(name);
        self.finish(name, panic::catch_unwind(AssertUnwindSafe(|| test_fn(&mut ctx))))
    }

    /// Run a scenario with the context's registry installed as the global
    /// registry for its duration
    pub fn run_global_test<F>(&self, name: &str, test_fn: F) -> TestResult
    where
        F: FnOnce(&mut TestContext) -> Result<()>,
    {
        if blinc_motion::is_registry_initialized() {
            return TestResult::Skipped {
                reason: "a global registry is already installed".to_string(),
            };
        }

        let mut ctx = TestContext::new(name);
        blinc_motion::set_global_registry(ctx.registry.clone());
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| test_fn(&mut ctx)));
        blinc_motion::clear_global_registry();
        self.finish(name, outcome)
    }

    fn finish(&self, name: &str, outcome: std::thread::Result<Result<()>>) -> TestResult {
        let result = match outcome {
            Ok(Ok(())) => TestResult::Passed,
            Ok(Err(e)) => TestResult::Failed {
                reason: format!("{e:#}"),
            },
            Err(payload) => TestResult::Failed {
                reason: panic_message(payload.as_ref())
                    .map(|msg| format!("panicked: {msg}"))
                    .unwrap_or_else(|| "panicked".to_string()),
            },
        };

        if let TestResult::Failed { reason } = &result {
            if self.verbose {
                tracing::error!("{}: {}", name, reason);
            } else {
                tracing::debug!("{}: {}", name, reason);
            }
        }
        result
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> Option<&str> {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
}
