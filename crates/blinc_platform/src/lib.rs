//! Blinc Platform Abstraction Layer
//!
//! This crate provides the host-facing traits the motion system is built on:
//! high-frequency signals, native listener attachment, environment queries
//! and clocks.
//!
//! # Architecture
//!
//! - [`SignalSource`] - Attaches one native listener per [`SignalKind`]
//! - [`MotionEnvironment`] - Reduced-motion preference, page visibility, device hints
//! - [`Clock`] - Monotonic milliseconds
//!
//! # Platform Implementations
//!
//! - `blinc_platform_web` - Browsers (wasm32) via web-sys
//! - [`HeadlessSignalSource`] / [`HeadlessEnvironment`] - No host; every query fails
//! - [`testing`] - Scriptable doubles for headless tests
//!
//! # Example
//!
//! ```
//! use blinc_platform::prelude::*;
//! use std::rc::Rc;
//!
//! let source = blinc_platform::testing::RecordingSignalSource::new();
//! source
//!     .attach(SignalKind::Scroll, Rc::new(|value: &SignalValue| {
//!         println!("scrolled: {:?}", value.payload);
//!     }))
//!     .unwrap();
//!
//! source.emit(SignalValue::scroll(0.0, 120.0, 0.0, 2400.0, 16.0));
//! ```

mod clock;
mod environment;
mod error;
mod signal;
mod source;
pub mod testing;

// Re-export all public types
pub use clock::{Clock, SystemClock};
pub use environment::{DeviceHints, HeadlessEnvironment, MotionEnvironment, ReducedMotionCallback};
pub use error::{PlatformError, Result};
pub use signal::{SignalKind, SignalPayload, SignalValue};
pub use source::{HeadlessSignalSource, SignalSink, SignalSource};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::clock::{Clock, SystemClock};
    pub use crate::environment::{DeviceHints, MotionEnvironment, ReducedMotionCallback};
    pub use crate::error::{PlatformError, Result};
    pub use crate::signal::{SignalKind, SignalPayload, SignalValue};
    pub use crate::source::{SignalSink, SignalSource};
}
