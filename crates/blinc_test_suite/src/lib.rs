//! Blinc Motion Scenario Suite
//!
//! Headless end-to-end scenarios for the motion coordination layer. Every
//! scenario gets a fresh registry over scripted host doubles, so suites run
//! anywhere without a browser or display.
//!
//! # Scenario Categories
//!
//! - **Signals**: Shared native listeners, fan-out order, fault isolation
//! - **Activity**: Tracking lifecycle and load-driven tier degradation
//! - **Preferences**: Reduced motion, visibility, device tiers, intensity
//! - **Viewport**: Scroll progress and pointer normalization
//! - **Global**: The free-function API over the thread's registry
//! - **Theme**: Theme and font persistence

pub mod harness;
pub mod runner;
pub mod tests;

pub use harness::{TestContext, TestHarness, TestResult};
pub use runner::TestRunner;
