//! Blinc Web Platform
//!
//! Browser implementation of the `blinc_platform` motion traits, built on
//! wasm-bindgen and web-sys.
//!
//! - [`WebSignalSource`] - `scroll`, `resize` and `pointermove` listeners on `window`
//! - [`WebEnvironment`] - `prefers-reduced-motion` (live), `document.hidden`, navigator hints
//! - [`PerformanceClock`] - `performance.now()`
//! - [`LocalStorage`] - theme preference persistence
//!
//! # Example
//!
//! ```ignore
//! use blinc_motion::{set_global_registry, MotionConfig};
//! use blinc_platform_web::WebHost;
//!
//! let registry = WebHost::new()?.registry(MotionConfig::default());
//! set_global_registry(registry);
//! ```

#[cfg(target_arch = "wasm32")]
mod clock;
#[cfg(target_arch = "wasm32")]
mod environment;
#[cfg(target_arch = "wasm32")]
mod signals;
#[cfg(target_arch = "wasm32")]
mod storage;

#[cfg(target_arch = "wasm32")]
pub use clock::PerformanceClock;
#[cfg(target_arch = "wasm32")]
pub use environment::WebEnvironment;
#[cfg(target_arch = "wasm32")]
pub use signals::WebSignalSource;
#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

use blinc_motion::{MotionConfig, MotionRegistry};
use blinc_platform::PlatformError;

/// The browser host: signal source, environment and clock for one page
pub struct WebHost {
    #[cfg(target_arch = "wasm32")]
    source: std::rc::Rc<WebSignalSource>,
    #[cfg(target_arch = "wasm32")]
    environment: std::rc::Rc<WebEnvironment>,
}

#[cfg(target_arch = "wasm32")]
impl WebHost {
    /// Bind to the page's `window`
    pub fn new() -> Result<Self, PlatformError> {
        Ok(Self {
            source: std::rc::Rc::new(WebSignalSource::new()?),
            environment: std::rc::Rc::new(WebEnvironment::new()?),
        })
    }

    /// Build a motion registry over this host
    pub fn registry(&self, config: MotionConfig) -> MotionRegistry {
        MotionRegistry::builder()
            .signal_source(self.source.clone())
            .environment(self.environment.clone())
            .clock(std::rc::Rc::new(PerformanceClock))
            .config(config)
            .build()
    }
}

// Placeholder implementation for non-wasm builds
#[cfg(not(target_arch = "wasm32"))]
impl WebHost {
    /// Always fails outside the browser
    pub fn new() -> Result<Self, PlatformError> {
        Err(PlatformError::Unsupported(
            "Web platform only available on wasm32".to_string(),
        ))
    }

    /// Headless registry (unreachable in practice, `new` never succeeds)
    pub fn registry(&self, config: MotionConfig) -> MotionRegistry {
        MotionRegistry::builder().config(config).build()
    }
}
