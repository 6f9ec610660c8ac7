//! Host environment queries used to decide how much to animate

use std::rc::Rc;

use crate::error::{PlatformError, Result};

/// Callback invoked when the reduced-motion preference changes
pub type ReducedMotionCallback = Rc<dyn Fn(bool)>;

/// Coarse device capability hints
///
/// Every field is optional; hosts report what they know.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DeviceHints {
    /// Number of logical CPU cores
    pub logical_cores: Option<u32>,
    /// Whether the primary pointer is coarse (touch)
    pub coarse_pointer: Option<bool>,
    /// Approximate device memory in gigabytes
    pub device_memory_gb: Option<f32>,
}

impl DeviceHints {
    /// Hints with nothing known
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Set the logical core count
    pub fn cores(mut self, cores: u32) -> Self {
        self.logical_cores = Some(cores);
        self
    }

    /// Set whether the primary pointer is coarse
    pub fn coarse_pointer(mut self, coarse: bool) -> Self {
        self.coarse_pointer = Some(coarse);
        self
    }

    /// Set the device memory in gigabytes
    pub fn memory_gb(mut self, gb: f32) -> Self {
        self.device_memory_gb = Some(gb);
        self
    }

    /// Check if no hint is known
    pub fn is_unknown(&self) -> bool {
        self.logical_cores.is_none()
            && self.coarse_pointer.is_none()
            && self.device_memory_gb.is_none()
    }
}

/// Live host state consulted by the preference resolver
///
/// Implementations should answer from live host state on every call; the
/// resolver never caches visibility or hints.
pub trait MotionEnvironment {
    /// Current OS/browser reduced-motion preference
    fn prefers_reduced_motion(&self) -> Result<bool>;

    /// Register for reduced-motion change notifications
    ///
    /// Hosts without a change-capable query return `Unsupported`, in which
    /// case callers fall back to querying on every read.
    fn watch_reduced_motion(&self, callback: ReducedMotionCallback) -> Result<()> {
        let _ = callback;
        Err(PlatformError::Unsupported(
            "reduced-motion change notification".to_string(),
        ))
    }

    /// Whether the page/document is currently visible
    fn is_page_visible(&self) -> Result<bool>;

    /// Device capability hints
    fn device_hints(&self) -> Result<DeviceHints>;

    /// Backend name, for logging
    fn name(&self) -> &'static str;
}

/// Environment for processes with no host (server-side rendering, tests, CLIs)
///
/// Every query fails, which callers resolve to "animate normally".
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessEnvironment;

impl MotionEnvironment for HeadlessEnvironment {
    fn prefers_reduced_motion(&self) -> Result<bool> {
        Err(PlatformError::Unavailable("media queries".to_string()))
    }

    fn is_page_visible(&self) -> Result<bool> {
        Err(PlatformError::Unavailable("page visibility".to_string()))
    }

    fn device_hints(&self) -> Result<DeviceHints> {
        Err(PlatformError::Unavailable("device hints".to_string()))
    }

    fn name(&self) -> &'static str {
        "headless"
    }
}
