//! Platform error types

use thiserror::Error;

/// Host environment errors
///
/// Nothing in the motion layer propagates these to callers. They exist so that
/// backends can say *why* a capability is missing and the motion layer can log
/// it before falling back to defaults.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlatformError {
    /// The host API is not reachable (no window, no document, headless process)
    #[error("Host API unavailable: {0}")]
    Unavailable(String),

    /// The host exists but does not implement the requested capability
    #[error("Capability not supported: {0}")]
    Unsupported(String),

    /// Attaching or detaching a native event listener failed
    #[error("Event listener error: {0}")]
    Listener(String),

    /// Generic platform error
    #[error("Platform error: {0}")]
    Other(String),
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;
