//! Error types for blinc_motion
//!
//! The per-frame API (subscribe, track, preferences) never fails. These errors
//! only come out of setup-time work: loading configuration and serializing
//! diagnostics.

use thiserror::Error;

/// Errors that can occur while configuring the motion system
#[derive(Error, Debug)]
pub enum MotionError {
    /// TOML configuration could not be parsed
    #[error("Failed to parse motion config: {0}")]
    ConfigToml(#[from] toml::de::Error),

    /// JSON configuration or diagnostics (de)serialization failed
    #[error("Motion JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration parsed but holds values that make no sense
    #[error("Invalid motion config: {0}")]
    InvalidConfig(String),
}

/// Result type for blinc_motion operations
pub type Result<T> = std::result::Result<T, MotionError>;
