//! Error types for blinc_theme

use thiserror::Error;

/// Errors from preference persistence
#[derive(Error, Debug)]
pub enum ThemeError {
    /// The storage backend rejected a read or write
    #[error("Preference storage error: {0}")]
    Storage(String),

    /// Preferences could not be serialized
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for blinc_theme operations
pub type Result<T> = std::result::Result<T, ThemeError>;
