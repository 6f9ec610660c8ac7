//! Blinc Theme Preferences
//!
//! Persists the user's theme and font selection as a small JSON blob under a
//! fixed key in a [`PreferenceStorage`] backend. Loading always succeeds and
//! falls back to the default selection.
//!
//! # Example
//!
//! ```
//! use blinc_theme::{MemoryStorage, ThemeId, ThemePreferences};
//!
//! let storage = MemoryStorage::new();
//! assert_eq!(ThemePreferences::load(&storage).theme, ThemeId::Dark);
//! ```

pub mod error;
pub mod preferences;
pub mod storage;

pub use error::{Result, ThemeError};
pub use preferences::{FontId, ThemeId, ThemePreferences, ThemeStore, STORAGE_KEY};
pub use storage::{MemoryStorage, PreferenceStorage};
