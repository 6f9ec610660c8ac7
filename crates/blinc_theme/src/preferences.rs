//! Theme and font selection with persistence
//!
//! The selection is stored as one JSON object under [`STORAGE_KEY`]:
//!
//! ```json
//! {"theme":"dark","font":"sans"}
//! ```
//!
//! Loading never fails. A missing key, unparsable JSON, an unknown id or a
//! storage error all resolve to [`ThemePreferences::default`].

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::PreferenceStorage;

/// Fixed storage key for the persisted selection
pub const STORAGE_KEY: &str = "blinc.theme-preferences";

/// Selectable color theme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeId {
    Light,
    #[default]
    Dark,
    /// Follow the host color scheme
    System,
}

impl ThemeId {
    pub const ALL: [ThemeId; 3] = [ThemeId::Light, ThemeId::Dark, ThemeId::System];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeId::Light => "light",
            ThemeId::Dark => "dark",
            ThemeId::System => "system",
        }
    }
}

impl fmt::Display for ThemeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selectable body font
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontId {
    #[default]
    Sans,
    Serif,
    Mono,
}

impl FontId {
    pub const ALL: [FontId; 3] = [FontId::Sans, FontId::Serif, FontId::Mono];

    pub fn as_str(self) -> &'static str {
        match self {
            FontId::Sans => "sans",
            FontId::Serif => "serif",
            FontId::Mono => "mono",
        }
    }
}

impl fmt::Display for FontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted theme/font selection
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreferences {
    pub theme: ThemeId,
    pub font: FontId,
}

impl ThemePreferences {
    pub fn new(theme: ThemeId, font: FontId) -> Self {
        Self { theme, font }
    }

    /// Parse a stored selection; `None` for anything unrecognized
    pub fn parse(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load from storage, falling back to the default
    pub fn load(storage: &dyn PreferenceStorage) -> Self {
        let stored = match storage.get(STORAGE_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Self::default(),
            Err(err) => {
                tracing::debug!(error = %err, "preference storage unavailable, using defaults");
                return Self::default();
            }
        };
        Self::parse(&stored).unwrap_or_else(|| {
            tracing::debug!(key = STORAGE_KEY, "stored theme preferences invalid, using defaults");
            Self::default()
        })
    }

    /// Write to storage
    pub fn save(&self, storage: &dyn PreferenceStorage) -> Result<()> {
        storage.set(STORAGE_KEY, &self.to_json()?)
    }
}

/// Current selection backed by storage
///
/// Every change is written through. Write failures are logged and the
/// in-memory selection still changes, so the UI stays responsive when storage
/// is full or disabled.
///
/// ```
/// use std::rc::Rc;
/// use blinc_theme::{FontId, MemoryStorage, ThemeId, ThemeStore};
///
/// let storage = Rc::new(MemoryStorage::new());
/// let store = ThemeStore::load(storage.clone());
/// store.set_theme(ThemeId::Light);
/// store.set_font(FontId::Mono);
///
/// let reloaded = ThemeStore::load(storage);
/// assert_eq!(reloaded.theme(), ThemeId::Light);
/// assert_eq!(reloaded.font(), FontId::Mono);
/// ```
pub struct ThemeStore {
    storage: Rc<dyn PreferenceStorage>,
    current: Cell<ThemePreferences>,
}

impl ThemeStore {
    pub fn load(storage: Rc<dyn PreferenceStorage>) -> Self {
        let current = ThemePreferences::load(storage.as_ref());
        Self {
            storage,
            current: Cell::new(current),
        }
    }

    pub fn preferences(&self) -> ThemePreferences {
        self.current.get()
    }

    pub fn theme(&self) -> ThemeId {
        self.current.get().theme
    }

    pub fn font(&self) -> FontId {
        self.current.get().font
    }

    pub fn set_theme(&self, theme: ThemeId) {
        self.update(ThemePreferences {
            theme,
            ..self.current.get()
        });
    }

    pub fn set_font(&self, font: FontId) {
        self.update(ThemePreferences {
            font,
            ..self.current.get()
        });
    }

    /// Forget the stored selection and return to defaults
    pub fn reset(&self) {
        self.current.set(ThemePreferences::default());
        if let Err(err) = self.storage.remove(STORAGE_KEY) {
            tracing::warn!(error = %err, "failed to clear theme preferences");
        }
    }

    fn update(&self, next: ThemePreferences) {
        self.current.set(next);
        if let Err(err) = next.save(self.storage.as_ref()) {
            tracing::warn!(error = %err, theme = %next.theme, font = %next.font, "failed to persist theme preferences");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_missing_key_uses_default() {
        let storage = MemoryStorage::new();
        assert_eq!(ThemePreferences::load(&storage), ThemePreferences::default());
    }

    #[test]
    fn test_invalid_data_uses_default() {
        let storage = MemoryStorage::new();
        for stored in [
            "not json",
            "{\"theme\":\"neon\",\"font\":\"sans\"}",
            "{\"theme\":\"light\",\"font\":\"comic\"}",
            "[1,2,3]",
            "",
        ] {
            storage.set(STORAGE_KEY, stored).unwrap();
            assert_eq!(
                ThemePreferences::load(&storage),
                ThemePreferences::default(),
                "stored: {stored:?}"
            );
        }
    }

    #[test]
    fn test_round_trip() {
        let storage = MemoryStorage::new();
        let prefs = ThemePreferences::new(ThemeId::System, FontId::Serif);
        prefs.save(&storage).unwrap();

        assert_eq!(
            storage.get(STORAGE_KEY).unwrap().as_deref(),
            Some("{\"theme\":\"system\",\"font\":\"serif\"}")
        );
        assert_eq!(ThemePreferences::load(&storage), prefs);
    }

    #[test]
    fn test_storage_failure_falls_back() {
        let storage = MemoryStorage::new();
        ThemePreferences::new(ThemeId::Light, FontId::Mono)
            .save(&storage)
            .unwrap();
        storage.set_failing(true);
        assert_eq!(ThemePreferences::load(&storage), ThemePreferences::default());
    }

    #[test]
    fn test_store_keeps_selection_when_write_fails() {
        let storage = Rc::new(MemoryStorage::new());
        let store = ThemeStore::load(storage.clone());
        storage.set_failing(true);

        store.set_theme(ThemeId::Light);
        assert_eq!(store.theme(), ThemeId::Light);

        storage.set_failing(false);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_store_reset() {
        let storage = Rc::new(MemoryStorage::new());
        let store = ThemeStore::load(storage.clone());
        store.set_font(FontId::Mono);
        assert_eq!(storage.len(), 1);

        store.reset();
        assert!(storage.is_empty());
        assert_eq!(store.preferences(), ThemePreferences::default());
    }
}
