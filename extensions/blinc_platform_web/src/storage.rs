//! Browser `localStorage` backend for theme preferences

use blinc_theme::{PreferenceStorage, Result, ThemeError};
use wasm_bindgen::JsValue;
use web_sys::Storage;

fn storage_error(err: JsValue) -> ThemeError {
    ThemeError::Storage(format!("{err:?}"))
}

/// `window.localStorage`
pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Open local storage; fails when storage is disabled (private mode,
    /// sandboxed iframes)
    pub fn new() -> Result<Self> {
        let window =
            web_sys::window().ok_or_else(|| ThemeError::Storage("no global window".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| ThemeError::Storage("localStorage unavailable".to_string()))?;
        Ok(Self { storage })
    }
}

impl PreferenceStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(storage_error)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(storage_error)
    }
}
