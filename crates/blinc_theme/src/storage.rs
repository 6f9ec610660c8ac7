//! Key-value storage for small preference blobs

use std::cell::{Cell, RefCell};

use rustc_hash::FxHashMap;

use crate::error::{Result, ThemeError};

/// A string key-value store (browser local storage, a settings file, memory)
pub trait PreferenceStorage {
    /// Read a value; `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a value; absent keys are not an error
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory storage for headless hosts and tests
#[derive(Default)]
pub struct MemoryStorage {
    values: RefCell<FxHashMap<String, String>>,
    failing: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail (quota exceeded, storage disabled)
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    fn check(&self) -> Result<()> {
        if self.failing.get() {
            return Err(ThemeError::Storage("memory storage set to fail".to_string()));
        }
        Ok(())
    }
}

impl PreferenceStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check()?;
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check()?;
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.check()?;
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
