//! Animation activity tracker
//!
//! A keyed set of "currently running" animations. The only consumer of the
//! count is the preference resolver, which degrades the performance tier when
//! too many animations run at once.
//!
//! Re-tracking an id refreshes its entry instead of adding a second one, so the
//! count always equals the number of distinct ids.

use std::cell::RefCell;
use std::rc::Rc;

use blinc_platform::{Clock, SystemClock};
use rustc_hash::FxHashMap;

/// A tracked animation
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedAnimation {
    /// Caller-chosen key
    pub id: String,
    /// Free-form grouping tag (e.g. "mouse-tracking", "hero")
    pub category: String,
    /// Clock time of the most recent registration
    pub registered_at_ms: f64,
}

/// Counted registry of active animations
pub struct ActivityTracker {
    entries: RefCell<FxHashMap<String, TrackedAnimation>>,
    clock: Rc<dyn Clock>,
}

impl ActivityTracker {
    /// Tracker stamped by the system clock
    pub fn new() -> Self {
        Self::with_clock(Rc::new(SystemClock::new()))
    }

    /// Tracker stamped by a custom clock
    pub fn with_clock(clock: Rc<dyn Clock>) -> Self {
        Self {
            entries: RefCell::new(FxHashMap::default()),
            clock,
        }
    }

    /// Insert or refresh an entry
    pub fn track(&self, id: impl Into<String>, category: impl Into<String>) {
        let id = id.into();
        let entry = TrackedAnimation {
            id: id.clone(),
            category: category.into(),
            registered_at_ms: self.clock.now_ms(),
        };
        let replaced = self.entries.borrow_mut().insert(id, entry);
        if let Some(previous) = replaced {
            tracing::trace!(id = %previous.id, "refreshed tracked animation");
        }
    }

    /// Remove an entry; unknown ids are ignored
    ///
    /// Returns whether an entry was removed.
    pub fn untrack(&self, id: &str) -> bool {
        self.entries.borrow_mut().remove(id).is_some()
    }

    /// Number of tracked animations
    pub fn active_count(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Check if an id is tracked
    pub fn is_tracked(&self, id: &str) -> bool {
        self.entries.borrow().contains_key(id)
    }

    /// Get a copy of an entry
    pub fn entry(&self, id: &str) -> Option<TrackedAnimation> {
        self.entries.borrow().get(id).cloned()
    }

    /// Distinct categories currently tracked, sorted
    pub fn active_categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .entries
            .borrow()
            .values()
            .map(|entry| entry.category.clone())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}
