//! Scenario cases organized by category

pub mod activity;

use crate::runner::TestSuite;

/// Create all test suites
pub fn all_suites() -> Vec<TestSuite> {
    vec![
        signals::suite(),
        activity::suite(),
        preferences::suite(),
        viewport::suite(),
        global::suite(),
        theme::suite(),
    ]
}
