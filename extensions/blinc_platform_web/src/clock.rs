//! `performance.now()` clock

use blinc_platform::Clock;
use wasm_bindgen::prelude::*;

// Direct global binding; avoids fetching the Window/Performance objects on
// every read.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    fn performance_now() -> f64;
}

/// Milliseconds since page load, from `performance.now()`
///
/// Shares its time base with `Event.timeStamp`, so tracker stamps and signal
/// timestamps are comparable.
#[derive(Clone, Copy, Debug, Default)]
pub struct PerformanceClock;

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        performance_now()
    }
}
