//! Per-consumer throttling
//!
//! The multiplexer delivers every host event. Consumers that only need a few
//! updates per second wrap their callback here, so two consumers of the same
//! signal can run at different rates.

use std::cell::Cell;

use blinc_platform::SignalValue;

/// Wrap `callback` so it runs at most once per `interval_ms`
///
/// Intervals are measured on [`SignalValue::timestamp_ms`]. The first event
/// always fires, and an event older than the last delivered one (a host clock
/// reset) fires and restarts the window. Events without a finite timestamp
/// always fire and leave the window untouched.
///
/// ```
/// use blinc_motion::throttle::throttled;
/// use blinc_platform::SignalValue;
///
/// let on_scroll = throttled(100.0, |value: &SignalValue| {
///     println!("scroll at {}", value.timestamp_ms);
/// });
/// on_scroll(&SignalValue::scroll(0.0, 10.0, 0.0, 500.0, 0.0));  // fires
/// on_scroll(&SignalValue::scroll(0.0, 12.0, 0.0, 500.0, 40.0)); // dropped
/// ```
pub fn throttled<F>(interval_ms: f64, callback: F) -> impl Fn(&SignalValue) + 'static
where
    F: Fn(&SignalValue) + 'static,
{
    let last_fired: Cell<Option<f64>> = Cell::new(None);
    move |value: &SignalValue| {
        let now = value.timestamp_ms;
        if !now.is_finite() {
            callback(value);
            return;
        }
        let due = match last_fired.get() {
            None => true,
            Some(previous) => now < previous || now - previous >= interval_ms,
        };
        if due {
            last_fired.set(Some(now));
            callback(value);
        }
    }
}
