//! Browser environment queries
//!
//! Media queries, page visibility and navigator hints. Every query that the
//! browser cannot answer maps to a [`PlatformError`] so the resolver can fall
//! back to its defaults.

use std::cell::RefCell;

use blinc_platform::{
    DeviceHints, MotionEnvironment, PlatformError, ReducedMotionCallback, Result,
};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{MediaQueryList, MediaQueryListEvent, Window};

use crate::signals::js_error;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";
const COARSE_POINTER_QUERY: &str = "(pointer: coarse)";

type ChangeClosure = Closure<dyn FnMut(MediaQueryListEvent)>;

/// [`MotionEnvironment`] over `window`
pub struct WebEnvironment {
    window: Window,
    reduced_motion: Option<MediaQueryList>,
    coarse_pointer: Option<MediaQueryList>,
    watchers: RefCell<Vec<ChangeClosure>>,
}

impl WebEnvironment {
    pub fn new() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| PlatformError::Unavailable("no global window".to_string()))?;
        let reduced_motion = match_media(&window, REDUCED_MOTION_QUERY);
        let coarse_pointer = match_media(&window, COARSE_POINTER_QUERY);
        if reduced_motion.is_none() {
            tracing::debug!("matchMedia unavailable, reduced motion will read as unknown");
        }
        Ok(Self {
            window,
            reduced_motion,
            coarse_pointer,
            watchers: RefCell::new(Vec::new()),
        })
    }

    fn reduced_motion_query(&self) -> Result<&MediaQueryList> {
        self.reduced_motion
            .as_ref()
            .ok_or_else(|| PlatformError::Unsupported(REDUCED_MOTION_QUERY.to_string()))
    }
}

fn match_media(window: &Window, query: &str) -> Option<MediaQueryList> {
    window.match_media(query).ok().flatten()
}

impl MotionEnvironment for WebEnvironment {
    fn prefers_reduced_motion(&self) -> Result<bool> {
        Ok(self.reduced_motion_query()?.matches())
    }

    fn watch_reduced_motion(&self, callback: ReducedMotionCallback) -> Result<()> {
        let query = self.reduced_motion_query()?;
        let closure = Closure::wrap(Box::new(move |event: MediaQueryListEvent| {
            callback(event.matches());
        }) as Box<dyn FnMut(MediaQueryListEvent)>);

        query
            .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())
            .map_err(js_error)?;
        self.watchers.borrow_mut().push(closure);
        Ok(())
    }

    fn is_page_visible(&self) -> Result<bool> {
        let document = self
            .window
            .document()
            .ok_or_else(|| PlatformError::Unavailable("no document".to_string()))?;
        Ok(!document.hidden())
    }

    fn device_hints(&self) -> Result<DeviceHints> {
        let navigator = self.window.navigator();
        let mut hints = DeviceHints::unknown();

        let cores = navigator.hardware_concurrency();
        if cores >= 1.0 {
            hints = hints.cores(cores as u32);
        }
        if let Some(query) = &self.coarse_pointer {
            hints = hints.coarse_pointer(query.matches());
        }
        // Chromium only; absent elsewhere
        let memory = js_sys::Reflect::get(&navigator, &JsValue::from_str("deviceMemory"))
            .ok()
            .and_then(|value| value.as_f64());
        if let Some(gb) = memory {
            hints = hints.memory_gb(gb as f32);
        }
        Ok(hints)
    }

    fn name(&self) -> &'static str {
        "web"
    }
}

impl Drop for WebEnvironment {
    fn drop(&mut self) {
        if let Some(query) = &self.reduced_motion {
            for closure in self.watchers.get_mut().drain(..) {
                let _ = query
                    .remove_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
            }
        }
    }
}
