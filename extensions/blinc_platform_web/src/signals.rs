//! Window event listeners
//!
//! One passive listener per [`SignalKind`] on `window`. Events are read into
//! [`SignalValue`]s and handed to the sink the multiplexer supplied.
//!
//! A panic inside a listener traps on `wasm32-unknown-unknown`, so
//! subscribers should report failures as `Err` through `try_subscribe`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use blinc_platform::{PlatformError, Result, SignalKind, SignalSink, SignalSource, SignalValue};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{AddEventListenerOptions, Event, MouseEvent, Window};

type EventClosure = Closure<dyn FnMut(Event)>;

pub(crate) fn js_error(err: JsValue) -> PlatformError {
    PlatformError::Listener(format!("{err:?}"))
}

/// [`SignalSource`] backed by `window` event listeners
pub struct WebSignalSource {
    window: Window,
    listeners: RefCell<[Option<EventClosure>; SignalKind::COUNT]>,
    /// Closures detached while a dispatch was running. A wasm-bindgen closure
    /// must not be freed during its own invocation, so these live until the
    /// next attach/detach outside a dispatch.
    retired: RefCell<Vec<EventClosure>>,
    /// Nesting depth of running listener callbacks
    depth: Rc<Cell<u32>>,
}

impl WebSignalSource {
    pub fn new() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| PlatformError::Unavailable("no global window".to_string()))?;
        Ok(Self {
            window,
            listeners: RefCell::new([None, None, None]),
            retired: RefCell::new(Vec::new()),
            depth: Rc::new(Cell::new(0)),
        })
    }

    fn collect_retired(&self) {
        if self.depth.get() == 0 {
            self.retired.borrow_mut().clear();
        }
    }
}

/// Marks a listener callback as running until dropped
struct DepthGuard<'a>(&'a Cell<u32>);

impl<'a> DepthGuard<'a> {
    fn enter(depth: &'a Cell<u32>) -> Self {
        depth.set(depth.get() + 1);
        Self(depth)
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.0.set(self.0.get().saturating_sub(1));
    }
}

impl SignalSource for WebSignalSource {
    fn attach(&self, kind: SignalKind, sink: SignalSink) -> Result<()> {
        self.collect_retired();

        let mut listeners = self.listeners.borrow_mut();
        if listeners[kind.index()].is_some() {
            return Err(PlatformError::Listener(format!("{kind} listener already attached")));
        }

        let window = self.window.clone();
        let depth = Rc::clone(&self.depth);
        let closure = Closure::wrap(Box::new(move |event: Event| {
            let Some(value) = read_signal(&window, kind, &event) else {
                return;
            };
            let _guard = DepthGuard::enter(&depth);
            sink(&value);
        }) as Box<dyn FnMut(Event)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(true);
        self.window
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind.event_name(),
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .map_err(js_error)?;

        listeners[kind.index()] = Some(closure);
        tracing::debug!(%kind, "added window listener");
        Ok(())
    }

    fn detach(&self, kind: SignalKind) -> Result<()> {
        let closure = self.listeners.borrow_mut()[kind.index()]
            .take()
            .ok_or_else(|| PlatformError::Listener(format!("{kind} listener not attached")))?;

        let removed = self.window.remove_event_listener_with_callback(
            kind.event_name(),
            closure.as_ref().unchecked_ref(),
        );

        if self.depth.get() > 0 {
            self.retired.borrow_mut().push(closure);
        } else {
            self.retired.borrow_mut().clear();
            drop(closure);
        }

        removed.map_err(js_error)
    }

    fn name(&self) -> &'static str {
        "web"
    }
}

impl Drop for WebSignalSource {
    fn drop(&mut self) {
        for kind in SignalKind::ALL {
            if let Some(closure) = self.listeners.get_mut()[kind.index()].take() {
                let _ = self.window.remove_event_listener_with_callback(
                    kind.event_name(),
                    closure.as_ref().unchecked_ref(),
                );
            }
        }
    }
}

fn read_signal(window: &Window, kind: SignalKind, event: &Event) -> Option<SignalValue> {
    let timestamp_ms = event.time_stamp();
    match kind {
        SignalKind::Scroll => {
            let x = window.scroll_x().ok()? as f32;
            let y = window.scroll_y().ok()? as f32;
            let (max_x, max_y) = window
                .document()
                .and_then(|document| document.document_element())
                .map(|root| {
                    (
                        (root.scroll_width() - root.client_width()).max(0) as f32,
                        (root.scroll_height() - root.client_height()).max(0) as f32,
                    )
                })
                .unwrap_or((0.0, 0.0));
            Some(SignalValue::scroll(x, y, max_x, max_y, timestamp_ms))
        }
        SignalKind::Resize => {
            let width = window.inner_width().ok()?.as_f64()? as f32;
            let height = window.inner_height().ok()?.as_f64()? as f32;
            Some(SignalValue::resize(width, height, timestamp_ms))
        }
        SignalKind::PointerMove => {
            let pointer = event.dyn_ref::<MouseEvent>()?;
            Some(SignalValue::pointer(
                pointer.client_x() as f32,
                pointer.client_y() as f32,
                timestamp_ms,
            ))
        }
    }
}
