//! Event multiplexer
//!
//! Fans one native listener per [`SignalKind`] out to any number of keyed
//! subscribers.
//!
//! # Architecture
//!
//! ```text
//! host event (scroll / resize / pointermove)
//!     ↓ single native listener per kind (SignalSource)
//! EventMultiplexer::dispatch
//!     ↓ snapshot of subscribers, registration order
//! subscriber callbacks (each isolated)
//! ```
//!
//! The listener for a kind is attached when its first subscriber arrives and
//! detached when its last subscriber leaves. No borrow is held while a
//! callback runs, so callbacks may subscribe or unsubscribe freely, including
//! themselves.
//!
//! # Failing subscribers
//!
//! A subscriber that returns `Err` from [`EventMultiplexer::try_subscribe`]
//! is logged and the remaining subscribers still run. This works on every
//! target. Panics are also caught with `catch_unwind`, but only where panics
//! unwind: on `wasm32-unknown-unknown` and under `panic = "abort"` a panic
//! traps and ends the dispatch. Browser code should report failures through
//! `try_subscribe` instead of panicking.
//!
//! When the last handle to a multiplexer goes away, every native listener it
//! still holds is detached, so a new registry can reuse the same source.
//!
//! There is no throttling here. Consumers that want fewer updates wrap their
//! callback with [`throttled`](crate::throttle::throttled).

use std::cell::RefCell;
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use blinc_platform::{SignalKind, SignalSink, SignalSource, SignalValue};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;

/// Error reported by a fallible subscriber
pub type CallbackError = Box<dyn Error>;

/// Subscriber callback
///
/// Uses Rc since the UI is single-threaded.
pub type SignalCallback = Rc<dyn Fn(&SignalValue) -> Result<(), CallbackError>>;

/// Subscribers of one signal kind, in registration order
#[derive(Default)]
struct Channel {
    subscribers: IndexMap<Rc<str>, SignalCallback, FxBuildHasher>,
    /// Whether the native listener is attached
    attached: bool,
}

struct MultiplexerInner {
    channels: [Channel; SignalKind::COUNT],
    source: Rc<dyn SignalSource>,
}

impl Drop for MultiplexerInner {
    fn drop(&mut self) {
        for kind in SignalKind::ALL {
            let channel = &mut self.channels[kind.index()];
            if std::mem::take(&mut channel.attached) {
                detach_listener(self.source.as_ref(), kind);
            }
        }
    }
}

/// Keyed fan-out over a [`SignalSource`]
///
/// Cloning is cheap and yields another handle to the same subscriber set.
#[derive(Clone)]
pub struct EventMultiplexer {
    inner: Rc<RefCell<MultiplexerInner>>,
    source: Rc<dyn SignalSource>,
}

impl EventMultiplexer {
    pub fn new(source: Rc<dyn SignalSource>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MultiplexerInner {
                channels: Default::default(),
                source: Rc::clone(&source),
            })),
            source,
        }
    }

    /// Subscribe `callback` under `id`
    ///
    /// An existing `id` keeps its position and gets the new callback. If the
    /// native listener cannot be attached the call is a no-op.
    pub fn subscribe<F>(&self, kind: SignalKind, id: impl Into<String>, callback: F)
    where
        F: Fn(&SignalValue) + 'static,
    {
        self.subscribe_rc(
            kind,
            id.into(),
            Rc::new(move |value: &SignalValue| {
                callback(value);
                Ok(())
            }),
        );
    }

    /// Subscribe a fallible `callback` under `id`
    ///
    /// An `Err` is logged and dispatch moves on to the next subscriber.
    pub fn try_subscribe<F, E>(&self, kind: SignalKind, id: impl Into<String>, callback: F)
    where
        F: Fn(&SignalValue) -> Result<(), E> + 'static,
        E: Into<CallbackError>,
    {
        self.subscribe_rc(
            kind,
            id.into(),
            Rc::new(move |value: &SignalValue| callback(value).map_err(Into::into)),
        );
    }

    /// Subscribe an already shared callback
    pub fn subscribe_rc(&self, kind: SignalKind, id: String, callback: SignalCallback) {
        let needs_attach = !self.inner.borrow().channels[kind.index()].attached;
        if needs_attach {
            // Not holding a borrow here: attach is host code.
            if let Err(err) = self.source.attach(kind, self.sink()) {
                tracing::debug!(
                    %kind,
                    subscriber = %id,
                    backend = self.source.name(),
                    error = %err,
                    "native listener unavailable, subscription ignored"
                );
                return;
            }
            tracing::debug!(%kind, backend = self.source.name(), "attached native listener");
            self.inner.borrow_mut().channels[kind.index()].attached = true;
        }

        let mut inner = self.inner.borrow_mut();
        let channel = &mut inner.channels[kind.index()];
        if channel.subscribers.insert(Rc::from(id.as_str()), callback).is_some() {
            tracing::trace!(%kind, subscriber = %id, "replaced signal subscriber");
        }
    }

    /// Remove the subscriber `id`; unknown ids are ignored
    pub fn unsubscribe(&self, kind: SignalKind, id: &str) {
        let should_detach = {
            let mut inner = self.inner.borrow_mut();
            let channel = &mut inner.channels[kind.index()];
            if channel.subscribers.shift_remove(id).is_none() {
                return;
            }
            let last = channel.subscribers.is_empty() && channel.attached;
            if last {
                channel.attached = false;
            }
            last
        };

        if should_detach {
            self.detach(kind);
        }
    }

    /// Remove every subscriber and detach every native listener
    pub fn clear(&self) {
        let attached: SmallVec<[SignalKind; SignalKind::COUNT]> = {
            let mut inner = self.inner.borrow_mut();
            SignalKind::ALL
                .into_iter()
                .filter(|kind| {
                    let channel = &mut inner.channels[kind.index()];
                    channel.subscribers.clear();
                    std::mem::take(&mut channel.attached)
                })
                .collect()
        };
        for kind in attached {
            self.detach(kind);
        }
    }

    /// Deliver `value` to every subscriber of its kind
    ///
    /// Returns the number of callbacks that ran to completion.
    pub fn dispatch(&self, value: &SignalValue) -> usize {
        dispatch_to(&self.inner, value)
    }

    /// Number of subscribers for `kind`
    pub fn subscriber_count(&self, kind: SignalKind) -> usize {
        self.inner.borrow().channels[kind.index()].subscribers.len()
    }

    /// Check if `id` is subscribed to `kind`
    pub fn is_subscribed(&self, kind: SignalKind, id: &str) -> bool {
        self.inner.borrow().channels[kind.index()]
            .subscribers
            .contains_key(id)
    }

    /// Whether the native listener for `kind` is attached
    pub fn is_attached(&self, kind: SignalKind) -> bool {
        self.inner.borrow().channels[kind.index()].attached
    }

    /// Subscriber ids for `kind`, in registration order
    pub fn subscriber_ids(&self, kind: SignalKind) -> Vec<String> {
        self.inner.borrow().channels[kind.index()]
            .subscribers
            .keys()
            .map(|id| id.to_string())
            .collect()
    }

    fn detach(&self, kind: SignalKind) {
        detach_listener(self.source.as_ref(), kind);
    }

    /// Native listener callback; holds the subscriber set weakly so a host
    /// that leaks its listener does not keep the multiplexer alive
    fn sink(&self) -> SignalSink {
        let inner: Weak<RefCell<MultiplexerInner>> = Rc::downgrade(&self.inner);
        Rc::new(move |value: &SignalValue| {
            if let Some(inner) = inner.upgrade() {
                dispatch_to(&inner, value);
            }
        })
    }
}

fn detach_listener(source: &dyn SignalSource, kind: SignalKind) {
    match source.detach(kind) {
        Ok(()) => {
            tracing::debug!(%kind, backend = source.name(), "detached native listener");
        }
        Err(err) => {
            tracing::debug!(%kind, error = %err, "failed to detach native listener");
        }
    }
}

fn dispatch_to(inner: &RefCell<MultiplexerInner>, value: &SignalValue) -> usize {
    let kind = value.kind();
    let snapshot: SmallVec<[(Rc<str>, SignalCallback); 8]> = {
        let inner = inner.borrow();
        inner.channels[kind.index()]
            .subscribers
            .iter()
            .map(|(id, callback)| (Rc::clone(id), Rc::clone(callback)))
            .collect()
    };

    tracing::trace!(%kind, subscribers = snapshot.len(), "dispatching signal");

    let mut delivered = 0;
    for (id, callback) in snapshot {
        // Skip subscribers removed by an earlier callback in this dispatch
        if !inner.borrow().channels[kind.index()]
            .subscribers
            .contains_key(&*id)
        {
            continue;
        }
        match panic::catch_unwind(AssertUnwindSafe(|| callback(value))) {
            Ok(Ok(())) => delivered += 1,
            Ok(Err(err)) => {
                tracing::warn!(%kind, subscriber = %id, error = %err, "signal callback failed, continuing dispatch");
            }
            Err(_) => {
                tracing::warn!(%kind, subscriber = %id, "signal callback panicked, continuing dispatch");
            }
        }
    }
    delivered
}
