//! Native listener abstraction

use std::rc::Rc;

use crate::error::{PlatformError, Result};
use crate::signal::{SignalKind, SignalValue};

/// Callback invoked by a native listener for every host event of one kind
///
/// Uses Rc since the UI is single-threaded.
pub type SignalSink = Rc<dyn Fn(&SignalValue)>;

/// A host that can attach one native listener per signal kind
///
/// Implementations must not call back into the sink synchronously from
/// `attach` or `detach`.
pub trait SignalSource {
    /// Attach the native listener for `kind`, forwarding events to `sink`
    ///
    /// Called at most once per kind until a matching `detach`.
    fn attach(&self, kind: SignalKind, sink: SignalSink) -> Result<()>;

    /// Detach the native listener for `kind`
    fn detach(&self, kind: SignalKind) -> Result<()>;

    /// Backend name, for logging
    fn name(&self) -> &'static str;
}

/// Signal source for processes with no host event loop
///
/// Every attach fails, so subscriptions against it are no-ops.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessSignalSource;

impl SignalSource for HeadlessSignalSource {
    fn attach(&self, kind: SignalKind, _sink: SignalSink) -> Result<()> {
        Err(PlatformError::Unavailable(format!(
            "no host to attach a {kind} listener to"
        )))
    }

    fn detach(&self, _kind: SignalKind) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "headless"
    }
}
