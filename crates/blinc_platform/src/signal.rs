//! High-frequency host signals (scroll, resize, pointer movement)

use std::fmt;

/// A class of host-originated event stream
///
/// Each kind is backed by exactly one native listener while anything is
/// subscribed to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalKind {
    /// Document scroll position changed
    Scroll,
    /// Viewport was resized
    Resize,
    /// Pointer moved over the viewport
    PointerMove,
}

impl SignalKind {
    /// All signal kinds, in index order
    pub const ALL: [SignalKind; 3] = [SignalKind::Scroll, SignalKind::Resize, SignalKind::PointerMove];

    /// Number of signal kinds
    pub const COUNT: usize = 3;

    /// Dense index for per-kind tables
    pub const fn index(self) -> usize {
        match self {
            SignalKind::Scroll => 0,
            SignalKind::Resize => 1,
            SignalKind::PointerMove => 2,
        }
    }

    /// DOM event name for this kind
    pub const fn event_name(self) -> &'static str {
        match self {
            SignalKind::Scroll => "scroll",
            SignalKind::Resize => "resize",
            SignalKind::PointerMove => "pointermove",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.event_name())
    }
}

/// Observed value of a signal
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SignalPayload {
    /// Scroll offset in CSS pixels
    Scroll {
        /// Horizontal scroll offset
        x: f32,
        /// Vertical scroll offset
        y: f32,
        /// Maximum horizontal offset (0 when unknown or not scrollable)
        max_x: f32,
        /// Maximum vertical offset (0 when unknown or not scrollable)
        max_y: f32,
    },
    /// Viewport size in CSS pixels
    Resize {
        /// New viewport width
        width: f32,
        /// New viewport height
        height: f32,
    },
    /// Pointer position in viewport coordinates
    Pointer {
        /// X position
        x: f32,
        /// Y position
        y: f32,
    },
}

/// A single dispatched signal: payload plus host event time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalValue {
    /// What was observed
    pub payload: SignalPayload,
    /// Host event timestamp in milliseconds (monotonic within a session)
    pub timestamp_ms: f64,
}

impl SignalValue {
    /// Scroll signal
    pub fn scroll(x: f32, y: f32, max_x: f32, max_y: f32, timestamp_ms: f64) -> Self {
        Self {
            payload: SignalPayload::Scroll { x, y, max_x, max_y },
            timestamp_ms,
        }
    }

    /// Resize signal
    pub fn resize(width: f32, height: f32, timestamp_ms: f64) -> Self {
        Self {
            payload: SignalPayload::Resize { width, height },
            timestamp_ms,
        }
    }

    /// Pointer movement signal
    pub fn pointer(x: f32, y: f32, timestamp_ms: f64) -> Self {
        Self {
            payload: SignalPayload::Pointer { x, y },
            timestamp_ms,
        }
    }

    /// The kind of stream this value belongs to
    pub fn kind(&self) -> SignalKind {
        match self.payload {
            SignalPayload::Scroll { .. } => SignalKind::Scroll,
            SignalPayload::Resize { .. } => SignalKind::Resize,
            SignalPayload::Pointer { .. } => SignalKind::PointerMove,
        }
    }
}
