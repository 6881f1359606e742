//! Display-refresh model.
//!
//! # Design
//!
//! The host environment delivers at most one callback per request, on a
//! later display refresh, never synchronously inside the request.  Refreshes
//! are counted by a monotonically increasing [`FrameId`]; the mapping to wall
//! time (refresh rate, pacing) belongs to the frame source implementation.
//!
//! There is no cancellation: once a callback has been handed to
//! [`FrameSource::request_frame`] it will run.  Code that wants to stop a
//! chain of frames checks its own state inside the callback and simply does
//! not request another one.

use std::fmt;
use std::rc::Rc;

// ── FrameId ───────────────────────────────────────────────────────────────────

/// An absolute display-refresh counter.
///
/// Stored as `u64`: at 240 Hz a `u64` lasts ~2.4 billion years.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameId(pub u64);

impl FrameId {
    pub const ZERO: FrameId = FrameId(0);

    /// The refresh immediately after `self`.
    #[inline]
    pub fn next(self) -> FrameId {
        FrameId(self.0 + 1)
    }

    /// Refreshes elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: FrameId) -> u64 {
        self.0 - earlier.0
    }
}

impl std::ops::Add<u64> for FrameId {
    type Output = FrameId;
    #[inline]
    fn add(self, rhs: u64) -> FrameId {
        FrameId(self.0 + rhs)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

// ── FrameSource ───────────────────────────────────────────────────────────────

/// A one-shot callback queued for the next display refresh.
pub type FrameCallback = Box<dyn FnOnce()>;

/// The host's "call me on the next refresh" facility.
///
/// # Contract
///
/// - `callback` runs **at most once**, on a later refresh.
/// - It is never invoked synchronously from inside `request_frame`.
/// - Pending callbacks run in request (FIFO) order.
///
/// Implementations take `&self` and use interior mutability: the scheduler
/// requests frames from inside frame callbacks, so the source is always
/// shared.
pub trait FrameSource {
    fn request_frame(&self, callback: FrameCallback);
}

impl<F: FrameSource + ?Sized> FrameSource for Rc<F> {
    fn request_frame(&self, callback: FrameCallback) {
        (**self).request_frame(callback)
    }
}
