//! `ManualFrameSource`: host-pumped FIFO of pending frame callbacks.
//!
//! # Why this exists
//!
//! A browser-style `requestAnimationFrame` is owned by the host event loop.
//! Outside such a host, something has to play that role: collect requested
//! callbacks and run them on the next "refresh".  `ManualFrameSource` is that
//! queue; whoever owns the event loop (a test, a [`FrameDriver`], a game
//! loop) decides when a refresh happens by calling
//! [`fire_refresh`][ManualFrameSource::fire_refresh].
//!
//! # Refresh semantics
//!
//! A refresh runs exactly the callbacks that were pending when it began.
//! Callbacks requested *during* a refresh (the normal case for a
//! self-rescheduling loop) wait for the next one, so a loop can never spin
//! more than once per refresh.
//!
//! [`FrameDriver`]: crate::FrameDriver

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use settle_core::{FrameCallback, FrameId, FrameSource};

#[derive(Default)]
struct Queue {
    pending:  VecDeque<FrameCallback>,
    current:  FrameId,
    /// Total `request_frame` calls ever made.
    requests: u64,
    /// Total callbacks ever run.
    fired:    u64,
}

/// A cloneable handle to a shared queue of frame callbacks.
///
/// Clones share the same queue: hand one clone to the scheduler and keep
/// another to pump refreshes.
#[derive(Clone, Default)]
pub struct ManualFrameSource {
    inner: Rc<RefCell<Queue>>,
}

impl ManualFrameSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new refresh and run every callback that was pending when it
    /// began, in request order.
    ///
    /// Returns the number of callbacks run.  The refresh counter advances even
    /// when nothing was pending.
    pub fn fire_refresh(&self) -> usize {
        // Take the batch out before running anything: callbacks request new
        // frames, which needs the queue.
        let batch: Vec<FrameCallback> = {
            let mut queue = self.inner.borrow_mut();
            queue.current = queue.current.next();
            queue.pending.drain(..).collect()
        };
        let count = batch.len();
        log::trace!("refresh {}: {} callback(s)", self.current_frame(), count);

        for callback in batch {
            self.inner.borrow_mut().fired += 1;
            callback();
        }
        count
    }

    /// Run only the oldest pending callback, without starting a new refresh.
    ///
    /// Returns `false` if nothing was pending.
    pub fn fire_next(&self) -> bool {
        let next = {
            let mut queue = self.inner.borrow_mut();
            let next = queue.pending.pop_front();
            if next.is_some() {
                queue.fired += 1;
            }
            next
        };
        match next {
            Some(callback) => {
                callback();
                true
            }
            None => false,
        }
    }

    /// Refresh until nothing is pending, or until `limit` refreshes have
    /// fired.  Returns the number of refreshes.
    pub fn run_until_idle(&self, limit: Option<u64>) -> u64 {
        let mut refreshes = 0;
        while !self.is_idle() {
            if limit.is_some_and(|max| refreshes >= max) {
                break;
            }
            self.fire_refresh();
            refreshes += 1;
        }
        refreshes
    }

    /// Number of callbacks waiting for the next refresh.
    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    pub fn is_idle(&self) -> bool {
        self.inner.borrow().pending.is_empty()
    }

    /// Total `request_frame` calls since creation.
    pub fn requests(&self) -> u64 {
        self.inner.borrow().requests
    }

    /// Total callbacks run since creation.
    pub fn fired(&self) -> u64 {
        self.inner.borrow().fired
    }

    /// The most recent refresh (`FrameId::ZERO` before the first one).
    pub fn current_frame(&self) -> FrameId {
        self.inner.borrow().current
    }
}

impl FrameSource for ManualFrameSource {
    fn request_frame(&self, callback: FrameCallback) {
        let mut queue = self.inner.borrow_mut();
        queue.pending.push_back(callback);
        queue.requests += 1;
    }
}
