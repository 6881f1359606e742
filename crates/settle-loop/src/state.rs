//! Scheduler state and counters.

use std::fmt;

use settle_core::LoopError;

/// Where the advance/dispatch/reschedule cycle is.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum LoopPhase {
    /// No iteration executing and no frame requested.
    #[default]
    Idle,
    /// An iteration is executing or a frame has been requested for the next one.
    Active,
}

impl fmt::Display for LoopPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopPhase::Idle   => f.write_str("idle"),
            LoopPhase::Active => f.write_str("active"),
        }
    }
}

/// Lifetime counters, readable through `LoopScheduler::stats`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Iterations started (each one calls `Simulation::advance` once).
    pub iterations:       u64,
    /// Calls made to `FrameSource::request_frame`.
    pub frames_requested: u64,
    /// Equilibrium registry dispatches.
    pub settle_events:    u64,
    /// Failures reported through the error channel.
    pub errors:           u64,
}

/// Mutable state owned by one scheduler.
#[derive(Debug, Default)]
pub(crate) struct LoopState {
    /// User intent to keep animating.
    pub playing:    bool,
    /// Simulation's equilibrium flag as last observed by the cycle.
    pub settled:    bool,
    /// The cycle stopped on a failure under `ErrorPolicy::Halt`.
    pub halted:     bool,
    pub phase:      LoopPhase,
    pub stats:      LoopStats,
    pub last_error: Option<LoopError>,
}
