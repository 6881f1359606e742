//! Loop configuration.

use crate::{LoopError, LoopResult};

// ── ErrorPolicy ───────────────────────────────────────────────────────────────

/// What the cycle does after a collaborator failure has been reported.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorPolicy {
    /// Stop the cycle: no further frame is requested and the loop returns to
    /// `Idle`.  `play()` or a woken `update()` starts it again.
    #[default]
    Halt,
    /// Keep going: remaining callbacks of the failing dispatch still run and
    /// the normal reschedule decision is made.
    Continue,
}

// ── LoopConfig ────────────────────────────────────────────────────────────────

/// Scheduler and frame-driver configuration.
///
/// Typically built in code; with the `serde` feature it can also be loaded
/// from a JSON file by the application.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LoopConfig {
    /// Value of `playing` right after construction.  Default: `false`.
    pub start_playing: bool,

    /// Run one iteration immediately while building the scheduler.
    /// Default: `true`.
    pub prime_on_build: bool,

    /// Behaviour after a failed step or callback.  Default: `Halt`.
    pub error_policy: ErrorPolicy,

    /// Display refresh rate used by paced frame drivers.  Default: 60.
    pub refresh_rate_hz: u32,

    /// Stop a frame driver after this many refreshes.  `None` runs until the
    /// loop goes idle.
    pub max_frames: Option<u64>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            start_playing:   false,
            prime_on_build:  true,
            error_policy:    ErrorPolicy::Halt,
            refresh_rate_hz: 60,
            max_frames:      None,
        }
    }
}

impl LoopConfig {
    /// Reject values no driver can honour.
    pub fn validate(&self) -> LoopResult<()> {
        if self.refresh_rate_hz == 0 {
            return Err(LoopError::Config("refresh_rate_hz must be > 0".into()));
        }
        if self.max_frames == Some(0) {
            return Err(LoopError::Config(
                "max_frames must be > 0 (use None for no limit)".into(),
            ));
        }
        Ok(())
    }
}
