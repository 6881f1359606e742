//! Refresh-rate model.

use std::fmt;
use std::time::Duration;

use settle_core::FrameId;

/// Converts between refresh counts and wall-clock time.
///
/// Cheap to copy; holds no heap data.
#[derive(Copy, Clone, Debug)]
pub struct FrameClock {
    /// Display refreshes per second.  Must be > 0.
    pub refresh_rate_hz: u32,
    /// The current refresh, advanced by [`FrameClock::advance`].
    pub current_frame: FrameId,
}

impl FrameClock {
    /// A clock at `refresh_rate_hz`, starting at `FrameId::ZERO`.
    ///
    /// A rate of 0 is clamped to 1 Hz; configs are validated before they get
    /// here.
    pub fn new(refresh_rate_hz: u32) -> Self {
        Self {
            refresh_rate_hz: refresh_rate_hz.max(1),
            current_frame:   FrameId::ZERO,
        }
    }

    /// Time between two refreshes.
    #[inline]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(1) / self.refresh_rate_hz
    }

    #[inline]
    pub fn advance(&mut self) {
        self.current_frame = self.current_frame.next();
    }

    /// Nominal time since `FrameId::ZERO`.
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.current_frame.0 as f64 / self.refresh_rate_hz as f64)
    }

    /// How many refreshes span `span`? (rounds up)
    pub fn frames_for(&self, span: Duration) -> u64 {
        let nanos = span.as_nanos();
        let per = self.interval().as_nanos().max(1);
        nanos.div_ceil(per) as u64
    }
}

impl fmt::Display for FrameClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.3} s @ {} Hz)",
            self.current_frame,
            self.elapsed().as_secs_f64(),
            self.refresh_rate_hz
        )
    }
}
