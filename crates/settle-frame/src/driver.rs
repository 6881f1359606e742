//! `FrameDriver`: a paced host loop over a [`ManualFrameSource`].

use std::thread;
use std::time::{Duration, Instant};

use settle_core::{LoopConfig, LoopResult};

use crate::{FrameClock, ManualFrameSource};

/// Summary of one [`FrameDriver::run`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DriverStats {
    /// Refreshes fired.
    pub frames:    u64,
    /// Frame callbacks run across all refreshes.
    pub callbacks: u64,
    /// Wall time spent in `run`.
    pub elapsed:   Duration,
}

/// Plays the role of the display: fires one refresh of a
/// [`ManualFrameSource`] per interval until nothing is pending.
///
/// ```rust,ignore
/// let frames = ManualFrameSource::new();
/// let scheduler = LoopScheduler::new(sim, frames.clone())?;
/// scheduler.play();
/// let stats = FrameDriver::new(frames, 60).run();
/// ```
pub struct FrameDriver {
    source:     ManualFrameSource,
    clock:      FrameClock,
    max_frames: Option<u64>,
    paced:      bool,
}

impl FrameDriver {
    /// A paced driver at `refresh_rate_hz` with no frame limit.
    pub fn new(source: ManualFrameSource, refresh_rate_hz: u32) -> Self {
        Self {
            source,
            clock:      FrameClock::new(refresh_rate_hz),
            max_frames: None,
            paced:      true,
        }
    }

    /// Validate `config` and take its refresh rate and frame limit.
    pub fn from_config(source: ManualFrameSource, config: &LoopConfig) -> LoopResult<Self> {
        config.validate()?;
        Ok(Self::new(source, config.refresh_rate_hz).max_frames(config.max_frames))
    }

    /// Stop after `limit` refreshes (`None` = run until idle).
    pub fn max_frames(mut self, limit: Option<u64>) -> Self {
        self.max_frames = limit;
        self
    }

    /// Sleep between refreshes (`true`, default) or fire them back to back.
    pub fn paced(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Fire refreshes until the source is idle or the frame limit is hit.
    ///
    /// Can be called again after the application wakes the loop (e.g. with
    /// `LoopScheduler::update`); the clock keeps counting across runs.
    pub fn run(&mut self) -> DriverStats {
        let start = Instant::now();
        let interval = self.clock.interval();
        let mut deadline = start;
        let mut stats = DriverStats::default();

        while !self.source.is_idle() {
            if self.max_frames.is_some_and(|max| stats.frames >= max) {
                log::debug!("frame limit reached at {}", self.clock);
                break;
            }
            if self.paced {
                deadline += interval;
                let now = Instant::now();
                if deadline > now {
                    thread::sleep(deadline - now);
                }
            }
            stats.callbacks += self.source.fire_refresh() as u64;
            stats.frames += 1;
            self.clock.advance();
        }

        stats.elapsed = start.elapsed();
        log::debug!(
            "driver stopped after {} frame(s), {} callback(s) in {:.3} s",
            stats.frames,
            stats.callbacks,
            stats.elapsed.as_secs_f64()
        );
        stats
    }
}
