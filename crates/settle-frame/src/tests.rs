//! Unit tests for settle-frame.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use settle_core::{FrameId, FrameSource};

use crate::ManualFrameSource;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Request a callback that appends `label` to `log` when it runs.
fn push_label(source: &ManualFrameSource, log: &Rc<RefCell<Vec<&'static str>>>, label: &'static str) {
    let log = Rc::clone(log);
    source.request_frame(Box::new(move || log.borrow_mut().push(label)));
}

/// Request a callback that re-requests itself until `remaining` hits zero.
fn chain(source: &ManualFrameSource, remaining: Rc<RefCell<u32>>) {
    let handle = source.clone();
    source.request_frame(Box::new(move || {
        let left = {
            let mut r = remaining.borrow_mut();
            *r -= 1;
            *r
        };
        if left > 0 {
            chain(&handle, remaining);
        }
    }));
}

// ── ManualFrameSource ─────────────────────────────────────────────────────────

#[cfg(test)]
mod queue_tests {
    use super::*;

    #[test]
    fn request_is_never_synchronous() {
        let source = ManualFrameSource::new();
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);
        source.request_frame(Box::new(move || *flag.borrow_mut() = true));
        assert!(!*ran.borrow());
        assert_eq!(source.pending(), 1);
        assert_eq!(source.requests(), 1);
    }

    #[test]
    fn refresh_runs_in_fifo_order() {
        let source = ManualFrameSource::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        push_label(&source, &log, "a");
        push_label(&source, &log, "b");
        push_label(&source, &log, "c");
        assert_eq!(source.fire_refresh(), 3);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert!(source.is_idle());
        assert_eq!(source.fired(), 3);
    }

    #[test]
    fn callbacks_requested_during_refresh_wait_for_next() {
        let source = ManualFrameSource::new();
        chain(&source, Rc::new(RefCell::new(3)));

        assert_eq!(source.fire_refresh(), 1);
        assert_eq!(source.pending(), 1, "re-request queued for the next refresh");
        assert_eq!(source.fire_refresh(), 1);
        assert_eq!(source.fire_refresh(), 1);
        assert!(source.is_idle());
        assert_eq!(source.requests(), 3);
    }

    #[test]
    fn refresh_counter_advances_even_when_empty() {
        let source = ManualFrameSource::new();
        assert_eq!(source.current_frame(), FrameId::ZERO);
        assert_eq!(source.fire_refresh(), 0);
        assert_eq!(source.current_frame(), FrameId(1));
    }

    #[test]
    fn clones_share_one_queue() {
        let source = ManualFrameSource::new();
        let other = source.clone();
        other.request_frame(Box::new(|| {}));
        assert_eq!(source.pending(), 1);
        source.fire_refresh();
        assert!(other.is_idle());
    }

    #[test]
    fn fire_next_runs_one_without_refreshing() {
        let source = ManualFrameSource::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        push_label(&source, &log, "first");
        push_label(&source, &log, "second");
        assert!(source.fire_next());
        assert_eq!(*log.borrow(), vec!["first"]);
        assert_eq!(source.current_frame(), FrameId::ZERO);
        assert!(source.fire_next());
        assert!(!source.fire_next());
    }

    #[test]
    fn run_until_idle_respects_limit() {
        let source = ManualFrameSource::new();
        chain(&source, Rc::new(RefCell::new(10)));
        assert_eq!(source.run_until_idle(Some(4)), 4);
        assert_eq!(source.pending(), 1);
        assert_eq!(source.run_until_idle(None), 6);
        assert!(source.is_idle());
    }

    #[test]
    fn run_until_idle_on_empty_queue_fires_nothing() {
        let source = ManualFrameSource::new();
        assert_eq!(source.run_until_idle(None), 0);
        assert_eq!(source.current_frame(), FrameId::ZERO);
    }

    #[test]
    fn dropped_owner_makes_callback_a_noop() {
        // The pattern the scheduler relies on: callbacks hold a Weak.
        let source = ManualFrameSource::new();
        let owner = Rc::new(RefCell::new(0u32));
        let weak: Weak<RefCell<u32>> = Rc::downgrade(&owner);
        source.request_frame(Box::new(move || {
            if let Some(owner) = weak.upgrade() {
                *owner.borrow_mut() += 1;
            }
        }));
        drop(owner);
        assert_eq!(source.fire_refresh(), 1);
    }
}

// ── FrameClock ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod clock_tests {
    use std::time::Duration;

    use crate::FrameClock;
    use settle_core::FrameId;

    #[test]
    fn interval_from_rate() {
        assert_eq!(FrameClock::new(50).interval(), Duration::from_millis(20));
        assert_eq!(FrameClock::new(1).interval(), Duration::from_secs(1));
    }

    #[test]
    fn zero_rate_clamped() {
        assert_eq!(FrameClock::new(0).refresh_rate_hz, 1);
    }

    #[test]
    fn elapsed_tracks_frames() {
        let mut clock = FrameClock::new(10);
        for _ in 0..15 {
            clock.advance();
        }
        assert_eq!(clock.current_frame, FrameId(15));
        assert!((clock.elapsed().as_secs_f64() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn frames_for_rounds_up() {
        let clock = FrameClock::new(50);
        assert_eq!(clock.frames_for(Duration::from_millis(40)), 2);
        assert_eq!(clock.frames_for(Duration::from_millis(41)), 3);
        assert_eq!(clock.frames_for(Duration::ZERO), 0);
    }

    #[test]
    fn display() {
        let mut clock = FrameClock::new(4);
        clock.advance();
        clock.advance();
        assert_eq!(clock.to_string(), "F2 (0.500 s @ 4 Hz)");
    }
}

// ── FrameDriver ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod driver_tests {
    use super::*;

    use settle_core::{LoopConfig, LoopError};

    use crate::FrameDriver;

    #[test]
    fn runs_until_idle() {
        let source = ManualFrameSource::new();
        chain(&source, Rc::new(RefCell::new(5)));
        let stats = FrameDriver::new(source.clone(), 1000).paced(false).run();
        assert_eq!(stats.frames, 5);
        assert_eq!(stats.callbacks, 5);
        assert!(source.is_idle());
    }

    #[test]
    fn stops_at_frame_limit() {
        let source = ManualFrameSource::new();
        chain(&source, Rc::new(RefCell::new(100)));
        let mut driver = FrameDriver::new(source.clone(), 1000)
            .paced(false)
            .max_frames(Some(7));
        let stats = driver.run();
        assert_eq!(stats.frames, 7);
        assert_eq!(driver.clock().current_frame, FrameId(7));
        assert_eq!(source.pending(), 1);
    }

    #[test]
    fn idle_source_returns_immediately() {
        let stats = FrameDriver::new(ManualFrameSource::new(), 60).run();
        assert_eq!(stats.frames, 0);
        assert_eq!(stats.callbacks, 0);
    }

    #[test]
    fn paced_run_takes_at_least_the_nominal_time() {
        let source = ManualFrameSource::new();
        chain(&source, Rc::new(RefCell::new(3)));
        let stats = FrameDriver::new(source, 200).run();
        assert_eq!(stats.frames, 3);
        assert!(stats.elapsed >= std::time::Duration::from_millis(15));
    }

    #[test]
    fn from_config_validates() {
        let bad = LoopConfig { refresh_rate_hz: 0, ..LoopConfig::default() };
        assert!(matches!(
            FrameDriver::from_config(ManualFrameSource::new(), &bad),
            Err(LoopError::Config(_))
        ));

        let cfg = LoopConfig { refresh_rate_hz: 120, max_frames: Some(3), ..LoopConfig::default() };
        let source = ManualFrameSource::new();
        chain(&source, Rc::new(RefCell::new(10)));
        let mut driver = FrameDriver::from_config(source, &cfg).unwrap().paced(false);
        assert_eq!(driver.clock().refresh_rate_hz, 120);
        assert_eq!(driver.run().frames, 3);
    }
}
