//! Unit tests for settle-core primitives.

#[cfg(test)]
mod frame {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::{FrameCallback, FrameId, FrameSource};

    #[test]
    fn frame_arithmetic() {
        let f = FrameId(10);
        assert_eq!(f + 5, FrameId(15));
        assert_eq!(f.next(), FrameId(11));
        assert_eq!(FrameId(15).since(FrameId(10)), 5);
    }

    #[test]
    fn ordering() {
        assert!(FrameId::ZERO < FrameId(1));
        assert_eq!(FrameId::default(), FrameId::ZERO);
    }

    #[test]
    fn display() {
        assert_eq!(FrameId(7).to_string(), "F7");
    }

    /// Stores requests without running them.
    struct Collect(RefCell<Vec<FrameCallback>>);

    impl FrameSource for Collect {
        fn request_frame(&self, callback: FrameCallback) {
            self.0.borrow_mut().push(callback);
        }
    }

    #[test]
    fn rc_forwards_requests() {
        let source = Rc::new(Collect(RefCell::new(Vec::new())));
        let handle: Rc<Collect> = Rc::clone(&source);
        handle.request_frame(Box::new(|| {}));
        handle.request_frame(Box::new(|| {}));
        assert_eq!(source.0.borrow().len(), 2);
    }
}

#[cfg(test)]
mod simulation {
    use crate::Simulation;

    struct Countdown {
        left: u32,
    }

    impl Simulation for Countdown {
        type Error = std::convert::Infallible;

        fn advance(&mut self) -> Result<(), Self::Error> {
            self.left = self.left.saturating_sub(1);
            Ok(())
        }
        fn equilibrium(&self) -> bool {
            self.left == 0
        }
        fn optimized(&self) -> bool {
            true
        }
    }

    #[test]
    fn boxed_simulation_forwards() {
        let mut sim: Box<Countdown> = Box::new(Countdown { left: 2 });
        assert!(!sim.equilibrium());
        sim.advance().unwrap();
        sim.advance().unwrap();
        assert!(sim.equilibrium());
        assert!(sim.optimized());
    }
}

#[cfg(test)]
mod config {
    use crate::{ErrorPolicy, LoopConfig, LoopError};

    #[test]
    fn defaults_start_paused_and_primed() {
        let cfg = LoopConfig::default();
        assert!(!cfg.start_playing);
        assert!(cfg.prime_on_build);
        assert_eq!(cfg.error_policy, ErrorPolicy::Halt);
        assert_eq!(cfg.refresh_rate_hz, 60);
        assert_eq!(cfg.max_frames, None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_refresh_rate_rejected() {
        let cfg = LoopConfig { refresh_rate_hz: 0, ..LoopConfig::default() };
        assert!(matches!(cfg.validate(), Err(LoopError::Config(_))));
    }

    #[test]
    fn zero_max_frames_rejected() {
        let cfg = LoopConfig { max_frames: Some(0), ..LoopConfig::default() };
        assert!(matches!(cfg.validate(), Err(LoopError::Config(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let cfg: LoopConfig =
            serde_json::from_str(r#"{ "start_playing": true, "error_policy": "continue" }"#)
                .unwrap();
        assert!(cfg.start_playing);
        assert_eq!(cfg.error_policy, ErrorPolicy::Continue);
        assert_eq!(cfg.refresh_rate_hz, 60);
    }
}

#[cfg(test)]
mod error {
    use crate::{LoopError, RegistryKind};

    #[test]
    fn callback_error_message_names_registry() {
        let err = LoopError::Callback {
            registry: RegistryKind::Equilibrium,
            index:    2,
            source:   "boom".into(),
        };
        assert_eq!(err.to_string(), "equilibrium callback #2 failed: boom");
        assert!(err.is_callback());
    }

    #[test]
    fn simulation_error_keeps_source() {
        let err = LoopError::Simulation("diverged".into());
        assert!(!err.is_callback());
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("diverged"));
    }
}
