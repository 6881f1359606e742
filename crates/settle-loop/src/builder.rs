//! Fluent builder for constructing a [`LoopScheduler`].

use std::cell::RefCell;
use std::rc::Rc;

use settle_core::{FrameSource, LoopConfig, LoopResult, Simulation};

use crate::scheduler::Shared;
use crate::state::LoopState;
use crate::{Callback, CallbackRegistry, ErrorCallback, LoopScheduler};

/// Fluent builder for [`LoopScheduler<S, F>`].
///
/// # Required inputs
///
/// - `S: Simulation`: the system to drive
/// - `F: FrameSource`: where to request frames (e.g.
///   `settle_frame::ManualFrameSource`)
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                        |
/// |----------------------|--------------------------------|
/// | `.config(c)`         | `LoopConfig::default()`        |
/// | `.on_update(cb)`     | no frame callbacks             |
/// | `.on_equilibrium(cb)`| no equilibrium callbacks       |
/// | `.on_error(cb)`      | no error callbacks             |
///
/// Callbacks given to the builder are installed before the priming
/// iteration, so they already see it.
///
/// # Example
///
/// ```rust,ignore
/// let frames = ManualFrameSource::new();
/// let scheduler = LoopBuilder::new(sim, frames.clone())
///     .config(LoopConfig { start_playing: true, ..LoopConfig::default() })
///     .on_update(Callback::new(|| println!("step")))
///     .build()?;
/// frames.run_until_idle(None);
/// ```
pub struct LoopBuilder<S, F> {
    simulation:            S,
    frames:                F,
    config:                LoopConfig,
    frame_callbacks:       Vec<Callback>,
    equilibrium_callbacks: Vec<Callback>,
    error_callbacks:       Vec<ErrorCallback>,
}

impl<S, F> LoopBuilder<S, F>
where
    S: Simulation + 'static,
    F: FrameSource + 'static,
{
    pub fn new(simulation: S, frames: F) -> Self {
        Self {
            simulation,
            frames,
            config:                LoopConfig::default(),
            frame_callbacks:       Vec::new(),
            equilibrium_callbacks: Vec::new(),
            error_callbacks:       Vec::new(),
        }
    }

    pub fn config(mut self, config: LoopConfig) -> Self {
        self.config = config;
        self
    }

    pub fn on_update(mut self, callback: impl Into<Option<Callback>>) -> Self {
        self.frame_callbacks.extend(callback.into());
        self
    }

    pub fn on_equilibrium(mut self, callback: impl Into<Option<Callback>>) -> Self {
        self.equilibrium_callbacks.extend(callback.into());
        self
    }

    pub fn on_error(mut self, callback: impl Into<Option<ErrorCallback>>) -> Self {
        self.error_callbacks.extend(callback.into());
        self
    }

    /// Validate the config and install callbacks.  With
    /// `config.prime_on_build` set, also run the first iteration.
    ///
    /// A failure during the priming iteration does not fail the build; it is
    /// reported like any other loop failure (see
    /// [`LoopScheduler::take_error`]).
    pub fn build(self) -> LoopResult<LoopScheduler<S, F>> {
        self.config.validate()?;

        let state = LoopState {
            playing: self.config.start_playing,
            ..LoopState::default()
        };

        let shared = Rc::new(Shared {
            simulation:            Rc::new(RefCell::new(self.simulation)),
            frames:                self.frames,
            state:                 RefCell::new(state),
            frame_callbacks:       CallbackRegistry::new(),
            equilibrium_callbacks: CallbackRegistry::new(),
            error_callbacks:       RefCell::new(Vec::new()),
            config:                self.config,
        });

        for callback in self.frame_callbacks {
            shared.frame_callbacks.register(callback);
        }
        for callback in self.equilibrium_callbacks {
            shared.equilibrium_callbacks.register(callback);
        }
        for callback in self.error_callbacks {
            shared.register_error(callback);
        }

        if shared.config.prime_on_build {
            shared.start();
        }

        Ok(LoopScheduler { shared })
    }
}
