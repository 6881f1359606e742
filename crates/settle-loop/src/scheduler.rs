//! The `LoopScheduler` handle and its advance/dispatch/reschedule cycle.

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use settle_core::{
    ErrorPolicy, FrameSource, LoopConfig, LoopError, LoopResult, RegistryKind, Simulation,
};

use crate::state::LoopState;
use crate::{Callback, CallbackRegistry, ErrorCallback, LoopPhase, LoopStats};

/// Simulation flags read by the cycle.
#[derive(Copy, Clone, Debug)]
struct Flags {
    equilibrium: bool,
    optimized:   bool,
}

// ── Shared ────────────────────────────────────────────────────────────────────

/// Everything one scheduler owns.  Lives in an `Rc` so frame callbacks can
/// hold a `Weak` to it.
pub(crate) struct Shared<S, F> {
    pub config:                LoopConfig,
    pub simulation:            Rc<RefCell<S>>,
    pub frames:                F,
    pub state:                 RefCell<LoopState>,
    pub frame_callbacks:       CallbackRegistry,
    pub equilibrium_callbacks: CallbackRegistry,
    pub error_callbacks:       RefCell<Vec<ErrorCallback>>,
}

impl<S, F> Shared<S, F>
where
    S: Simulation + 'static,
    F: FrameSource + 'static,
{
    /// `Idle → Active`, then run the first iteration right away.
    ///
    /// A no-op while the cycle is already active: the executing iteration or
    /// the pending frame carries on and picks up the new state at its
    /// reschedule decision.
    pub(crate) fn start(self: &Rc<Self>) {
        {
            let mut state = self.state.borrow_mut();
            if state.phase == LoopPhase::Active {
                log::trace!("start ignored: cycle already active");
                return;
            }
            state.phase = LoopPhase::Active;
            state.halted = false;
        }
        log::debug!("cycle started");
        self.iterate();
    }

    /// Entry point of a requested frame.
    fn on_frame(self: &Rc<Self>) {
        if self.state.borrow().phase != LoopPhase::Active {
            log::trace!("stale frame ignored");
            return;
        }
        self.iterate();
    }

    fn iterate(self: &Rc<Self>) {
        match self.step() {
            Ok(flags) => self.reschedule(flags),
            Err(err) => self.halt(err),
        }
    }

    // ── One iteration ─────────────────────────────────────────────────────

    /// advance → frame callbacks → equilibrium check.
    ///
    /// Returns the flags for the reschedule decision, or the failure that
    /// stops the cycle.  Under `ErrorPolicy::Continue` collaborator failures
    /// are reported here and do not stop the iteration.
    fn step(self: &Rc<Self>) -> LoopResult<Flags> {
        let policy = self.config.error_policy;
        let iteration = {
            let mut state = self.state.borrow_mut();
            state.stats.iterations += 1;
            state.stats.iterations
        };
        log::trace!("iteration {iteration}");

        // ① Advance the simulation.
        if let Err(err) = self.advance() {
            // A busy simulation cannot be stepped or observed: always fatal.
            if policy == ErrorPolicy::Halt || matches!(err, LoopError::SimulationBusy) {
                return Err(err);
            }
            self.report(err);
        }

        // ② Frame callbacks observe the post-advance state.
        self.dispatch(&self.frame_callbacks, RegistryKind::Frame)?;

        // ③ Equilibrium check: optimized mode only, once per settle event.
        let flags = self.observe()?;
        if flags.optimized && flags.equilibrium {
            let settle_events = {
                let mut state = self.state.borrow_mut();
                state.stats.settle_events += 1;
                state.stats.settle_events
            };
            log::info!("equilibrium reached after {iteration} iteration(s) (settle event {settle_events})");
            self.dispatch(&self.equilibrium_callbacks, RegistryKind::Equilibrium)?;
        }

        // Callbacks may have disturbed the simulation; decide on fresh flags.
        let flags = self.observe()?;
        self.state.borrow_mut().settled = flags.equilibrium;
        Ok(flags)
    }

    fn advance(&self) -> LoopResult<()> {
        let mut simulation = self
            .simulation
            .try_borrow_mut()
            .map_err(|_| LoopError::SimulationBusy)?;
        simulation
            .advance()
            .map_err(|err| LoopError::Simulation(err.into()))
    }

    fn observe(&self) -> LoopResult<Flags> {
        let simulation = self
            .simulation
            .try_borrow()
            .map_err(|_| LoopError::SimulationBusy)?;
        Ok(Flags {
            equilibrium: simulation.equilibrium(),
            optimized:   simulation.optimized(),
        })
    }

    fn dispatch(&self, registry: &CallbackRegistry, kind: RegistryKind) -> LoopResult<()> {
        match self.config.error_policy {
            ErrorPolicy::Halt => registry
                .dispatch_all()
                .map_err(|err| err.into_loop_error(kind)),
            ErrorPolicy::Continue => {
                registry.dispatch_each(|err| self.report(err.into_loop_error(kind)));
                Ok(())
            }
        }
    }

    // ── Reschedule / stop ─────────────────────────────────────────────────

    fn reschedule(self: &Rc<Self>, flags: Flags) {
        let playing = self.state.borrow().playing;
        let keep_going = playing && (!flags.optimized || !flags.equilibrium);

        if !keep_going {
            self.state.borrow_mut().phase = LoopPhase::Idle;
            log::debug!(
                "cycle idle (playing={playing}, equilibrium={}, optimized={})",
                flags.equilibrium,
                flags.optimized
            );
            return;
        }

        self.state.borrow_mut().stats.frames_requested += 1;
        let weak: Weak<Self> = Rc::downgrade(self);
        self.frames.request_frame(Box::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.on_frame();
            }
        }));
    }

    fn halt(&self, err: LoopError) {
        self.report(err);
        let mut state = self.state.borrow_mut();
        state.phase = LoopPhase::Idle;
        state.halted = true;
        log::debug!("cycle halted after failure; update() restarts it");
    }

    /// Log, count, deliver to every error callback, and keep as last error.
    pub(crate) fn report(&self, err: LoopError) {
        log::warn!("loop failure: {err}");
        let callbacks = self.error_callbacks.borrow().clone();
        for callback in &callbacks {
            callback.call(&err);
        }
        let mut state = self.state.borrow_mut();
        state.stats.errors += 1;
        state.last_error = Some(err);
    }

    pub(crate) fn register_error(&self, callback: ErrorCallback) -> bool {
        let mut callbacks = self.error_callbacks.borrow_mut();
        if callbacks.iter().any(|c| ErrorCallback::same(c, &callback)) {
            return false;
        }
        callbacks.push(callback);
        true
    }
}

// ── LoopScheduler ─────────────────────────────────────────────────────────────

/// Drives a [`Simulation`] toward equilibrium, one step per display refresh.
///
/// `LoopScheduler<S, F>` is a cheap, cloneable, single-threaded handle.  Each
/// iteration of its cycle:
///
/// 1. calls [`Simulation::advance`];
/// 2. dispatches the frame registry ([`on_update`][Self::on_update]) in
///    registration order;
/// 3. if the simulation is `optimized` and at `equilibrium`, dispatches the
///    equilibrium registry ([`on_equilibrium`][Self::on_equilibrium]);
/// 4. requests the next frame from `F` while
///    `playing && (!optimized || !equilibrium)`, otherwise goes idle.
///
/// The first iteration after [`play`][Self::play] or a waking
/// [`update`][Self::update] runs immediately; later ones run from frame
/// callbacks.  All control methods return `&Self` for chaining.
///
/// Failures never escape the cycle.  They are logged, passed to every
/// [`on_error`][Self::on_error] callback, kept for
/// [`take_error`][Self::take_error], and then handled per
/// [`ErrorPolicy`].
///
/// Create via [`LoopBuilder`][crate::LoopBuilder] or [`LoopScheduler::new`].
pub struct LoopScheduler<S, F> {
    pub(crate) shared: Rc<Shared<S, F>>,
}

impl<S, F> Clone for LoopScheduler<S, F> {
    fn clone(&self) -> Self {
        Self { shared: Rc::clone(&self.shared) }
    }
}

impl<S, F> LoopScheduler<S, F>
where
    S: Simulation + 'static,
    F: FrameSource + 'static,
{
    /// Build with the default [`LoopConfig`]: paused, one priming iteration.
    pub fn new(simulation: S, frames: F) -> LoopResult<Self> {
        crate::LoopBuilder::new(simulation, frames).build()
    }

    // ── Control ───────────────────────────────────────────────────────────

    /// Start animating.  Idempotent while already playing.
    ///
    /// Marks the loop unsettled and starts the cycle if it is idle.
    pub fn play(&self) -> &Self {
        {
            let mut state = self.shared.state.borrow_mut();
            if state.playing {
                return self;
            }
            state.playing = true;
            state.settled = false;
        }
        log::debug!("play");
        self.shared.start();
        self
    }

    /// Stop requesting frames.
    ///
    /// A frame that is already requested still runs one more iteration; it
    /// then sees `playing == false` and does not request another.
    pub fn pause(&self) -> &Self {
        self.shared.state.borrow_mut().playing = false;
        log::debug!("pause");
        self
    }

    pub fn toggle(&self) -> &Self {
        if self.is_playing() {
            self.pause()
        } else {
            self.play()
        }
    }

    /// Signal that external state changed.
    ///
    /// Does nothing unless the loop had settled (or halted on a failure).
    /// Otherwise clears that state and, if playing, restarts the cycle.
    pub fn update(&self) -> &Self {
        let wake = {
            let mut state = self.shared.state.borrow_mut();
            if !state.settled && !state.halted {
                return self;
            }
            state.settled = false;
            state.halted = false;
            state.playing
        };
        log::debug!("update: woken (playing={wake})");
        if wake {
            self.shared.start();
        }
        self
    }

    /// Register a callback run after every simulation step.
    ///
    /// `None` and already-registered callbacks are ignored.
    pub fn on_update(&self, callback: impl Into<Option<Callback>>) -> &Self {
        self.shared.frame_callbacks.register(callback);
        self
    }

    /// Register a callback run each time the loop settles in optimized mode.
    ///
    /// `None` and already-registered callbacks are ignored.
    pub fn on_equilibrium(&self, callback: impl Into<Option<Callback>>) -> &Self {
        self.shared.equilibrium_callbacks.register(callback);
        self
    }

    /// Register a receiver for reported failures.
    pub fn on_error(&self, callback: impl Into<Option<ErrorCallback>>) -> &Self {
        if let Some(callback) = callback.into() {
            self.shared.register_error(callback);
        }
        self
    }

    // ── Introspection ─────────────────────────────────────────────────────

    pub fn is_playing(&self) -> bool {
        self.shared.state.borrow().playing
    }

    /// The simulation's equilibrium flag as last observed by the cycle,
    /// cleared by `play()` and by a waking `update()`.
    pub fn is_settled(&self) -> bool {
        self.shared.state.borrow().settled
    }

    /// `true` if the last cycle stopped on a failure under `ErrorPolicy::Halt`.
    pub fn is_halted(&self) -> bool {
        self.shared.state.borrow().halted
    }

    pub fn phase(&self) -> LoopPhase {
        self.shared.state.borrow().phase
    }

    pub fn stats(&self) -> LoopStats {
        self.shared.state.borrow().stats
    }

    /// Take the most recently reported failure, if any.
    pub fn take_error(&self) -> Option<LoopError> {
        self.shared.state.borrow_mut().last_error.take()
    }

    pub fn frame_callback_count(&self) -> usize {
        self.shared.frame_callbacks.len()
    }

    pub fn equilibrium_callback_count(&self) -> usize {
        self.shared.equilibrium_callbacks.len()
    }

    /// Shared handle to the driven simulation.
    ///
    /// Borrow it to read state from a frame callback, or mutably to disturb
    /// the system before calling [`update`][Self::update].  Do not hold a
    /// borrow across a call that may run an iteration; the cycle reports
    /// `LoopError::SimulationBusy` instead of advancing.
    pub fn simulation(&self) -> Rc<RefCell<S>> {
        Rc::clone(&self.shared.simulation)
    }

    pub fn config(&self) -> &LoopConfig {
        &self.shared.config
    }

    /// The frame source the loop requests frames from.
    pub fn frames(&self) -> &F {
        &self.shared.frames
    }

    /// A handle that does not keep the scheduler alive.  Capture this in
    /// callbacks that call back into the scheduler.
    pub fn downgrade(&self) -> WeakScheduler<S, F> {
        WeakScheduler { shared: Rc::downgrade(&self.shared) }
    }

    /// Read-only view of the simulation, for quick inspection.
    pub fn borrow_simulation(&self) -> Ref<'_, S> {
        self.shared.simulation.borrow()
    }
}

// ── WeakScheduler ─────────────────────────────────────────────────────────────

/// Non-owning counterpart of [`LoopScheduler`].
pub struct WeakScheduler<S, F> {
    shared: Weak<Shared<S, F>>,
}

impl<S, F> Clone for WeakScheduler<S, F> {
    fn clone(&self) -> Self {
        Self { shared: Weak::clone(&self.shared) }
    }
}

impl<S, F> WeakScheduler<S, F> {
    /// `None` once every `LoopScheduler` handle has been dropped.
    pub fn upgrade(&self) -> Option<LoopScheduler<S, F>> {
        self.shared.upgrade().map(|shared| LoopScheduler { shared })
    }
}
