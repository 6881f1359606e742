//! `settle-loop`: the self-rescheduling loop that drives a simulation to
//! equilibrium.
//!
//! # The cycle
//!
//! ```text
//! Idle ──play() / update() on a settled loop──▶ Active ─┐
//!                                                       │ (first iteration runs now)
//!   ┌───────────────────────────────────────────────────┘
//!   ▼
//!   ① simulation.advance()
//!   ② frame callbacks          (registration order, post-advance state)
//!   ③ optimized && equilibrium → equilibrium callbacks   (one settle event)
//!   ④ playing && (!optimized || !equilibrium)
//!        yes → frames.request_frame(① …)   stay Active
//!        no  → Idle
//! ```
//!
//! A failure in ①–③ is reported through the error channel (log, `on_error`
//! callbacks, `take_error`).  With `ErrorPolicy::Halt` the cycle then goes
//! `Idle` and `update()` restarts it; with `ErrorPolicy::Continue` the
//! iteration carries on to ④.
//!
//! # Threading
//!
//! Single-threaded by construction (`Rc`/`RefCell`): frame sources, callbacks,
//! and the control API all run on the thread that owns the scheduler.
//! Callbacks may call `play`/`pause`/`update` and register further callbacks;
//! none of that starts a second concurrent cycle.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use settle_frame::ManualFrameSource;
//! use settle_loop::{Callback, LoopScheduler};
//!
//! let frames = ManualFrameSource::new();
//! let scheduler = LoopScheduler::new(sim, frames.clone())?;
//! scheduler
//!     .on_update(Callback::new(|| println!("step")))
//!     .on_equilibrium(Callback::new(|| println!("settled")))
//!     .play();
//! frames.run_until_idle(None);
//! ```

pub mod builder;
pub mod callback;
pub mod error;
pub mod registry;
pub mod scheduler;
pub mod state;


pub use builder::LoopBuilder;
pub use callback::{Callback, CallbackResult, ErrorCallback};
pub use error::DispatchError;
pub use registry::CallbackRegistry;
pub use scheduler::{LoopScheduler, WeakScheduler};
pub use state::{LoopPhase, LoopStats};

pub use settle_core::{ErrorPolicy, LoopConfig, LoopError, LoopResult, RegistryKind};
