//! Loop error type.
//!
//! Every failure the scheduler can observe funnels into [`LoopError`].  The
//! scheduler never propagates these out of `play`/`update`/frame callbacks;
//! it reports them through its error channel and then applies the configured
//! [`ErrorPolicy`][crate::ErrorPolicy].

use std::fmt;

use thiserror::Error;

/// Type-erased error produced by a collaborator (simulation or callback).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which callback registry a failing callback belonged to.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum RegistryKind {
    /// Callbacks run after every simulation step (`on_update`).
    Frame,
    /// Callbacks run once per settle event in optimized mode (`on_equilibrium`).
    Equilibrium,
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKind::Frame       => f.write_str("frame"),
            RegistryKind::Equilibrium => f.write_str("equilibrium"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoopError {
    #[error("simulation step failed: {0}")]
    Simulation(#[source] BoxError),

    #[error("{registry} callback #{index} failed: {source}")]
    Callback {
        registry: RegistryKind,
        index:    usize,
        #[source]
        source:   BoxError,
    },

    #[error("simulation is already borrowed; the loop cannot advance it")]
    SimulationBusy,

    #[error("loop configuration error: {0}")]
    Config(String),
}

impl LoopError {
    /// `true` if the failure came from a registered callback rather than the
    /// simulation itself.
    pub fn is_callback(&self) -> bool {
        matches!(self, LoopError::Callback { .. })
    }
}

/// Shorthand result type for all `settle-*` crates.
pub type LoopResult<T> = Result<T, LoopError>;
