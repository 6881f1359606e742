use settle_core::{BoxError, LoopError, RegistryKind};
use thiserror::Error;

/// A callback failed while its registry was being dispatched.
#[derive(Debug, Error)]
#[error("callback #{index} failed: {source}")]
pub struct DispatchError {
    /// Position of the failing callback in the registry.
    pub index:  usize,
    #[source]
    pub source: BoxError,
}

impl DispatchError {
    /// Attach the registry the callback belonged to.
    pub fn into_loop_error(self, registry: RegistryKind) -> LoopError {
        LoopError::Callback {
            registry,
            index:  self.index,
            source: self.source,
        }
    }
}
