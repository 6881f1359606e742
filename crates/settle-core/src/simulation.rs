//! The `Simulation` trait: the capability the loop drives.

use crate::BoxError;

/// A steppable system that converges toward equilibrium.
///
/// The scheduler only ever calls [`advance`][Self::advance] and reads the two
/// flags; it never mutates the simulation any other way.  Application code
/// that disturbs the system (moves a particle, changes a force) does so
/// through the shared handle returned by `LoopScheduler::simulation` and then
/// calls `LoopScheduler::update` to wake a settled loop.
///
/// # Example
///
/// ```rust,ignore
/// struct Countdown { left: u32 }
///
/// impl Simulation for Countdown {
///     type Error = std::convert::Infallible;
///
///     fn advance(&mut self) -> Result<(), Self::Error> {
///         self.left = self.left.saturating_sub(1);
///         Ok(())
///     }
///     fn equilibrium(&self) -> bool { self.left == 0 }
///     fn optimized(&self) -> bool { true }
/// }
/// ```
pub trait Simulation {
    /// Failure raised by a step.  Boxed into `LoopError::Simulation` by the
    /// scheduler.
    type Error: Into<BoxError>;

    /// Advance the system by one discrete step.
    ///
    /// May change the value reported by [`equilibrium`][Self::equilibrium].
    fn advance(&mut self) -> Result<(), Self::Error>;

    /// `true` once the system has stabilised below its convergence threshold.
    fn equilibrium(&self) -> bool;

    /// `true` if the loop should stop scheduling frames at equilibrium.
    ///
    /// When `false` the loop keeps animating while playing and never fires
    /// equilibrium callbacks.
    fn optimized(&self) -> bool;
}

impl<S: Simulation + ?Sized> Simulation for Box<S> {
    type Error = S::Error;

    fn advance(&mut self) -> Result<(), Self::Error> {
        (**self).advance()
    }

    fn equilibrium(&self) -> bool {
        (**self).equilibrium()
    }

    fn optimized(&self) -> bool {
        (**self).optimized()
    }
}
