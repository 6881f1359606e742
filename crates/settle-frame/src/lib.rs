//! `settle-frame`: frame sources for the settle loop scheduler.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`queue`]  | `ManualFrameSource` (`Rc<RefCell<VecDeque<FrameCallback>>>`) |
//! | [`clock`]  | `FrameClock`: refresh rate ↔ wall time                       |
//! | [`driver`] | `FrameDriver`, `DriverStats`: paced host loop                |
//!
//! # Refresh model (summary)
//!
//! ```text
//! request_frame(cb)  → cb appended to pending
//! fire_refresh()     → frame += 1; run every cb pending at refresh start
//!                      (cbs requested meanwhile wait for the next refresh)
//! FrameDriver::run() → sleep(interval); fire_refresh(); … until idle
//! ```

pub mod clock;
pub mod driver;
pub mod queue;

#[cfg(test)]
mod tests;

pub use clock::FrameClock;
pub use driver::{DriverStats, FrameDriver};
pub use queue::ManualFrameSource;
