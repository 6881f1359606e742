//! `settle-core`: foundational types for the `settle` loop scheduler.
//!
//! This crate is a dependency of every other `settle-*` crate.  It has no
//! `settle-*` dependencies and a single required external one (`thiserror`),
//! plus optional `serde`.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`simulation`]  | `Simulation` trait (advance + equilibrium/optimized)  |
//! | [`frame`]       | `FrameSource` trait, `FrameCallback`, `FrameId`       |
//! | [`config`]      | `LoopConfig`, `ErrorPolicy`                           |
//! | [`error`]       | `LoopError`, `LoopResult`, `RegistryKind`, `BoxError` |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to `LoopConfig`, `ErrorPolicy` |
//!           | and `FrameId` so applications can load them from JSON.     |

pub mod config;
pub mod error;
pub mod frame;
pub mod simulation;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{ErrorPolicy, LoopConfig};
pub use error::{BoxError, LoopError, LoopResult, RegistryKind};
pub use frame::{FrameCallback, FrameId, FrameSource};
pub use simulation::Simulation;
