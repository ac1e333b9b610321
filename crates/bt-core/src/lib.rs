//! `bt-core`: foundational types for the `rust_bt` behavior-tree engine.
//!
//! This crate is a dependency of every other `bt-*` crate.  It has no `bt-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`ids`]       | `AgentId`, `NodeId`                                   |
//! | [`status`]    | `Status` (Success/Fail/Running), `Flow` (Down/Up)     |
//! | [`position`]  | `Position` (path-request targets)                     |
//! | [`time`]      | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]       | `SimRng`                                              |
//! | [`error`]     | `BtError`, `BtResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod ids;
pub mod position;
pub mod rng;
pub mod status;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{BtError, BtResult};
pub use ids::{AgentId, NodeId};
pub use position::Position;
pub use rng::SimRng;
pub use status::{Flow, Status};
pub use time::{SimClock, SimConfig, Tick};
