//! `bt-agent`: per-agent execution state for the `rust_bt` engine.
//!
//! Each agent walks the shared topology with its own cursor.  This crate
//! stores those cursors (plus status, flow, active child and repeat
//! counters) for a whole population, in one of two interchangeable layouts.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                  |
//! |--------------|-----------------------------------------------------------|
//! | [`state`]    | `ExecState` accessor trait, `ExecSnapshot`                |
//! | [`store`]    | `ExecStore` population trait, `StorageLayout`             |
//! | [`record`]   | `ExecRecord`, `RecordStore` (one record per agent)        |
//! | [`column`]   | `ColumnStore`, `ColumnSlot` (one column per field)        |
//! | [`any`]      | `ExecStates`, `AnySlot` (layout picked at runtime)        |
//! | [`error`]    | `AgentError`, `AgentResult`                               |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                     |
//! |------------|------------------------------------------------------------|
//! | `parallel` | `ExecStore::par_map_slots_into` on Rayon's pool            |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.         |

pub mod any;
pub mod column;
pub mod error;
pub mod record;
pub mod state;
pub mod store;


pub use any::{AnySlot, ExecStates};
pub use column::{ColumnSlot, ColumnStore};
pub use error::{AgentError, AgentResult};
pub use record::{ExecRecord, RecordStore};
pub use state::{ExecSnapshot, ExecState};
pub use store::{ExecStore, StorageLayout};
