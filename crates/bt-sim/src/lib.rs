//! `bt-sim`: interpreter and population runner for the `rust_bt` engine.
//!
//! # Per-agent tick
//!
//! ```text
//! cursor == INVALID ?  → restart at root (Down, Running)
//! loop up to max_steps_per_tick:
//!   evaluate node under cursor
//!     composite / decorator, Down → enter first child
//!     composite / decorator, Up   → next child, repeat, or leave with result
//!     leaf → Running              → suspend (cursor stays on the leaf)
//!     leaf → Success / Fail       → leave with result
//!   cursor == INVALID ?  → pass complete
//! ```
//!
//! # Population tick
//!
//! ```text
//! Runner::tick_all:
//!   ① on_tick_start
//!   ② tick every agent   (Rayon with the `parallel` feature)
//!   ③ per-agent hooks    (ascending AgentId, calling thread)
//!   ④ on_tick_end, advance the tick counter
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Ticks agents on Rayon's thread pool.                   |
//! | `serde`    | Derives `Serialize`/`Deserialize` on the config types. |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use bt_behavior::NoopProvider;
//! use bt_sim::{NoopObserver, RunnerBuilder};
//!
//! let topology = bt_tree::load_tree_json(Path::new("trees/colony.json"))?;
//! let mut runner = RunnerBuilder::new(topology, NoopProvider)
//!     .agents(1_000)
//!     .build()?;
//! runner.run_ticks(100, &mut NoopObserver);
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod observer;
pub mod runner;


pub use builder::RunnerBuilder;
pub use config::{InterpreterConfig, RunnerConfig};
pub use error::{SimError, SimResult};
pub use interpreter::{TickOutcome, TickReport, is_suspended_at_leaf, tick};
pub use observer::{NoopObserver, TickObserver, TickStats};
pub use runner::Runner;
