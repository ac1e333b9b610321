//! `bt-behavior`: the action-provider contract and leaf evaluation.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`provider`] | `ActionProvider` trait                                     |
//! | [`leaf`]     | `evaluate_leaf`, `StaticJobQuery`                          |
//! | [`noop`]     | `NoopProvider`: answers `false` to everything             |
//! | [`error`]    | `BehaviorError`, `BehaviorResult<T>`                       |
//!
//! # Design notes
//!
//! Leaves are the only nodes that talk to the world, and they only talk to
//! it through `ActionProvider`.  The interpreter in `bt-sim` hands every leaf
//! it reaches to [`evaluate_leaf`] and acts on the returned `Status`; it never
//! calls the provider itself.
//!
//! Providers only need `&self`: they may be called for many agents in
//! parallel and own whatever synchronisation their state requires.

pub mod error;
pub mod leaf;
pub mod noop;
pub mod provider;


pub use error::{BehaviorError, BehaviorResult};
pub use leaf::{StaticJobQuery, evaluate_leaf};
pub use noop::NoopProvider;
pub use provider::ActionProvider;
