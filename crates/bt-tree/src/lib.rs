//! `bt-tree`: the shared behavior-tree topology and its document codec.
//!
//! A tree is loaded once, frozen into a [`Topology`] arena, and then read
//! concurrently by every agent's execution state.  Nothing in this crate
//! knows about agents or ticks.
//!
//! # What lives here
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`node`]      | `Node`, `NodeKind`, `NodeSpec`, `Leaf`, `Destination`      |
//! | [`topology`]  | `Topology` arena                                           |
//! | [`builder`]   | `TopologyBuilder`                                          |
//! | [`document`]  | serde `TreeDocument` / `NodeDocument`                      |
//! | [`codec`]     | `from_document`, `to_document`, JSON load/save            |
//! | [`error`]     | `ParseError`, `TreeError`, `TreeResult`                    |

pub mod builder;
pub mod codec;
pub mod document;
pub mod error;
pub mod node;
pub mod topology;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use builder::TopologyBuilder;
pub use codec::{load_tree_json, load_tree_reader, load_tree_str, save_tree_json, to_json_string};
pub use document::{NodeDocument, TreeDocument};
pub use error::{ParseError, TreeError, TreeResult};
pub use node::{Destination, Leaf, Node, NodeClass, NodeKind, NodeSpec};
pub use topology::Topology;
