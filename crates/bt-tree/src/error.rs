use thiserror::Error;

use bt_core::NodeId;

use crate::NodeClass;

/// A document could not be turned into a topology.
///
/// Every node-level variant carries `node`: the offending node re-serialized
/// as compact JSON, so the log line points at the exact entry that failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("document has no `rootNode` entry")]
    MissingRoot,

    #[error("node has no `type`: {node}")]
    MissingType { node: String },

    #[error("unknown node type {code}: {node}")]
    UnknownType { code: i64, node: String },

    #[error("{name:?} is not a known {class} name: {node}")]
    UnknownName { class: NodeClass, name: String, node: String },

    #[error("node is missing field `{field}`: {node}")]
    MissingField { field: &'static str, node: String },

    #[error("field `{field}` is not an integer: {node}")]
    NotAnInteger { field: &'static str, node: String },

    #[error("invalid value {value} for field `{field}`: {node}")]
    InvalidField { field: &'static str, value: i64, node: String },

    #[error("{class} node has no children: {node}")]
    MissingChildren { class: NodeClass, node: String },
}

#[derive(Debug, Error)]
pub enum TreeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    #[error("topology already has a root ({0})")]
    RootAlreadySet(NodeId),

    #[error("topology has no root node")]
    NoRoot,

    #[error("leaf node {0} cannot have children")]
    LeafHasNoChildren(NodeId),

    #[error("decorator node {0} already has a child")]
    DecoratorOccupied(NodeId),

    #[error("node {node} is incomplete: {reason}")]
    Incomplete { node: NodeId, reason: &'static str },

    #[error("node {0} is not a repeater")]
    NotARepeater(NodeId),

    #[error("node {0} is not a FindPathTo leaf")]
    NotAPathLeaf(NodeId),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TreeResult<T> = Result<T, TreeError>;
