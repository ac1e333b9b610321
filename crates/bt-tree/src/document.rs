//! Persisted tree document, shared with the editor.
//!
//! # JSON format
//!
//! ```json
//! { "rootNode": [
//!     { "type": 2, "name": "SequenceComposite", "childs": [
//!         { "type": 1, "name": "HasJobLeaf" },
//!         { "type": 4, "name": "RepeaterDecorator", "limit": 3, "childs": [
//!             { "type": 1, "name": "FindPathToLeaf", "destination": 2 }
//!         ] }
//!     ] }
//! ] }
//! ```
//!
//! | Field         | Meaning                                                   |
//! |---------------|-----------------------------------------------------------|
//! | `type`        | 1 = leaf, 2 = composite, 4 = decorator                    |
//! | `name`        | concrete kind, e.g. `SelectorComposite`, `MoveToLeaf`     |
//! | `childs`      | child nodes in evaluation order; omitted when empty       |
//! | `limit`       | `RepeaterDecorator` only; 0 or absent = unbounded         |
//! | `destination` | `FindPathToLeaf` only; 0..=4, see [`Destination`]         |
//!
//! Every field is optional at this layer, and the numeric fields are kept as
//! raw JSON values, so that a missing or wrongly typed field is reported with
//! the node's full content instead of a bare serde message.  Unknown fields
//! (editor layout data and the like) are ignored.
//!
//! [`Destination`]: crate::Destination

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeDocument {
    #[serde(rename = "rootNode", default, skip_serializing_if = "Option::is_none")]
    pub root_node: Option<Vec<NodeDocument>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeDocument {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub class: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<Value>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub childs: Vec<NodeDocument>,
}

impl TreeDocument {
    pub fn with_root(root: NodeDocument) -> Self {
        TreeDocument { root_node: Some(vec![root]) }
    }
}

impl NodeDocument {
    /// Compact JSON of this node (children included), used as error context.
    pub fn raw(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{self:?}"))
    }
}
