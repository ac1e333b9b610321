//! Programmatic topology construction.
//!
//! ```rust,ignore
//! let mut b = TopologyBuilder::new();
//! let seq = b.add_root(NodeSpec::Sequence)?;
//! b.add_child(seq, NodeSpec::Leaf(Leaf::HasJob))?;
//! b.add_child(seq, NodeSpec::Leaf(Leaf::AssignJob))?;
//! let topology = b.build()?;
//! ```
//!
//! Nodes may be added in any order as long as the parent exists.  A
//! composite or decorator may sit without children while the tree is being
//! assembled; [`build`](TopologyBuilder::build) is where completeness is
//! checked.

use bt_core::NodeId;
use tracing::debug;

use crate::node::{Destination, Leaf, Node, NodeKind, NodeSpec};
use crate::topology::Topology;
use crate::{TreeError, TreeResult};

#[derive(Default, Debug)]
pub struct TopologyBuilder {
    nodes:     Vec<Node>,
    root:      NodeId,
    repeaters: u32,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes added so far.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create the root node.  Fails if a root already exists.
    pub fn add_root(&mut self, spec: NodeSpec) -> TreeResult<NodeId> {
        if self.root.is_valid() {
            return Err(TreeError::RootAlreadySet(self.root));
        }
        let id = self.push(NodeId::INVALID, 0, spec);
        self.root = id;
        Ok(id)
    }

    /// Append a node to `parent`'s child list.
    ///
    /// Composites accept any number of children; a decorator accepts exactly
    /// one; a leaf accepts none.
    pub fn add_child(&mut self, parent: NodeId, spec: NodeSpec) -> TreeResult<NodeId> {
        let node = self
            .nodes
            .get(parent.index())
            .ok_or(TreeError::NodeNotFound(parent))?;

        let slot = match &node.kind {
            NodeKind::Sequence(c) | NodeKind::Selector(c) => c.len() as u32,
            NodeKind::Repeater { child, .. }
            | NodeKind::RepeatUntilFail(child)
            | NodeKind::Succeeder(child)
            | NodeKind::Inverter(child) => {
                if child.is_valid() {
                    return Err(TreeError::DecoratorOccupied(parent));
                }
                0
            }
            NodeKind::Leaf(_) => return Err(TreeError::LeafHasNoChildren(parent)),
        };

        let id = self.push(parent, slot, spec);
        match &mut self.nodes[parent.index()].kind {
            NodeKind::Sequence(c) | NodeKind::Selector(c) => c.push(id),
            NodeKind::Repeater { child, .. }
            | NodeKind::RepeatUntilFail(child)
            | NodeKind::Succeeder(child)
            | NodeKind::Inverter(child) => *child = id,
            NodeKind::Leaf(_) => {}
        }
        Ok(id)
    }

    /// Change the iteration limit of a repeater.
    pub fn set_limit(&mut self, id: NodeId, new_limit: u32) -> TreeResult<()> {
        match self.nodes.get_mut(id.index()).map(|n| &mut n.kind) {
            Some(NodeKind::Repeater { limit, .. }) => {
                *limit = new_limit;
                Ok(())
            }
            Some(_) => Err(TreeError::NotARepeater(id)),
            None => Err(TreeError::NodeNotFound(id)),
        }
    }

    /// Change the destination policy of a `FindPathTo` leaf.
    pub fn set_destination(&mut self, id: NodeId, destination: Destination) -> TreeResult<()> {
        match self.nodes.get_mut(id.index()).map(|n| &mut n.kind) {
            Some(NodeKind::Leaf(Leaf::FindPathTo(d))) => {
                *d = destination;
                Ok(())
            }
            Some(_) => Err(TreeError::NotAPathLeaf(id)),
            None => Err(TreeError::NodeNotFound(id)),
        }
    }

    /// Validate and freeze the topology.
    pub fn build(self) -> TreeResult<Topology> {
        if !self.root.is_valid() {
            return Err(TreeError::NoRoot);
        }

        for (i, node) in self.nodes.iter().enumerate() {
            let reason = match &node.kind {
                NodeKind::Sequence(c) | NodeKind::Selector(c) if c.is_empty() => {
                    "composite has no children"
                }
                NodeKind::Repeater { child, .. }
                | NodeKind::RepeatUntilFail(child)
                | NodeKind::Succeeder(child)
                | NodeKind::Inverter(child)
                    if !child.is_valid() =>
                {
                    "decorator has no child"
                }
                _ => continue,
            };
            return Err(TreeError::Incomplete { node: NodeId(i as u32), reason });
        }

        debug!(
            nodes     = self.nodes.len(),
            repeaters = self.repeaters,
            "topology built"
        );

        Ok(Topology {
            nodes:          self.nodes,
            root:           self.root,
            repeater_count: self.repeaters,
        })
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn push(&mut self, parent: NodeId, slot: u32, spec: NodeSpec) -> NodeId {
        let kind = match spec {
            NodeSpec::Sequence => NodeKind::Sequence(Vec::new()),
            NodeSpec::Selector => NodeKind::Selector(Vec::new()),
            NodeSpec::Repeater { limit } => {
                let counter = self.repeaters;
                self.repeaters += 1;
                NodeKind::Repeater { child: NodeId::INVALID, limit, counter }
            }
            NodeSpec::RepeatUntilFail => NodeKind::RepeatUntilFail(NodeId::INVALID),
            NodeSpec::Succeeder => NodeKind::Succeeder(NodeId::INVALID),
            NodeSpec::Inverter => NodeKind::Inverter(NodeId::INVALID),
            NodeSpec::Leaf(leaf) => NodeKind::Leaf(leaf),
        };
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { parent, slot, kind });
        id
    }
}
