//! The shared, immutable node arena.
//!
//! A `Topology` is built once (by [`TopologyBuilder`](crate::TopologyBuilder)
//! or the document codec) and then only read.  Every agent's execution state
//! points into it by `NodeId`; none of them own any part of it.
//!
//! Nodes are stored in creation order and a parent is always created before
//! its children.  The codec creates nodes in pre-order, so two topologies
//! loaded from the same document compare equal with the derived `PartialEq`.

use bt_core::NodeId;

use crate::node::{Node, NodeKind};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Topology {
    pub(crate) nodes:          Vec<Node>,
    pub(crate) root:           NodeId,
    pub(crate) repeater_count: u32,
}

impl Topology {
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// `None` for `NodeId::INVALID` and any id past the end of the arena.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Parent of `id`, or `NodeId::INVALID` for the root and unknown ids.
    #[inline]
    pub fn parent(&self, id: NodeId) -> NodeId {
        self.get(id).map_or(NodeId::INVALID, |n| n.parent)
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], Node::children)
    }

    /// Number of `Repeater` nodes, i.e. the number of repeat counters each
    /// execution state must carry for this topology.
    #[inline]
    pub fn repeater_count(&self) -> usize {
        self.repeater_count as usize
    }

    /// All nodes in arena (pre-order) order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Number of nodes on the longest root-to-leaf path (1 for a lone leaf).
    pub fn depth(&self) -> usize {
        // Parents precede their children in the arena.
        let mut depth = vec![0usize; self.nodes.len()];
        let mut max = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            let d = if node.parent.is_valid() { depth[node.parent.index()] + 1 } else { 1 };
            depth[i] = d;
            max = max.max(d);
        }
        max
    }

    /// Number of leaf nodes.
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.kind, NodeKind::Leaf(_)))
            .count()
    }
}
