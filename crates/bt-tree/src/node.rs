//! Node records stored in the topology arena.
//!
//! Every node is a plain record: a parent index, its slot in the parent's
//! child list, and a tagged [`NodeKind`] carrying exactly the fields that
//! kind needs.  Children are referenced by [`NodeId`]; nothing owns anything
//! else, so the whole tree is one flat `Vec<Node>`.

use std::fmt;

use bt_core::NodeId;

// ── NodeClass ─────────────────────────────────────────────────────────────────

/// Coarse node category, persisted as the integer `type` discriminator.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum NodeClass {
    Leaf,
    Composite,
    Decorator,
}

impl NodeClass {
    /// Integer written to the `type` field of a node document.
    pub fn code(self) -> i64 {
        match self {
            NodeClass::Leaf      => 1,
            NodeClass::Composite => 2,
            NodeClass::Decorator => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<NodeClass> {
        match code {
            1 => Some(NodeClass::Leaf),
            2 => Some(NodeClass::Composite),
            4 => Some(NodeClass::Decorator),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeClass::Leaf      => "leaf",
            NodeClass::Composite => "composite",
            NodeClass::Decorator => "decorator",
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Destination ───────────────────────────────────────────────────────────────

/// Destination policy of a `FindPathTo` leaf.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Destination {
    Random,
    Dwelling,
    WorkingPlace,
    InventoryTaskGiver,
    InventoryTaskReceiver,
}

impl Destination {
    pub const ALL: [Destination; 5] = [
        Destination::Random,
        Destination::Dwelling,
        Destination::WorkingPlace,
        Destination::InventoryTaskGiver,
        Destination::InventoryTaskReceiver,
    ];

    /// Integer written to the `destination` field.
    pub fn code(self) -> i64 {
        match self {
            Destination::Random                => 0,
            Destination::Dwelling              => 1,
            Destination::WorkingPlace          => 2,
            Destination::InventoryTaskGiver    => 3,
            Destination::InventoryTaskReceiver => 4,
        }
    }

    pub fn from_code(code: i64) -> Option<Destination> {
        Self::ALL.into_iter().find(|d| d.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Destination::Random                => "Random",
            Destination::Dwelling              => "Dwelling",
            Destination::WorkingPlace          => "WorkingPlace",
            Destination::InventoryTaskGiver    => "InventoryTaskGiver",
            Destination::InventoryTaskReceiver => "InventoryTaskReceiver",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Leaf ──────────────────────────────────────────────────────────────────────

/// Every leaf kind the engine can evaluate.
///
/// Leaves are the only nodes that call into the action provider.  Pure
/// queries settle in the tick they are visited; `WaitForPath`, `MoveTo`,
/// `WaitDayTime`, `WaitNightTime` and `AskInventoryTask` may stay `Running`
/// across ticks.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Leaf {
    WaitForPath,
    MoveTo,
    HasDwelling,
    SetDwelling,
    EnterDwelling,
    ExitDwelling,
    EnterWorkingPlace,
    ExitWorkingPlace,
    HasJob,
    HasStaticJob,
    AssignJob,
    IsDayTime,
    IsNightTime,
    WaitDayTime,
    WaitNightTime,
    AskInventoryTask,
    TakeResource,
    PutResource,
    FindPathTo(Destination),
}

impl Leaf {
    /// One of every leaf kind (`FindPathTo` with a `Random` destination).
    pub const ALL: [Leaf; 19] = [
        Leaf::WaitForPath,
        Leaf::MoveTo,
        Leaf::HasDwelling,
        Leaf::SetDwelling,
        Leaf::EnterDwelling,
        Leaf::ExitDwelling,
        Leaf::EnterWorkingPlace,
        Leaf::ExitWorkingPlace,
        Leaf::HasJob,
        Leaf::HasStaticJob,
        Leaf::AssignJob,
        Leaf::IsDayTime,
        Leaf::IsNightTime,
        Leaf::WaitDayTime,
        Leaf::WaitNightTime,
        Leaf::AskInventoryTask,
        Leaf::TakeResource,
        Leaf::PutResource,
        Leaf::FindPathTo(Destination::Random),
    ];

    /// Persisted `name` of this leaf kind.
    pub fn name(self) -> &'static str {
        match self {
            Leaf::WaitForPath       => "WaitForPathLeaf",
            Leaf::MoveTo            => "MoveToLeaf",
            Leaf::HasDwelling       => "HasDwellingLeaf",
            Leaf::SetDwelling       => "SetDwellingLeaf",
            Leaf::EnterDwelling     => "EnterDwellingLeaf",
            Leaf::ExitDwelling      => "ExitDwellingLeaf",
            Leaf::EnterWorkingPlace => "EnterWorkingPlaceLeaf",
            Leaf::ExitWorkingPlace  => "ExitWorkingPlaceLeaf",
            Leaf::HasJob            => "HasJobLeaf",
            Leaf::HasStaticJob      => "HasStaticJobLeaf",
            Leaf::AssignJob         => "AssignJobLeaf",
            Leaf::IsDayTime         => "IsDayTimeLeaf",
            Leaf::IsNightTime       => "IsNightTimeLeaf",
            Leaf::WaitDayTime       => "WaitDayTimeLeaf",
            Leaf::WaitNightTime     => "WaitNightTimeLeaf",
            Leaf::AskInventoryTask  => "AskInventoryTaskLeaf",
            Leaf::TakeResource      => "TakeResourceLeaf",
            Leaf::PutResource       => "PutResourceLeaf",
            Leaf::FindPathTo(_)     => "FindPathToLeaf",
        }
    }
}

// ── NodeSpec ──────────────────────────────────────────────────────────────────

/// What a node *is*, without its links.  Passed to
/// [`TopologyBuilder`](crate::TopologyBuilder) to create nodes and recovered
/// from a built node via [`Node::spec`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum NodeSpec {
    Sequence,
    Selector,
    /// `limit == 0` repeats forever.
    Repeater { limit: u32 },
    RepeatUntilFail,
    Succeeder,
    Inverter,
    Leaf(Leaf),
}

impl NodeSpec {
    pub fn class(self) -> NodeClass {
        match self {
            NodeSpec::Sequence | NodeSpec::Selector => NodeClass::Composite,
            NodeSpec::Repeater { .. }
            | NodeSpec::RepeatUntilFail
            | NodeSpec::Succeeder
            | NodeSpec::Inverter => NodeClass::Decorator,
            NodeSpec::Leaf(_) => NodeClass::Leaf,
        }
    }

    /// Persisted `name` of this kind.
    pub fn name(self) -> &'static str {
        match self {
            NodeSpec::Sequence        => "SequenceComposite",
            NodeSpec::Selector        => "SelectorComposite",
            NodeSpec::Repeater { .. } => "RepeaterDecorator",
            NodeSpec::RepeatUntilFail => "RepeatUntilFailDecorator",
            NodeSpec::Succeeder       => "SucceederDecorator",
            NodeSpec::Inverter        => "InverterDecorator",
            NodeSpec::Leaf(leaf)      => leaf.name(),
        }
    }
}

impl fmt::Display for NodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeSpec::Repeater { limit } => write!(f, "{}(limit={limit})", self.name()),
            NodeSpec::Leaf(Leaf::FindPathTo(d)) => write!(f, "{}({d})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}

// ── NodeKind ──────────────────────────────────────────────────────────────────

/// A node's kind together with its child links.
///
/// A decorator's child is `NodeId::INVALID` only while the topology is
/// still being built; [`TopologyBuilder::build`](crate::TopologyBuilder::build)
/// rejects any that remain unset.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum NodeKind {
    Sequence(Vec<NodeId>),
    Selector(Vec<NodeId>),
    Repeater {
        child: NodeId,
        limit: u32,
        /// Dense index of this repeater's counter in each execution state.
        counter: u32,
    },
    RepeatUntilFail(NodeId),
    Succeeder(NodeId),
    Inverter(NodeId),
    Leaf(Leaf),
}

// ── Node ──────────────────────────────────────────────────────────────────────

/// One record of the topology arena.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Node {
    /// Parent node.  `NodeId::INVALID` exactly for the root.
    pub parent: NodeId,
    /// Position of this node in its parent's child list (0 for the root and
    /// for decorator children).
    pub slot: u32,
    pub kind: NodeKind,
}

impl Node {
    pub fn spec(&self) -> NodeSpec {
        match &self.kind {
            NodeKind::Sequence(_)             => NodeSpec::Sequence,
            NodeKind::Selector(_)             => NodeSpec::Selector,
            NodeKind::Repeater { limit, .. }  => NodeSpec::Repeater { limit: *limit },
            NodeKind::RepeatUntilFail(_)      => NodeSpec::RepeatUntilFail,
            NodeKind::Succeeder(_)            => NodeSpec::Succeeder,
            NodeKind::Inverter(_)             => NodeSpec::Inverter,
            NodeKind::Leaf(leaf)              => NodeSpec::Leaf(*leaf),
        }
    }

    #[inline]
    pub fn class(&self) -> NodeClass {
        self.spec().class()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        !self.parent.is_valid()
    }

    /// Child links in evaluation order.  Empty for leaves and for a decorator
    /// whose child is not set yet.
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Sequence(c) | NodeKind::Selector(c) => c,
            NodeKind::Repeater { child, .. }
            | NodeKind::RepeatUntilFail(child)
            | NodeKind::Succeeder(child)
            | NodeKind::Inverter(child) => {
                if child.is_valid() {
                    std::slice::from_ref(child)
                } else {
                    &[]
                }
            }
            NodeKind::Leaf(_) => &[],
        }
    }
}
