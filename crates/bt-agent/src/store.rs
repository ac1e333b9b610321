//! The population-level storage contract and the layout selector.

use std::fmt;
use std::str::FromStr;

use bt_core::{AgentId, NodeId, Status};

use crate::{AgentError, AgentResult, ExecSnapshot, ExecState};

// ── StorageLayout ─────────────────────────────────────────────────────────────

/// Which [`ExecStore`] implementation backs a population.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StorageLayout {
    /// One [`ExecRecord`](crate::ExecRecord) per agent.
    #[default]
    Records,
    /// One column per field ([`ColumnStore`](crate::ColumnStore)).
    Columns,
}

impl StorageLayout {
    pub const ALL: [StorageLayout; 2] = [StorageLayout::Records, StorageLayout::Columns];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageLayout::Records => "records",
            StorageLayout::Columns => "columns",
        }
    }
}

impl fmt::Display for StorageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageLayout {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "records" | "aos" => Ok(StorageLayout::Records),
            "columns" | "soa" => Ok(StorageLayout::Columns),
            other => Err(AgentError::UnknownLayout(other.to_owned())),
        }
    }
}

// ── ExecStore ─────────────────────────────────────────────────────────────────

/// Execution states for a whole population, indexed by `AgentId`.
///
/// Every store is bound to one topology through its root `NodeId` and its
/// repeater count; [`rebind`](Self::rebind) moves it onto another one.
///
/// Agent ids are dense: removing an agent moves the last agent into the
/// freed index (swap-remove), so callers holding ids must apply the returned
/// remapping.
pub trait ExecStore {
    /// Mutable per-agent handle.
    type Slot<'a>: ExecState
    where
        Self: 'a;

    fn layout(&self) -> StorageLayout;

    fn len(&self) -> usize;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Root of the topology this store is bound to.
    fn root(&self) -> NodeId;

    /// Counters carried per agent.
    fn repeaters(&self) -> usize;

    fn slot_mut(&mut self, agent: AgentId) -> Option<Self::Slot<'_>>;

    /// Cursor and last status without taking a mutable borrow.
    fn cursor_status(&self, agent: AgentId) -> Option<(NodeId, Status)>;

    fn snapshot(&self, agent: AgentId) -> Option<ExecSnapshot>;

    /// Append a fresh state and return its id.
    fn spawn(&mut self) -> AgentResult<AgentId>;

    /// Free `agent`'s state.  If another agent was moved into the freed index,
    /// returns that agent's *previous* id.
    fn remove(&mut self, agent: AgentId) -> AgentResult<Option<AgentId>>;

    /// Return one agent to the fresh state.
    fn reset(&mut self, agent: AgentId) -> AgentResult<()> {
        let root = self.root();
        let mut slot = self.slot_mut(agent).ok_or(AgentError::NotFound(agent))?;
        slot.reset(root);
        Ok(())
    }

    fn reset_all(&mut self);

    /// Bind to a new topology and reset every agent.
    fn rebind(&mut self, root: NodeId, repeaters: usize);

    /// Call `f` once per agent in ascending id order, collecting the results
    /// into `out` (cleared first).
    fn map_slots_into<T, F>(&mut self, out: &mut Vec<T>, f: F)
    where
        F: FnMut(AgentId, Self::Slot<'_>) -> T;

    /// Parallel [`map_slots_into`](Self::map_slots_into) on Rayon's global
    /// pool.  `out` still ends up in ascending id order.
    #[cfg(feature = "parallel")]
    fn par_map_slots_into<T, F>(&mut self, out: &mut Vec<T>, f: F)
    where
        T: Send,
        F: Fn(AgentId, Self::Slot<'_>) -> T + Sync + Send;
}

/// Next dense id for a store currently holding `len` agents.
pub(crate) fn next_id(len: usize) -> AgentResult<AgentId> {
    AgentId::try_from(len)
        .ok()
        .filter(|id| id.is_valid())
        .ok_or(AgentError::CapacityExhausted(len))
}
