//! Layout chosen at runtime.
//!
//! `ExecStates` wraps either store and is itself an [`ExecStore`], so a
//! runner configured from a file can pick its layout without becoming
//! generic over it.  Each slot access pays one predictable branch; code that
//! knows its layout at compile time should use the concrete store instead.

use bt_core::{AgentId, Flow, NodeId, Status};

use crate::{
    AgentResult, ColumnSlot, ColumnStore, ExecRecord, ExecSnapshot, ExecState, ExecStore,
    RecordStore, StorageLayout,
};

/// Forward an expression to whichever variant is live.
macro_rules! dispatch {
    ($value:expr, $inner:ident => $body:expr) => {
        match $value {
            Self::Records($inner) => $body,
            Self::Columns($inner) => $body,
        }
    };
}

// ── AnySlot ───────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum AnySlot<'a> {
    Records(&'a mut ExecRecord),
    Columns(ColumnSlot<'a>),
}

impl ExecState for AnySlot<'_> {
    #[inline]
    fn cursor(&self) -> NodeId {
        dispatch!(self, s => s.cursor())
    }
    #[inline]
    fn status(&self) -> Status {
        dispatch!(self, s => s.status())
    }
    #[inline]
    fn flow(&self) -> Flow {
        dispatch!(self, s => s.flow())
    }
    #[inline]
    fn active_child(&self) -> u32 {
        dispatch!(self, s => s.active_child())
    }
    #[inline]
    fn repeat_counts(&self) -> &[u32] {
        dispatch!(self, s => s.repeat_counts())
    }
    #[inline]
    fn set_cursor(&mut self, node: NodeId) {
        dispatch!(self, s => s.set_cursor(node))
    }
    #[inline]
    fn set_status(&mut self, status: Status) {
        dispatch!(self, s => s.set_status(status))
    }
    #[inline]
    fn set_flow(&mut self, flow: Flow) {
        dispatch!(self, s => s.set_flow(flow))
    }
    #[inline]
    fn set_active_child(&mut self, index: u32) {
        dispatch!(self, s => s.set_active_child(index))
    }
    #[inline]
    fn repeat_counts_mut(&mut self) -> &mut [u32] {
        dispatch!(self, s => s.repeat_counts_mut())
    }
}

// ── ExecStates ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub enum ExecStates {
    Records(RecordStore),
    Columns(ColumnStore),
}

impl ExecStates {
    pub fn new(layout: StorageLayout, root: NodeId, repeaters: usize, count: usize) -> Self {
        match layout {
            StorageLayout::Records => ExecStates::Records(RecordStore::new(root, repeaters, count)),
            StorageLayout::Columns => ExecStates::Columns(ColumnStore::new(root, repeaters, count)),
        }
    }
}

impl ExecStore for ExecStates {
    type Slot<'a> = AnySlot<'a> where Self: 'a;

    fn layout(&self) -> StorageLayout {
        dispatch!(self, s => s.layout())
    }

    fn len(&self) -> usize {
        dispatch!(self, s => s.len())
    }

    fn root(&self) -> NodeId {
        dispatch!(self, s => s.root())
    }

    fn repeaters(&self) -> usize {
        dispatch!(self, s => s.repeaters())
    }

    fn slot_mut(&mut self, agent: AgentId) -> Option<AnySlot<'_>> {
        match self {
            ExecStates::Records(s) => s.slot_mut(agent).map(AnySlot::Records),
            ExecStates::Columns(s) => s.slot_mut(agent).map(AnySlot::Columns),
        }
    }

    fn cursor_status(&self, agent: AgentId) -> Option<(NodeId, Status)> {
        dispatch!(self, s => s.cursor_status(agent))
    }

    fn snapshot(&self, agent: AgentId) -> Option<ExecSnapshot> {
        dispatch!(self, s => s.snapshot(agent))
    }

    fn spawn(&mut self) -> AgentResult<AgentId> {
        dispatch!(self, s => s.spawn())
    }

    fn remove(&mut self, agent: AgentId) -> AgentResult<Option<AgentId>> {
        dispatch!(self, s => s.remove(agent))
    }

    fn reset_all(&mut self) {
        dispatch!(self, s => s.reset_all())
    }

    fn rebind(&mut self, root: NodeId, repeaters: usize) {
        dispatch!(self, s => s.rebind(root, repeaters))
    }

    fn map_slots_into<T, F>(&mut self, out: &mut Vec<T>, mut f: F)
    where
        F: FnMut(AgentId, Self::Slot<'_>) -> T,
    {
        match self {
            ExecStates::Records(s) => s.map_slots_into(out, |id, slot| f(id, AnySlot::Records(slot))),
            ExecStates::Columns(s) => s.map_slots_into(out, |id, slot| f(id, AnySlot::Columns(slot))),
        }
    }

    #[cfg(feature = "parallel")]
    fn par_map_slots_into<T, F>(&mut self, out: &mut Vec<T>, f: F)
    where
        T: Send,
        F: Fn(AgentId, Self::Slot<'_>) -> T + Sync + Send,
    {
        match self {
            ExecStates::Records(s) => {
                s.par_map_slots_into(out, |id, slot| f(id, AnySlot::Records(slot)))
            }
            ExecStates::Columns(s) => {
                s.par_map_slots_into(out, |id, slot| f(id, AnySlot::Columns(slot)))
            }
        }
    }
}
