//! The per-agent accessor contract the interpreter is written against.

use bt_core::{Flow, NodeId, Status};

/// Mutable view of one agent's execution state.
///
/// Implemented by a whole record ([`ExecRecord`](crate::ExecRecord)), by a
/// bundle of column references ([`ColumnSlot`](crate::ColumnSlot)) and by the
/// runtime-dispatching [`AnySlot`](crate::AnySlot).  The interpreter only
/// ever sees this trait, so the layouts cannot diverge in behavior.
pub trait ExecState {
    fn cursor(&self) -> NodeId;
    fn status(&self) -> Status;
    fn flow(&self) -> Flow;
    /// Index, in the cursor node's child list, of the child that last
    /// returned control to it.
    fn active_child(&self) -> u32;
    /// One counter per `Repeater` in the topology, indexed by the repeater's
    /// counter slot.
    fn repeat_counts(&self) -> &[u32];

    fn set_cursor(&mut self, node: NodeId);
    fn set_status(&mut self, status: Status);
    fn set_flow(&mut self, flow: Flow);
    fn set_active_child(&mut self, index: u32);
    fn repeat_counts_mut(&mut self) -> &mut [u32];

    #[inline]
    fn repeat_count(&self, counter: usize) -> u32 {
        debug_assert!(counter < self.repeat_counts().len(), "repeat counter {counter} out of range");
        self.repeat_counts().get(counter).copied().unwrap_or(0)
    }

    #[inline]
    fn set_repeat_count(&mut self, counter: usize, value: u32) {
        debug_assert!(counter < self.repeat_counts().len(), "repeat counter {counter} out of range");
        if let Some(c) = self.repeat_counts_mut().get_mut(counter) {
            *c = value;
        }
    }

    /// Back to the fresh state: cursor at `root`, flow `Down`, status
    /// `Running`, every counter cleared.
    fn reset(&mut self, root: NodeId) {
        self.set_cursor(root);
        self.set_flow(Flow::Down);
        self.set_status(Status::Running);
        self.set_active_child(0);
        self.repeat_counts_mut().fill(0);
    }

    /// Owned copy of every field.
    fn snapshot(&self) -> ExecSnapshot {
        ExecSnapshot {
            cursor:        self.cursor(),
            status:        self.status(),
            flow:          self.flow(),
            active_child:  self.active_child(),
            repeat_counts: self.repeat_counts().to_vec(),
        }
    }
}

impl<T: ExecState + ?Sized> ExecState for &mut T {
    #[inline]
    fn cursor(&self) -> NodeId {
        (**self).cursor()
    }
    #[inline]
    fn status(&self) -> Status {
        (**self).status()
    }
    #[inline]
    fn flow(&self) -> Flow {
        (**self).flow()
    }
    #[inline]
    fn active_child(&self) -> u32 {
        (**self).active_child()
    }
    #[inline]
    fn repeat_counts(&self) -> &[u32] {
        (**self).repeat_counts()
    }
    #[inline]
    fn set_cursor(&mut self, node: NodeId) {
        (**self).set_cursor(node)
    }
    #[inline]
    fn set_status(&mut self, status: Status) {
        (**self).set_status(status)
    }
    #[inline]
    fn set_flow(&mut self, flow: Flow) {
        (**self).set_flow(flow)
    }
    #[inline]
    fn set_active_child(&mut self, index: u32) {
        (**self).set_active_child(index)
    }
    #[inline]
    fn repeat_counts_mut(&mut self) -> &mut [u32] {
        (**self).repeat_counts_mut()
    }
}

/// Layout-independent copy of one agent's execution state.
///
/// Two stores hold the same observable state exactly when their snapshots
/// compare equal.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecSnapshot {
    pub cursor:        NodeId,
    pub status:        Status,
    pub flow:          Flow,
    pub active_child:  u32,
    pub repeat_counts: Vec<u32>,
}
