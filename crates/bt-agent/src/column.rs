//! Columnar layout: one `Vec` per field, indexed by `AgentId`.
//!
//! ```ignore
//! let suspended = store.status.iter().filter(|s| **s == Status::Running).count();
//! ```
//!
//! Repeat counters live in one flat `Vec<u32>` with a fixed stride per agent
//! (`max(repeaters, 1)`, so the chunked iterators never see a zero-sized
//! chunk even for a topology without repeaters).

use bt_core::{AgentId, Flow, NodeId, Status};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::store::next_id;
use crate::{AgentError, AgentResult, ExecSnapshot, ExecState, ExecStore, StorageLayout};

// ── ColumnSlot ────────────────────────────────────────────────────────────────

/// One agent's row across all columns.
#[derive(Debug)]
pub struct ColumnSlot<'a> {
    cursor:       &'a mut NodeId,
    status:       &'a mut Status,
    flow:         &'a mut Flow,
    active_child: &'a mut u32,
    repeat:       &'a mut [u32],
}

impl ExecState for ColumnSlot<'_> {
    #[inline]
    fn cursor(&self) -> NodeId {
        *self.cursor
    }
    #[inline]
    fn status(&self) -> Status {
        *self.status
    }
    #[inline]
    fn flow(&self) -> Flow {
        *self.flow
    }
    #[inline]
    fn active_child(&self) -> u32 {
        *self.active_child
    }
    #[inline]
    fn repeat_counts(&self) -> &[u32] {
        self.repeat
    }
    #[inline]
    fn set_cursor(&mut self, node: NodeId) {
        *self.cursor = node;
    }
    #[inline]
    fn set_status(&mut self, status: Status) {
        *self.status = status;
    }
    #[inline]
    fn set_flow(&mut self, flow: Flow) {
        *self.flow = flow;
    }
    #[inline]
    fn set_active_child(&mut self, index: u32) {
        *self.active_child = index;
    }
    #[inline]
    fn repeat_counts_mut(&mut self) -> &mut [u32] {
        self.repeat
    }
}

// ── ColumnStore ───────────────────────────────────────────────────────────────

/// Structure-of-Arrays execution state.
///
/// Every column has exactly `len()` elements (`repeat` has
/// `len() * stride`).  The columns are `pub` for read-only scans; writes
/// should go through [`ExecStore`] so the columns stay the same length.
#[derive(Clone, Debug)]
pub struct ColumnStore {
    pub cursor:       Vec<NodeId>,
    pub status:       Vec<Status>,
    pub flow:         Vec<Flow>,
    pub active_child: Vec<u32>,
    pub repeat:       Vec<u32>,
    root:             NodeId,
    repeaters:        usize,
}

impl ColumnStore {
    pub fn new(root: NodeId, repeaters: usize, count: usize) -> Self {
        Self {
            cursor:       vec![root; count],
            status:       vec![Status::Running; count],
            flow:         vec![Flow::Down; count],
            active_child: vec![0; count],
            repeat:       vec![0; count * repeaters.max(1)],
            root,
            repeaters,
        }
    }

    /// Distance between two agents' counter runs in `repeat`.
    #[inline]
    pub fn stride(&self) -> usize {
        self.repeaters.max(1)
    }

    /// `agent`'s repeat counters.
    #[inline]
    pub fn repeat_counts(&self, agent: AgentId) -> Option<&[u32]> {
        let start = agent.index().checked_mul(self.stride())?;
        self.repeat.get(start..start + self.repeaters)
    }
}

impl ExecStore for ColumnStore {
    type Slot<'a> = ColumnSlot<'a> where Self: 'a;

    fn layout(&self) -> StorageLayout {
        StorageLayout::Columns
    }

    #[inline]
    fn len(&self) -> usize {
        self.cursor.len()
    }

    #[inline]
    fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    fn repeaters(&self) -> usize {
        self.repeaters
    }

    fn slot_mut(&mut self, agent: AgentId) -> Option<ColumnSlot<'_>> {
        let i = agent.index();
        if i >= self.cursor.len() {
            return None;
        }
        let start = i * self.stride();
        Some(ColumnSlot {
            cursor:       &mut self.cursor[i],
            status:       &mut self.status[i],
            flow:         &mut self.flow[i],
            active_child: &mut self.active_child[i],
            repeat:       &mut self.repeat[start..start + self.repeaters],
        })
    }

    #[inline]
    fn cursor_status(&self, agent: AgentId) -> Option<(NodeId, Status)> {
        let i = agent.index();
        Some((*self.cursor.get(i)?, *self.status.get(i)?))
    }

    fn snapshot(&self, agent: AgentId) -> Option<ExecSnapshot> {
        let i = agent.index();
        Some(ExecSnapshot {
            cursor:        *self.cursor.get(i)?,
            status:        *self.status.get(i)?,
            flow:          *self.flow.get(i)?,
            active_child:  *self.active_child.get(i)?,
            repeat_counts: self.repeat_counts(agent)?.to_vec(),
        })
    }

    fn spawn(&mut self) -> AgentResult<AgentId> {
        let id = next_id(self.len())?;
        self.cursor.push(self.root);
        self.status.push(Status::Running);
        self.flow.push(Flow::Down);
        self.active_child.push(0);
        let stride = self.stride();
        self.repeat.resize(self.repeat.len() + stride, 0);
        Ok(id)
    }

    fn remove(&mut self, agent: AgentId) -> AgentResult<Option<AgentId>> {
        let i = agent.index();
        if i >= self.len() {
            return Err(AgentError::NotFound(agent));
        }
        let last = self.len() - 1;
        self.cursor.swap_remove(i);
        self.status.swap_remove(i);
        self.flow.swap_remove(i);
        self.active_child.swap_remove(i);

        let stride = self.stride();
        if i != last {
            self.repeat.copy_within(last * stride..(last + 1) * stride, i * stride);
        }
        self.repeat.truncate(last * stride);

        Ok((i != last).then_some(AgentId(last as u32)))
    }

    fn reset_all(&mut self) {
        self.cursor.fill(self.root);
        self.status.fill(Status::Running);
        self.flow.fill(Flow::Down);
        self.active_child.fill(0);
        self.repeat.fill(0);
    }

    fn rebind(&mut self, root: NodeId, repeaters: usize) {
        let count = self.len();
        *self = ColumnStore::new(root, repeaters, count);
    }

    fn map_slots_into<T, F>(&mut self, out: &mut Vec<T>, mut f: F)
    where
        F: FnMut(AgentId, Self::Slot<'_>) -> T,
    {
        let repeaters = self.repeaters;
        let stride = self.stride();
        out.clear();
        out.extend(
            self.cursor
                .iter_mut()
                .zip(self.status.iter_mut())
                .zip(self.flow.iter_mut())
                .zip(self.active_child.iter_mut())
                .zip(self.repeat.chunks_mut(stride))
                .enumerate()
                .map(|(i, ((((cursor, status), flow), active_child), repeat))| {
                    let slot = ColumnSlot {
                        cursor,
                        status,
                        flow,
                        active_child,
                        repeat: &mut repeat[..repeaters],
                    };
                    f(AgentId(i as u32), slot)
                }),
        );
    }

    #[cfg(feature = "parallel")]
    fn par_map_slots_into<T, F>(&mut self, out: &mut Vec<T>, f: F)
    where
        T: Send,
        F: Fn(AgentId, Self::Slot<'_>) -> T + Sync + Send,
    {
        let repeaters = self.repeaters;
        let stride = self.stride();
        self.cursor
            .par_iter_mut()
            .zip(self.status.par_iter_mut())
            .zip(self.flow.par_iter_mut())
            .zip(self.active_child.par_iter_mut())
            .zip(self.repeat.par_chunks_mut(stride))
            .enumerate()
            .map(|(i, ((((cursor, status), flow), active_child), repeat))| {
                let slot = ColumnSlot {
                    cursor,
                    status,
                    flow,
                    active_child,
                    repeat: &mut repeat[..repeaters],
                };
                f(AgentId(i as u32), slot)
            })
            .collect_into_vec(out);
    }
}
