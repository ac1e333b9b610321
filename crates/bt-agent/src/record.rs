//! Record layout: one self-contained struct per agent.
//!
//! Everything an agent's tick touches sits in one record, which keeps a
//! single agent's tick on as few cache lines as possible.  Prefer
//! [`ColumnStore`](crate::ColumnStore) when whole-population scans of one
//! field (e.g. "how many agents are suspended") dominate.

use bt_core::{AgentId, Flow, NodeId, Status};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::store::next_id;
use crate::{AgentError, AgentResult, ExecSnapshot, ExecState, ExecStore, StorageLayout};

// ── ExecRecord ────────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecRecord {
    pub cursor:       NodeId,
    pub status:       Status,
    pub flow:         Flow,
    pub active_child: u32,
    pub repeat:       Box<[u32]>,
}

impl ExecRecord {
    /// Fresh state positioned at `root`.
    pub fn new(root: NodeId, repeaters: usize) -> Self {
        Self {
            cursor:       root,
            status:       Status::Running,
            flow:         Flow::Down,
            active_child: 0,
            repeat:       vec![0; repeaters].into_boxed_slice(),
        }
    }
}

impl ExecState for ExecRecord {
    #[inline]
    fn cursor(&self) -> NodeId {
        self.cursor
    }
    #[inline]
    fn status(&self) -> Status {
        self.status
    }
    #[inline]
    fn flow(&self) -> Flow {
        self.flow
    }
    #[inline]
    fn active_child(&self) -> u32 {
        self.active_child
    }
    #[inline]
    fn repeat_counts(&self) -> &[u32] {
        &self.repeat
    }
    #[inline]
    fn set_cursor(&mut self, node: NodeId) {
        self.cursor = node;
    }
    #[inline]
    fn set_status(&mut self, status: Status) {
        self.status = status;
    }
    #[inline]
    fn set_flow(&mut self, flow: Flow) {
        self.flow = flow;
    }
    #[inline]
    fn set_active_child(&mut self, index: u32) {
        self.active_child = index;
    }
    #[inline]
    fn repeat_counts_mut(&mut self) -> &mut [u32] {
        &mut self.repeat
    }
}

// ── RecordStore ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct RecordStore {
    records:   Vec<ExecRecord>,
    root:      NodeId,
    repeaters: usize,
}

impl RecordStore {
    /// `count` fresh records bound to a topology with the given root and
    /// repeater count.
    pub fn new(root: NodeId, repeaters: usize, count: usize) -> Self {
        Self {
            records: vec![ExecRecord::new(root, repeaters); count],
            root,
            repeaters,
        }
    }

    /// All records in id order.
    #[inline]
    pub fn records(&self) -> &[ExecRecord] {
        &self.records
    }

    #[inline]
    pub fn get(&self, agent: AgentId) -> Option<&ExecRecord> {
        self.records.get(agent.index())
    }
}

impl ExecStore for RecordStore {
    type Slot<'a> = &'a mut ExecRecord where Self: 'a;

    fn layout(&self) -> StorageLayout {
        StorageLayout::Records
    }

    #[inline]
    fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    fn root(&self) -> NodeId {
        self.root
    }

    #[inline]
    fn repeaters(&self) -> usize {
        self.repeaters
    }

    #[inline]
    fn slot_mut(&mut self, agent: AgentId) -> Option<&mut ExecRecord> {
        self.records.get_mut(agent.index())
    }

    #[inline]
    fn cursor_status(&self, agent: AgentId) -> Option<(NodeId, Status)> {
        self.get(agent).map(|r| (r.cursor, r.status))
    }

    fn snapshot(&self, agent: AgentId) -> Option<ExecSnapshot> {
        self.get(agent).map(|r| r.snapshot())
    }

    fn spawn(&mut self) -> AgentResult<AgentId> {
        let id = next_id(self.records.len())?;
        self.records.push(ExecRecord::new(self.root, self.repeaters));
        Ok(id)
    }

    fn remove(&mut self, agent: AgentId) -> AgentResult<Option<AgentId>> {
        if agent.index() >= self.records.len() {
            return Err(AgentError::NotFound(agent));
        }
        let last = self.records.len() - 1;
        self.records.swap_remove(agent.index());
        Ok((agent.index() != last).then_some(AgentId(last as u32)))
    }

    fn reset_all(&mut self) {
        let root = self.root;
        for record in &mut self.records {
            record.reset(root);
        }
    }

    fn rebind(&mut self, root: NodeId, repeaters: usize) {
        self.root = root;
        self.repeaters = repeaters;
        let fresh = ExecRecord::new(root, repeaters);
        self.records.fill(fresh);
    }

    fn map_slots_into<T, F>(&mut self, out: &mut Vec<T>, mut f: F)
    where
        F: FnMut(AgentId, Self::Slot<'_>) -> T,
    {
        out.clear();
        out.extend(
            self.records
                .iter_mut()
                .enumerate()
                .map(|(i, record)| f(AgentId(i as u32), record)),
        );
    }

    #[cfg(feature = "parallel")]
    fn par_map_slots_into<T, F>(&mut self, out: &mut Vec<T>, f: F)
    where
        T: Send,
        F: Fn(AgentId, Self::Slot<'_>) -> T + Sync + Send,
    {
        self.records
            .par_iter_mut()
            .enumerate()
            .map(|(i, record)| f(AgentId(i as u32), record))
            .collect_into_vec(out);
    }
}
