//! The per-agent tick: an explicit trampoline over the topology arena.
//!
//! Each iteration of the loop evaluates the node under the cursor exactly
//! once.  Evaluating a node either moves the cursor (down into a child, or up
//! into the parent carrying a result) or, for a leaf reporting `Running`,
//! leaves it where it is and ends the tick.  Nothing recurses, so the native
//! stack stays flat however deep the tree is.
//!
//! ```text
//!           ┌──────────── Down ────────────┐
//!   parent ─┤                              ├─► child
//!           └◄─── Up (status, slot) ───────┘
//! ```
//!
//! When the root itself hands a result up, the cursor becomes
//! `NodeId::INVALID` ("parent of root") and the pass is complete.  The next
//! tick starts a fresh pass from the root.

use std::fmt;

use bt_agent::ExecState;
use bt_behavior::{ActionProvider, evaluate_leaf};
use bt_core::{AgentId, Flow, NodeId, Status};
use bt_tree::{Node, NodeKind, Topology};
use tracing::{trace, warn};

use crate::InterpreterConfig;

// ── Outcome ───────────────────────────────────────────────────────────────────

/// How a tick ended.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum TickOutcome {
    /// A leaf is waiting on the world; the cursor stays on it.
    Suspended,
    /// The root reported a result; the cursor is `NodeId::INVALID`.
    Completed(Status),
    /// `max_steps_per_tick` evaluations ran without suspending or completing.
    StepLimit,
}

impl fmt::Display for TickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickOutcome::Suspended     => f.write_str("suspended"),
            TickOutcome::Completed(s)  => write!(f, "completed ({s})"),
            TickOutcome::StepLimit     => f.write_str("step limit"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TickReport {
    pub outcome: TickOutcome,
    /// Node evaluations performed this tick.
    pub steps:   u32,
}

// ── Tick ──────────────────────────────────────────────────────────────────────

/// Advance one agent's state until it suspends, completes a pass, or hits the
/// step cap.
pub fn tick<S, P>(
    topology: &Topology,
    state:    &mut S,
    agent:    AgentId,
    provider: &P,
    config:   &InterpreterConfig,
) -> TickReport
where
    S: ExecState + ?Sized,
    P: ActionProvider + ?Sized,
{
    let root = topology.root();

    if !state.cursor().is_valid() {
        // Previous pass finished: restart from the root.
        enter(state, root);
    } else if !topology.contains(state.cursor()) {
        debug_assert!(false, "{agent}: cursor {} outside topology", state.cursor());
        warn!(%agent, cursor = %state.cursor(), "cursor outside topology; resetting to root");
        state.reset(root);
    }

    let mut steps = 0;
    while steps < config.max_steps_per_tick {
        steps += 1;

        let id = state.cursor();
        let Some(node) = topology.get(id) else {
            // Only reachable through a corrupted parent link.
            debug_assert!(false, "{agent}: cursor {id} outside topology");
            state.reset(root);
            continue;
        };

        if step(node, state, agent, provider, config) == Step::Suspend {
            return TickReport { outcome: TickOutcome::Suspended, steps };
        }

        if !state.cursor().is_valid() {
            let status = state.status();
            trace!(%agent, %status, steps, "pass complete");
            return TickReport { outcome: TickOutcome::Completed(status), steps };
        }
    }

    TickReport { outcome: TickOutcome::StepLimit, steps }
}

/// `true` when `cursor` is a leaf and `status` is `Running`: the agent's last
/// tick ended on a pending leaf, or it is fresh and the root is a leaf.
pub fn is_suspended_at_leaf(topology: &Topology, cursor: NodeId, status: Status) -> bool {
    status == Status::Running
        && topology
            .get(cursor)
            .is_some_and(|node| matches!(node.kind, NodeKind::Leaf(_)))
}

// ── Node evaluation ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum Step {
    Continue,
    Suspend,
}

fn step<S, P>(
    node:     &Node,
    state:    &mut S,
    agent:    AgentId,
    provider: &P,
    config:   &InterpreterConfig,
) -> Step
where
    S: ExecState + ?Sized,
    P: ActionProvider + ?Sized,
{
    let going_down = state.flow() == Flow::Down;

    match &node.kind {
        NodeKind::Sequence(children) => {
            if going_down {
                enter(state, children[0]);
            } else {
                let i = state.active_child() as usize;
                match child_result(state, agent) {
                    Status::Success => match children.get(i + 1) {
                        Some(&next) => enter(state, next),
                        None => leave(state, node, Status::Success),
                    },
                    _ => leave(state, node, Status::Fail),
                }
            }
        }

        NodeKind::Selector(children) => {
            if going_down {
                enter(state, children[0]);
            } else {
                let i = state.active_child() as usize;
                match child_result(state, agent) {
                    Status::Success => leave(state, node, Status::Success),
                    _ => match children.get(i + 1) {
                        Some(&next) => enter(state, next),
                        None => leave(state, node, Status::Fail),
                    },
                }
            }
        }

        NodeKind::Repeater { child, limit, counter } => {
            let counter = *counter as usize;
            if going_down {
                state.set_repeat_count(counter, 0);
                enter(state, *child);
            } else {
                // The child's own result is irrelevant; only the count is.
                let _ = child_result(state, agent);
                if *limit == 0 {
                    enter(state, *child);
                } else {
                    let done = state.repeat_count(counter) + 1;
                    if done >= *limit {
                        state.set_repeat_count(counter, 0);
                        leave(state, node, Status::Success);
                    } else {
                        state.set_repeat_count(counter, done);
                        enter(state, *child);
                    }
                }
            }
        }

        NodeKind::RepeatUntilFail(child) => {
            if going_down {
                enter(state, *child);
            } else if child_result(state, agent) == Status::Fail {
                leave(state, node, Status::Success);
            } else {
                enter(state, *child);
            }
        }

        NodeKind::Succeeder(child) => {
            if going_down {
                enter(state, *child);
            } else {
                let _ = child_result(state, agent);
                leave(state, node, Status::Success);
            }
        }

        NodeKind::Inverter(child) => {
            if going_down {
                enter(state, *child);
            } else {
                let inverted = match child_result(state, agent) {
                    Status::Success => Status::Fail,
                    _ => Status::Success,
                };
                leave(state, node, inverted);
            }
        }

        NodeKind::Leaf(leaf) => {
            match evaluate_leaf(*leaf, agent, provider, config.static_job_query) {
                Status::Running => {
                    state.set_status(Status::Running);
                    return Step::Suspend;
                }
                settled => leave(state, node, settled),
            }
        }
    }

    Step::Continue
}

// ── Transitions ───────────────────────────────────────────────────────────────

/// Move the cursor down into `child` (or restart at the root).
#[inline]
fn enter<S: ExecState + ?Sized>(state: &mut S, child: NodeId) {
    state.set_cursor(child);
    state.set_flow(Flow::Down);
    state.set_status(Status::Running);
}

/// Hand `status` up to `node`'s parent, recording which child is returning.
#[inline]
fn leave<S: ExecState + ?Sized>(state: &mut S, node: &Node, status: Status) {
    state.set_cursor(node.parent);
    state.set_flow(Flow::Up);
    state.set_status(status);
    state.set_active_child(node.slot);
}

/// The settled result a child handed up.  `Running` can never travel upward;
/// if it does, it is treated as `Fail`.
#[inline]
fn child_result<S: ExecState + ?Sized>(state: &S, agent: AgentId) -> Status {
    match state.status() {
        Status::Running => {
            debug_assert!(false, "{agent}: Running reported upward");
            warn!(%agent, cursor = %state.cursor(), "running status reported upward; treating as fail");
            Status::Fail
        }
        settled => settled,
    }
}
