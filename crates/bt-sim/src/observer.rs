//! Runner observer trait and per-tick statistics.

use std::fmt;

use bt_core::{AgentId, Status, Tick};

use crate::{TickOutcome, TickReport};

// ── TickStats ─────────────────────────────────────────────────────────────────

/// Aggregate of every agent's [`TickReport`] for one population tick (or,
/// after [`merge`](Self::merge), for several).
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct TickStats {
    pub agents:       usize,
    pub succeeded:    usize,
    pub failed:       usize,
    pub suspended:    usize,
    pub step_limited: usize,
    /// Total node evaluations.
    pub steps:        u64,
}

impl TickStats {
    pub fn record(&mut self, report: &TickReport) {
        self.agents += 1;
        self.steps += u64::from(report.steps);
        match report.outcome {
            TickOutcome::Completed(Status::Success) => self.succeeded += 1,
            TickOutcome::Completed(_)               => self.failed += 1,
            TickOutcome::Suspended                  => self.suspended += 1,
            TickOutcome::StepLimit                  => self.step_limited += 1,
        }
    }

    /// Passes completed, either way.
    #[inline]
    pub fn completed(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn merge(&mut self, other: &TickStats) {
        self.agents       += other.agents;
        self.succeeded    += other.succeeded;
        self.failed       += other.failed;
        self.suspended    += other.suspended;
        self.step_limited += other.step_limited;
        self.steps        += other.steps;
    }
}

impl fmt::Display for TickStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} agents: {} succeeded, {} failed, {} suspended, {} step-limited ({} steps)",
            self.agents, self.succeeded, self.failed, self.suspended, self.step_limited, self.steps,
        )
    }
}

// ── TickObserver ──────────────────────────────────────────────────────────────

/// Callbacks invoked by [`Runner::tick_all`](crate::Runner::tick_all).
///
/// All methods have default no-op implementations.  Per-agent hooks are
/// called after every agent has been ticked, in ascending `AgentId` order,
/// so they see the same sequence with or without the `parallel` feature.
///
/// # Example: pass counter
///
/// ```rust,ignore
/// struct Passes(usize);
///
/// impl TickObserver for Passes {
///     fn on_pass_complete(&mut self, _tick: Tick, _agent: AgentId, _status: Status) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait TickObserver {
    /// Before any agent is ticked.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// An agent's tree reported a result at its root this tick.
    fn on_pass_complete(&mut self, _tick: Tick, _agent: AgentId, _status: Status) {}

    /// An agent ran out of steps this tick.
    fn on_step_limit(&mut self, _tick: Tick, _agent: AgentId) {}

    /// After every agent has been ticked.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &TickStats) {}
}

/// A [`TickObserver`] that does nothing.
pub struct NoopObserver;

impl TickObserver for NoopObserver {}
