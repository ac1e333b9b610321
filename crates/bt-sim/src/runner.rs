//! The `Runner` struct: one topology, one provider, a population of
//! execution states.

use std::path::Path;

use bt_agent::{AgentError, ExecSnapshot, ExecStates, ExecStore};
use bt_behavior::ActionProvider;
use bt_core::{AgentId, Tick};
use bt_tree::Topology;
use tracing::{debug, info, warn};

use crate::interpreter::{self, TickOutcome, TickReport};
use crate::{InterpreterConfig, SimResult, TickObserver, TickStats};

/// Drives every agent's tree once per population tick.
///
/// The runner owns the topology, so it can only be swapped through
/// [`reload`](Self::reload), which needs `&mut self`: no agent can be
/// mid-tick while that happens, and every agent is reset afterwards.
///
/// `S` defaults to [`ExecStates`] (layout chosen at runtime).  Use a concrete
/// store such as [`RecordStore`](bt_agent::RecordStore) to fix the layout at
/// compile time.
///
/// Create via [`RunnerBuilder`](crate::RunnerBuilder).
pub struct Runner<P: ActionProvider, S: ExecStore + Send + 'static = ExecStates> {
    topology: Topology,
    states:   S,
    provider: P,
    config:   InterpreterConfig,
    tick:     Tick,
    /// Last population tick's reports, indexed by `AgentId`.  Reused.
    reports:  Vec<TickReport>,
    #[cfg(feature = "parallel")]
    pool:     Option<rayon::ThreadPool>,
}

impl<P: ActionProvider, S: ExecStore + Send + 'static> Runner<P, S> {
    pub(crate) fn from_parts(
        topology: Topology,
        states:   S,
        provider: P,
        config:   InterpreterConfig,
    ) -> Self {
        Self {
            topology,
            states,
            provider,
            config,
            tick: Tick::ZERO,
            reports: Vec::new(),
            #[cfg(feature = "parallel")]
            pool: None,
        }
    }

    #[cfg(feature = "parallel")]
    pub(crate) fn with_pool(mut self, pool: Option<rayon::ThreadPool>) -> Self {
        self.pool = pool;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    #[inline]
    pub fn states(&self) -> &S {
        &self.states
    }

    #[inline]
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Mutable provider access between ticks (e.g. to service a path queue).
    #[inline]
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    #[inline]
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Number of population ticks run so far.
    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Reports from the last [`tick_all`](Self::tick_all), indexed by agent.
    #[inline]
    pub fn last_reports(&self) -> &[TickReport] {
        &self.reports
    }

    pub fn snapshot(&self, agent: AgentId) -> Option<ExecSnapshot> {
        self.states.snapshot(agent)
    }

    // ── Single-agent operations ───────────────────────────────────────────

    /// Advance one agent by one tick.
    pub fn tick_agent(&mut self, agent: AgentId) -> SimResult<TickReport> {
        let mut slot = self.states.slot_mut(agent).ok_or(AgentError::NotFound(agent))?;
        Ok(interpreter::tick(&self.topology, &mut slot, agent, &self.provider, &self.config))
    }

    /// Put one agent back at the root with fresh state (e.g. after its goal
    /// changed externally).
    pub fn reset_agent(&mut self, agent: AgentId) -> SimResult<()> {
        self.states.reset(agent)?;
        Ok(())
    }

    /// `true` when the agent is parked on a leaf waiting for the world.
    ///
    /// The check reads only the cursor and status.  A fresh or reset agent
    /// sits at the root with status `Running`, so when the root itself is a
    /// leaf it reports `true` before its first tick.
    pub fn is_at_suspension(&self, agent: AgentId) -> SimResult<bool> {
        let (cursor, status) = self
            .states
            .cursor_status(agent)
            .ok_or(AgentError::NotFound(agent))?;
        Ok(interpreter::is_suspended_at_leaf(&self.topology, cursor, status))
    }

    /// Add an agent with fresh state.
    pub fn spawn_agent(&mut self) -> SimResult<AgentId> {
        Ok(self.states.spawn()?)
    }

    /// Remove an agent.  Returns the previous id of the agent that now
    /// occupies `agent`'s index, if any.
    pub fn remove_agent(&mut self, agent: AgentId) -> SimResult<Option<AgentId>> {
        Ok(self.states.remove(agent)?)
    }

    // ── Population ticks ──────────────────────────────────────────────────

    /// Tick every agent once.
    ///
    /// With the `parallel` feature the agents are ticked on Rayon's pool (or
    /// the runner's own pool when `num_threads` was set); observer hooks
    /// always run afterwards on the calling thread.
    pub fn tick_all<O: TickObserver>(&mut self, observer: &mut O) -> TickStats {
        let now = self.tick;
        observer.on_tick_start(now);

        self.tick_population();

        let mut stats = TickStats::default();
        for (i, report) in self.reports.iter().enumerate() {
            stats.record(report);
            let agent = AgentId(i as u32);
            match report.outcome {
                TickOutcome::Completed(status) => observer.on_pass_complete(now, agent, status),
                TickOutcome::StepLimit => observer.on_step_limit(now, agent),
                TickOutcome::Suspended => {}
            }
        }

        if stats.step_limited > 0 {
            warn!(
                tick      = %now,
                agents    = stats.step_limited,
                max_steps = self.config.max_steps_per_tick,
                "agents hit the per-tick step cap"
            );
        }
        debug!(tick = %now, %stats, "tick complete");

        observer.on_tick_end(now, &stats);
        self.tick = now + 1;
        stats
    }

    /// Run `n` population ticks, returning the merged statistics.
    pub fn run_ticks<O: TickObserver>(&mut self, n: u64, observer: &mut O) -> TickStats {
        let mut total = TickStats::default();
        for _ in 0..n {
            total.merge(&self.tick_all(observer));
        }
        total
    }

    // ── Reload ────────────────────────────────────────────────────────────

    /// Swap in a new topology and reset every agent onto it.
    pub fn reload(&mut self, topology: Topology) {
        self.states.rebind(topology.root(), topology.repeater_count());
        info!(
            nodes  = topology.len(),
            agents = self.states.len(),
            "topology reloaded; all agents reset"
        );
        self.topology = topology;
    }

    /// [`reload`](Self::reload) from a JSON tree file.  On error the current
    /// topology and every agent's state are left untouched.
    pub fn reload_json(&mut self, path: &Path) -> SimResult<()> {
        let topology = bt_tree::load_tree_json(path)?;
        self.reload(topology);
        Ok(())
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn tick_population(&mut self) {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let topology = &self.topology;
        let provider = &self.provider;
        let config   = &self.config;
        let states   = &mut self.states;
        let reports  = &mut self.reports;

        #[cfg(not(feature = "parallel"))]
        {
            states.map_slots_into(reports, |agent, mut slot| {
                interpreter::tick(topology, &mut slot, agent, provider, config)
            });
        }

        #[cfg(feature = "parallel")]
        {
            let mut run = move || {
                states.par_map_slots_into(reports, |agent, mut slot| {
                    interpreter::tick(topology, &mut slot, agent, provider, config)
                })
            };
            match &self.pool {
                Some(pool) => pool.install(run),
                None => run(),
            }
        }
    }
}
