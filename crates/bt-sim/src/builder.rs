//! Fluent builder for constructing a [`Runner`].

use bt_agent::{ExecStates, ExecStore, StorageLayout};
use bt_behavior::ActionProvider;
use bt_tree::Topology;
use tracing::debug;
#[cfg(not(feature = "parallel"))]
use tracing::warn;

use crate::{InterpreterConfig, Runner, RunnerConfig, SimError, SimResult};

/// Fluent builder for [`Runner<P, S>`].
///
/// # Required inputs
///
/// - [`Topology`]: from [`bt_tree::load_tree_json`] or a
///   [`TopologyBuilder`](bt_tree::TopologyBuilder)
/// - `P: ActionProvider`: the world the leaves query
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default                          |
/// |------------------------|----------------------------------|
/// | `.agents(n)`           | 0 (spawn later)                  |
/// | `.config(c)`           | `RunnerConfig::default()`        |
/// | `.layout(l)`           | `StorageLayout::Records`         |
/// | `.interpreter(c)`      | 1024 steps, `StaticJob` query    |
/// | `.num_threads(n)`      | 0 (Rayon's global pool)          |
///
/// # Example
///
/// ```rust,ignore
/// let topology = bt_tree::load_tree_json(Path::new("trees/colony.json"))?;
/// let mut runner = RunnerBuilder::new(topology, provider)
///     .agents(10_000)
///     .layout(StorageLayout::Columns)
///     .build()?;
/// runner.tick_all(&mut NoopObserver);
/// ```
pub struct RunnerBuilder<P: ActionProvider> {
    topology: Topology,
    provider: P,
    config:   RunnerConfig,
    agents:   usize,
}

impl<P: ActionProvider> RunnerBuilder<P> {
    pub fn new(topology: Topology, provider: P) -> Self {
        Self {
            topology,
            provider,
            config: RunnerConfig::default(),
            agents: 0,
        }
    }

    /// Number of agents to create up front.  Ignored by
    /// [`build_with_store`](Self::build_with_store).
    pub fn agents(mut self, count: usize) -> Self {
        self.agents = count;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: RunnerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn layout(mut self, layout: StorageLayout) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn interpreter(mut self, interpreter: InterpreterConfig) -> Self {
        self.config.interpreter = interpreter;
        self
    }

    pub fn num_threads(mut self, n: usize) -> Self {
        self.config.num_threads = n;
        self
    }

    /// Validate the configuration and return a runner whose state layout is
    /// chosen by `config.layout`.
    pub fn build(self) -> SimResult<Runner<P, ExecStates>> {
        let states = ExecStates::new(
            self.config.layout,
            self.topology.root(),
            self.topology.repeater_count(),
            self.agents,
        );
        self.build_with_store(states)
    }

    /// Like [`build`](Self::build), but with a caller-supplied store.
    ///
    /// The store must already be bound to this topology (same root and
    /// repeater count).  `config.layout` and `.agents(n)` are not used.
    pub fn build_with_store<S: ExecStore + Send + 'static>(self, states: S) -> SimResult<Runner<P, S>> {
        self.config.interpreter.validate()?;

        // ── Validate the store against the topology ───────────────────────
        if states.root() != self.topology.root() {
            return Err(SimError::TopologyMismatch {
                what:     "root",
                expected: self.topology.root().index(),
                got:      states.root().index(),
            });
        }
        if states.repeaters() != self.topology.repeater_count() {
            return Err(SimError::TopologyMismatch {
                what:     "repeater count",
                expected: self.topology.repeater_count(),
                got:      states.repeaters(),
            });
        }

        // ── Thread pool ───────────────────────────────────────────────────
        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            0 => None,
            n => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| SimError::ThreadPool(e.to_string()))?,
            ),
        };
        #[cfg(not(feature = "parallel"))]
        {
            if self.config.num_threads > 1 {
                warn!(
                    num_threads = self.config.num_threads,
                    "built without the `parallel` feature; agents tick on the calling thread"
                );
            }
        }

        debug!(
            layout = %states.layout(),
            agents = states.len(),
            nodes  = self.topology.len(),
            "runner built"
        );

        let runner = Runner::from_parts(self.topology, states, self.provider, self.config.interpreter);
        #[cfg(feature = "parallel")]
        let runner = runner.with_pool(pool);
        Ok(runner)
    }
}
