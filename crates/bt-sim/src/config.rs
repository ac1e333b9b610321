//! Interpreter and runner configuration.

use bt_agent::StorageLayout;
use bt_behavior::StaticJobQuery;

use crate::{SimError, SimResult};

/// Per-tick interpreter limits and leaf options.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InterpreterConfig {
    /// Node evaluations allowed for one agent in one tick.  A tree that
    /// loops without ever suspending (e.g. an unbounded repeater around
    /// leaves that settle immediately) is cut off here and resumes from the
    /// same node on the next tick.
    pub max_steps_per_tick: u32,

    /// Provider query behind `HasStaticJobLeaf`.
    pub static_job_query: StaticJobQuery,
}

impl InterpreterConfig {
    pub const DEFAULT_MAX_STEPS: u32 = 1024;

    pub fn validate(&self) -> SimResult<()> {
        if self.max_steps_per_tick == 0 {
            return Err(SimError::Config("max_steps_per_tick must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            max_steps_per_tick: Self::DEFAULT_MAX_STEPS,
            static_job_query:   StaticJobQuery::default(),
        }
    }
}

/// Everything [`RunnerBuilder`](crate::RunnerBuilder) needs besides the
/// topology and the provider.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunnerConfig {
    /// Execution-state layout for the population.
    pub layout: StorageLayout,

    pub interpreter: InterpreterConfig,

    /// Size of the runner's own Rayon pool.  0 uses Rayon's global pool.
    /// Ignored without the `parallel` feature.
    pub num_threads: usize,
}
