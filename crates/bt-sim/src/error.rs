use bt_agent::AgentError;
use bt_tree::TreeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("runner configuration error: {0}")]
    Config(String),

    #[error("execution store {what} is {got}, topology needs {expected}")]
    TopologyMismatch {
        what:     &'static str,
        expected: usize,
        got:      usize,
    },

    #[error("failed to build thread pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

pub type SimResult<T> = Result<T, SimError>;
