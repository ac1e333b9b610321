use thiserror::Error;

use bt_core::AgentId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("agent {0} not found")]
    NotFound(AgentId),

    #[error("agent capacity exhausted ({0} agents)")]
    CapacityExhausted(usize),

    #[error("unknown storage layout {0:?}: expected \"records\" or \"columns\"")]
    UnknownLayout(String),
}

pub type AgentResult<T> = Result<T, AgentError>;
