//! Core error type.
//!
//! Sub-crates define their own error enums; `BtError` covers the few checks
//! made on the core types themselves.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BtError {
    #[error("configuration error: {0}")]
    Config(String),
}

pub type BtResult<T> = Result<T, BtError>;
