//! Claims domain errors

use thiserror::Error;

/// Errors raised while interpreting caller-supplied claim criteria
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("Unknown claim status: {0}")]
    UnknownStatus(String),

    #[error("Unknown claim field: {0}")]
    UnknownField(String),

    #[error("Unparseable date bound: {0}")]
    InvalidDate(String),
}
