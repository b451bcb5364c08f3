use std::fmt;

use thiserror::Error;

/// Which DDL step of an aggregate rebuild failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshStep {
    Drop,
    Create,
    Index,
}

impl fmt::Display for RefreshStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            RefreshStep::Drop => "drop",
            RefreshStep::Create => "create",
            RefreshStep::Index => "index",
        };
        write!(f, "{step}")
    }
}

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("rebuild of {aggregate} failed at {step} step: {source}")]
    Step {
        aggregate: &'static str,
        step: RefreshStep,
        #[source]
        source: sqlx::Error,
    },
}

pub type Result<T> = std::result::Result<T, RefreshError>;
