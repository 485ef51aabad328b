use thiserror::Error;

use crate::domain::{error::DomainError, task::TaskId};

/// Failures surfaced by the use cases. Validation and not-found errors
/// propagate to the transport boundary untouched; repository failures are
/// unrecoverable for the single request only.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("task with id {0} not found")]
    NotFound(TaskId),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}
