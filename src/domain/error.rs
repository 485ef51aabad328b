use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while constructing domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// The status string is not one of the recognized values.
    #[error("invalid status '{0}', must be one of: pending, completed")]
    InvalidStatus(String),

    /// The raw value is not a well-formed RFC 3339 instant.
    #[error("invalid date '{0}'")]
    InvalidDate(String),

    /// A newly supplied due date lies in the past.
    #[error("due date {0} cannot be in the past")]
    PastDueDate(DateTime<Utc>),
}
