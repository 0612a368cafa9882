//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed coordinate text
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}
