//! # DomainError
//!
//! Centralized error handling for the Rostra ecosystem.
//! Maps business-rule violations to actionable error types; every
//! violation is detected before any mutation is attempted.

use thiserror::Error;

/// The primary error type for all rostra-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or missing input (e.g., argument too short, banned word)
    #[error("validation error: {0}")]
    Validation(String),

    /// No identity supplied by the auth collaborator
    #[error("authentication required")]
    Unauthenticated,

    /// Wrong actor (e.g., non-author editing, voting on someone's behalf)
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Referenced entity absent (e.g., Debate, Argument)
    #[error("{entity} not found with ID {id}")]
    NotFound { entity: &'static str, id: String },

    /// Uniqueness violated (duplicate vote, duplicate side-join)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Write attempted against a debate past its end time
    #[error("debate has expired")]
    DebateExpired,

    /// Edit/delete attempted more than five minutes after posting
    #[error("edit window expired")]
    EditWindowExpired,

    /// Underlying store failure, surfaced unclassified after rollback
    #[error("storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// A specialized Result type for Rostra logic.
pub type Result<T> = std::result::Result<T, DomainError>;
