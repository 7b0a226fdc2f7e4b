//! Error types for todo operations.

use thiserror::Error;

/// Result type alias for todo operations.
pub type Result<T> = std::result::Result<T, TodoError>;

/// Failure modes of the todo lifecycle.
///
/// The variants are disjoint: a caller can always tell a rejected input from a
/// missing record from an infrastructure failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Malformed or missing input, reported against the field that failed.
    #[error("Invalid `{field}`: {reason}")]
    Validation {
        /// Name of the offending field, as it appears in requests
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// No matching, non-deleted todo exists for this owner.
    #[error("Todo not found")]
    NotFound,

    /// The record store failed.
    #[error("Store error: {0}")]
    Store(String),
}

impl TodoError {
    /// Build a validation error for `field`.
    #[must_use]
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this error was caused by the caller rather than the system.
    ///
    /// # Examples
    ///
    /// ```
    /// # use todo_core::TodoError;
    /// assert!(TodoError::NotFound.is_user_error());
    /// assert!(!TodoError::Store("connection reset".into()).is_user_error());
    /// ```
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::NotFound)
    }
}
