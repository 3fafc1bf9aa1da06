//! Error types for Switchyard.
//!
//! [`SwitchyardError`] covers failures that surface to the code *configuring*
//! an application: malformed actions and lifecycle misuse. Failures raised
//! while *handling* a request never use this type; they travel as
//! [`Interrupt`](crate::Interrupt) values and end at the dispatch boundary.

use thiserror::Error;

/// Result type alias using [`SwitchyardError`].
pub type SwitchyardResult<T> = Result<T, SwitchyardError>;

/// Standard error type for Switchyard setup and lifecycle operations.
///
/// # Example
///
/// ```
/// use switchyard_core::{Action, SwitchyardError};
///
/// let err = Action::route().path("/books").build().unwrap_err();
/// assert!(matches!(err, SwitchyardError::InvalidAction { .. }));
/// ```
#[derive(Error, Debug)]
pub enum SwitchyardError {
    /// An action was built with a missing or empty field.
    #[error("Invalid action: {reason}")]
    InvalidAction {
        /// Which field was missing or malformed.
        reason: String,
    },

    /// The operation is not allowed in the current lifecycle state.
    #[error("Illegal state: {message}")]
    IllegalState {
        /// Human-readable error message.
        message: String,
    },

    /// The request body could not be read.
    #[error("Failed to read request body")]
    BodyRead(#[source] std::io::Error),

    /// The request body could not be decoded.
    #[error("Invalid request body: {message}")]
    InvalidBody {
        /// Human-readable error message.
        message: String,
    },

    /// The query string could not be decoded.
    #[error("Invalid query string: {message}")]
    InvalidQuery {
        /// Human-readable error message.
        message: String,
    },
}

impl SwitchyardError {
    /// Creates an invalid action error.
    #[must_use]
    pub fn invalid_action(reason: impl Into<String>) -> Self {
        Self::InvalidAction {
            reason: reason.into(),
        }
    }

    /// Creates an illegal state error.
    #[must_use]
    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::IllegalState {
            message: message.into(),
        }
    }

    /// Returns `true` for [`SwitchyardError::IllegalState`].
    #[must_use]
    pub const fn is_illegal_state(&self) -> bool {
        matches!(self, Self::IllegalState { .. })
    }
}
