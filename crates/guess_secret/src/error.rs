//! # Workflow Error Types
//!
//! Every failure the workflow can surface. None of them is fatal: each ends
//! up as a `Failed` request state plus one notification.

use guess_shared::{MAX_GUESS_NUMBER, MAX_NAME_LEN};
use thiserror::Error;

/// Why a guess form did not validate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The number field is not 1-2 decimal digits.
    #[error("Please enter a number between 0 and {}.", MAX_GUESS_NUMBER)]
    NumberFormat,

    /// The number parsed but is above the maximum.
    #[error("Number must be between 0 and {}, got {0}.", MAX_GUESS_NUMBER)]
    NumberOutOfRange(u8),

    /// The name field is empty.
    #[error("Please enter a name.")]
    EmptyName,

    /// The name is longer than allowed.
    #[error("Name must be at most {} characters, got {0}.", MAX_NAME_LEN)]
    NameTooLong(usize),
}

/// Errors surfaced by the synchronizer and the submitter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// No active account/signer, or no resolved contract handle.
    #[error("Wallet not connected. Try again…")]
    NotConnected,

    /// The guess form failed validation. No network call was made.
    #[error(transparent)]
    InvalidInput(#[from] ValidationError),

    /// A read query failed in transport or while decoding.
    #[error("{0}")]
    QueryFailed(String),

    /// The transaction was rejected by the signer or reverted.
    #[error("{0}")]
    TxFailed(String),
}

impl GameError {
    /// Human-readable reason, as shown to the user.
    #[must_use]
    pub fn reason(&self) -> String {
        self.to_string()
    }
}

/// Result type for workflow operations.
pub type GameResult<T> = Result<T, GameError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_failure_reason_is_verbatim() {
        let err = GameError::QueryFailed("not revealed".to_string());
        assert_eq!(err.reason(), "not revealed");
    }

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            GameError::from(ValidationError::NumberOutOfRange(91)).reason(),
            "Number must be between 0 and 90, got 91."
        );
        assert_eq!(
            ValidationError::NumberFormat.to_string(),
            "Please enter a number between 0 and 90."
        );
    }
}
