//! Error handling for the feedback system
//!
//! This module provides idiomatic Rust error types using thiserror for
//! better error messages and proper error chain handling.

use thiserror::Error;

/// Main error type for the feedback system.
///
/// Validation and authorization failures short-circuit before any side
/// effect; database failures abort the in-flight request. Mail failures are
/// intentionally absent here: the notifier's errors are swallowed at the
/// call site and never reach a caller.
#[derive(Error, Debug)]
pub enum FeedbackError {
    /// Structural validation failure; the message is the joined list of
    /// violated constraints and is safe to show to the client.
    #[error("{0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Admin token not configured on server")]
    AdminTokenNotConfigured,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl FeedbackError {
    /// True for failures caused by the caller rather than the backend.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FeedbackError::Validation(_) | FeedbackError::Unauthorized
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_passes_through() {
        let err = FeedbackError::Validation("\"rating\" is required".to_string());
        assert_eq!(err.to_string(), "\"rating\" is required");
        assert!(err.is_client_error());
    }

    #[test]
    fn admin_token_message_is_stable() {
        assert_eq!(
            FeedbackError::AdminTokenNotConfigured.to_string(),
            "Admin token not configured on server"
        );
        assert!(!FeedbackError::AdminTokenNotConfigured.is_client_error());
    }
}
