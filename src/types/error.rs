//! Error types for the session coordinator

use thiserror::Error;

/// Main error type for the coordinator
///
/// Every failure is local to one session or operation. Nothing here is
/// fatal to the process: callers decide whether to retry or surface the
/// error to the human operator.
#[derive(Debug, Error)]
pub enum CoordinatorError {
    // === Session errors ===
    /// Session not found
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    // === Transport errors ===
    /// A command to the external transport failed
    #[error("Transport error: {0}")]
    Transport(String),

    /// The transport is not ready to accept commands
    #[error("Transport not ready")]
    TransportNotReady,

    // === Approval errors ===
    /// Edited tool input supplied to an approval was not valid structured data
    #[error("Invalid approval input: {0}")]
    InvalidApprovalInput(String),

    /// No pending approval matched the given request id
    #[error("Approval not found: {0}")]
    ApprovalNotFound(String),

    // === External errors ===
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic errors ===
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for the coordinator
pub type Result<T> = std::result::Result<T, CoordinatorError>;

impl CoordinatorError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CoordinatorError::Transport(_) | CoordinatorError::TransportNotReady
        )
    }

    /// Check if this error is a client error (caused by invalid input)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoordinatorError::SessionNotFound(_)
                | CoordinatorError::InvalidApprovalInput(_)
                | CoordinatorError::ApprovalNotFound(_)
        )
    }

    // === Constructor helpers ===

    /// Create a session not found error
    pub fn session_not_found(session_id: impl Into<String>) -> Self {
        CoordinatorError::SessionNotFound(session_id.into())
    }

    /// Create a transport error
    pub fn transport(msg: impl Into<String>) -> Self {
        CoordinatorError::Transport(msg.into())
    }

    /// Create an invalid approval input error
    pub fn invalid_approval_input(msg: impl Into<String>) -> Self {
        CoordinatorError::InvalidApprovalInput(msg.into())
    }

    /// Create an approval not found error
    pub fn approval_not_found(request_id: impl Into<String>) -> Self {
        CoordinatorError::ApprovalNotFound(request_id.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        CoordinatorError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoordinatorError::session_not_found("test-123");
        assert_eq!(err.to_string(), "Session not found: test-123");

        let err = CoordinatorError::transport("connection refused");
        assert_eq!(err.to_string(), "Transport error: connection refused");
    }

    #[test]
    fn test_is_retryable() {
        assert!(CoordinatorError::transport("timeout").is_retryable());
        assert!(CoordinatorError::TransportNotReady.is_retryable());
        assert!(!CoordinatorError::session_not_found("x").is_retryable());
        assert!(!CoordinatorError::invalid_approval_input("bad json").is_retryable());
    }

    #[test]
    fn test_is_client_error() {
        assert!(CoordinatorError::session_not_found("x").is_client_error());
        assert!(CoordinatorError::invalid_approval_input("not an object").is_client_error());
        assert!(CoordinatorError::approval_not_found("r1").is_client_error());
        assert!(!CoordinatorError::transport("refused").is_client_error());
        assert!(!CoordinatorError::internal("oops").is_client_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = CoordinatorError::from(parse_err);
        assert!(matches!(err, CoordinatorError::Json(_)));
        assert!(!err.is_client_error());
    }
}
