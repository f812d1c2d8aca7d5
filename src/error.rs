//! Unified error handling for hearthd.
//!
//! Errors are split by layer: [`ConnectionError`] for the transport,
//! [`ProtocolViolation`] for inbound packets a well-behaved client never
//! sends, and [`SessionError`] which the dispatch loop reports before tearing
//! the session down.

use hearth_proto::{ProtocolError, TextType};
use thiserror::Error;

// ============================================================================
// Connection Errors (transport)
// ============================================================================

/// Errors raised by a [`Connection`](crate::network::Connection).
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("connection closed")]
    Closed,

    #[error("outbound queue full")]
    QueueFull,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("handshake failed: {0}")]
    Handshake(String),
}

// ============================================================================
// Protocol Violations (inbound validation)
// ============================================================================

/// An inbound packet that is malformed or not allowed in its context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolViolation {
    #[error("text packet can only contain text type of type chat but got {0:?}")]
    InvalidTextType(TextType),

    #[error("text packet source name {source_name:?} must be equal to display name {display_name:?}")]
    SourceNameMismatch {
        source_name: String,
        display_name: String,
    },

    #[error("command request packet must never have the internal field set to true")]
    InternalCommandRequest,
}

// ============================================================================
// Session Errors
// ============================================================================

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("protocol violation: {0}")]
    ProtocolViolation(#[from] ProtocolViolation),

    #[error("transport failure: {0}")]
    Transport(#[from] ConnectionError),
}

impl SessionError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ProtocolViolation(ProtocolViolation::InvalidTextType(_)) => "invalid_text_type",
            Self::ProtocolViolation(ProtocolViolation::SourceNameMismatch { .. }) => {
                "source_name_mismatch"
            }
            Self::ProtocolViolation(ProtocolViolation::InternalCommandRequest) => {
                "internal_command_request"
            }
            Self::Transport(_) => "transport_failure",
        }
    }
}

/// Result type for inbound packet handlers.
pub type HandlerResult = Result<(), SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_error_codes() {
        let err: SessionError = ProtocolViolation::InternalCommandRequest.into();
        assert_eq!(err.error_code(), "internal_command_request");

        let err: SessionError = ConnectionError::Closed.into();
        assert_eq!(err.error_code(), "transport_failure");
    }

    #[test]
    fn test_violation_display() {
        let err = ProtocolViolation::SourceNameMismatch {
            source_name: "Mallory".into(),
            display_name: "Alice".into(),
        };
        assert!(err.to_string().contains("\"Mallory\""));
        assert!(err.to_string().contains("\"Alice\""));
    }
}
