//! Error types for logic-remote
//!
//! Provides a unified error type for all client operations.

use std::time::Duration;
use thiserror::Error;

/// Result type alias using LogicError
pub type Result<T> = std::result::Result<T, LogicError>;

/// Unified error type for logic-remote operations
#[derive(Debug, Error)]
pub enum LogicError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// Socket-level failure while connecting, sending, or receiving
    #[error("Connection error: {context}: {source}")]
    Connection {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out during {operation} after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("Pending receive was cancelled")]
    Cancelled,

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    /// The response was not a valid ACK-terminated line sequence
    #[error("Protocol error: {reason}, got response: {lines:?}")]
    Protocol { reason: String, lines: Vec<String> },

    #[error("Parse error: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Caller Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LogicError {
    pub(crate) fn connection(context: impl Into<String>, source: std::io::Error) -> Self {
        LogicError::Connection {
            context: context.into(),
            source,
        }
    }

    /// Raw response lines attached to a protocol error, if any
    pub fn raw_lines(&self) -> Option<&[String]> {
        match self {
            LogicError::Protocol { lines, .. } => Some(lines),
            _ => None,
        }
    }

    /// True for failures that left the transport unusable
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            LogicError::Connection { .. } | LogicError::Timeout { .. } | LogicError::Cancelled
        )
    }
}
