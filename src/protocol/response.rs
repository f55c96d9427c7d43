//! Response definitions
//!
//! Represents a decoded, ACK-validated response from Logic.

use crate::error::{LogicError, Result};

/// Payload lines of a response, sentinel already stripped
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    pub lines: Vec<String>,
}

impl Response {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// True when the peer sent nothing but the sentinel
    pub fn is_ack_only(&self) -> bool {
        self.lines.is_empty()
    }

    /// The first payload line, for verbs that answer with a single record
    pub fn first_line(&self) -> Result<&str> {
        self.lines
            .first()
            .map(String::as_str)
            .ok_or_else(|| LogicError::Parse("expected one payload line, got none".to_string()))
    }
}
