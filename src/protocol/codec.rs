//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol. Nothing here
//! touches a socket, so every function can be driven with literal input.
//!
//! ## Wire Format
//!
//! ### Request Format
//! ```text
//! ┌──────────┬───────────────────────────────┬──────┐
//! │   VERB   │ ", " arg { ", " arg }  (opt)  │ 0x00 │
//! └──────────┴───────────────────────────────┴──────┘
//! ```
//!
//! ### Response Format
//! ```text
//! line\n
//! line\n
//! ACK
//! ```

use std::io::Write;

use super::{Command, Response};
use crate::error::{LogicError, Result};

/// Byte that terminates every request
pub const REQUEST_TERMINATOR: u8 = 0x00;

/// Separator between the verb and each argument
pub const ARG_SEPARATOR: &str = ", ";

/// Final line of every response
pub const ACK_SENTINEL: &str = "ACK";

// =============================================================================
// Request Encoding
// =============================================================================

/// Render a command as request text, without the terminator
pub fn format_command(command: &Command) -> String {
    let mut text = command.command_type().as_str().to_string();
    for arg in command.args() {
        text.push_str(ARG_SEPARATOR);
        text.push_str(&arg);
    }
    text
}

/// Encode a command to bytes
///
/// Format: verb [", " arg]* + 0x00
pub fn encode_command(command: &Command) -> Vec<u8> {
    let text = format_command(command);
    let mut message = Vec::with_capacity(text.len() + 1);
    message.extend_from_slice(text.as_bytes());
    message.push(REQUEST_TERMINATOR);
    message
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> std::io::Result<()> {
    let bytes = encode_command(command);
    writer.write_all(&bytes)?;
    writer.flush()
}

// =============================================================================
// Response Decoding
// =============================================================================

/// Split the bytes of one read into text lines
///
/// Lines break on `\n`; a trailing `\r` on a line is dropped, and a line
/// break after the last line does not produce an empty line.
pub fn split_lines(bytes: &[u8]) -> Result<Vec<String>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }

    let text = std::str::from_utf8(bytes).map_err(|e| LogicError::Protocol {
        reason: format!("response is not valid UTF-8 ({})", e),
        lines: vec![String::from_utf8_lossy(bytes).into_owned()],
    })?;

    let mut lines: Vec<String> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect();

    if lines.len() > 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    Ok(lines)
}

/// Validate and strip the ACK sentinel
///
/// The last line must be exactly `ACK`; the lines before it are returned
/// in order as the response payload.
pub fn decode_response(mut lines: Vec<String>) -> Result<Response> {
    let terminated = lines.last().map(|last| last == ACK_SENTINEL);

    match terminated {
        Some(true) => {
            lines.pop();
            Ok(Response::new(lines))
        }
        Some(false) => Err(LogicError::Protocol {
            reason: format!("response does not end with {}", ACK_SENTINEL),
            lines,
        }),
        None => Err(LogicError::Protocol {
            reason: "empty response".to_string(),
            lines,
        }),
    }
}

/// Split and validate the raw bytes of one read
pub fn decode_bytes(bytes: &[u8]) -> Result<Response> {
    decode_response(split_lines(bytes)?)
}

/// Split a data line on commas, trimming surrounding whitespace from each field
pub fn split_fields(line: &str) -> Vec<&str> {
    line.split(',').map(str::trim).collect()
}
