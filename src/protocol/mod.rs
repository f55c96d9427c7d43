//! Protocol Module
//!
//! Defines the text protocol spoken on the Logic scripting socket.
//!
//! ## Request Format
//! ```text
//! SET_SAMPLE_RATE, 1000000, 0\0
//! ```
//!
//! ### Commands
//! - GET_CONNECTED_DEVICES  - no arguments
//! - GET_ALL_SAMPLE_RATES   - no arguments
//! - GET_SAMPLE_RATE        - no arguments
//! - SET_SAMPLE_RATE        - digital, analog
//! - SET_NUM_SAMPLES        - count
//! - CAPTURE                - no arguments
//!
//! ## Response Format
//! Zero or more comma-separated data lines, then the literal line `ACK`.
//! There are no request ids, so exactly one request may be outstanding.

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::Response;
pub use codec::{
    decode_bytes, decode_response, encode_command, format_command, split_fields, split_lines,
    write_command, ACK_SENTINEL, ARG_SEPARATOR, REQUEST_TERMINATOR,
};
