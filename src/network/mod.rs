//! Network Module
//!
//! TCP connection handling for the client.
//!
//! ## Model
//! - One socket, opened lazily and reused across commands
//! - Blocking I/O with optional timeouts
//! - Out-of-band cancellation through `CancelHandle`

mod connection;

pub use connection::{CancelHandle, Connection, ConnectionState};
