//! # logic-remote
//!
//! A blocking client for the Logic analyzer scripting socket:
//! - Device enumeration
//! - Sample-rate discovery and selection
//! - Capture length in samples or seconds
//! - Blocking captures with optional timeout and out-of-band cancel
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      LogicClient                             │
//! │              (one method per protocol verb)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Command
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Codec     │          │ Connection  │
//!   │ (encode /   │◄─────────│ (TcpStream, │
//!   │  ACK check) │  lines   │  one read)  │
//!   └──────┬──────┘          └─────────────┘
//!          │ payload lines
//!          ▼
//!   ┌─────────────┐
//!   │   Model     │
//!   │ Device,     │
//!   │ SampleRate  │
//!   └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use logic_remote::{Config, LogicClient};
//!
//! # fn main() -> logic_remote::Result<()> {
//! let mut logic = LogicClient::new(Config::default());
//! if let Some(rate) = logic.sample_rate_at_least(1_000_000, 0)? {
//!     logic.set_sample_rate(rate)?;
//! }
//! logic.set_num_seconds(0.5)?;
//! logic.capture()?;
//! logic.close();
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod network;
pub mod protocol;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LogicError, Result};
pub use config::Config;
pub use client::LogicClient;
pub use model::{Device, SampleRate};
pub use network::{CancelHandle, ConnectionState};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of logic-remote
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
