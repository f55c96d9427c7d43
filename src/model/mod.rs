//! Model Module
//!
//! Records parsed from response payload lines.
//!
//! ## Line Formats
//! ```text
//! Device:      index, name, kind, id[, ACTIVE]
//! SampleRate:  digital, analog
//! ```
//!
//! Values are snapshots: built fresh for every call, never cached.

mod device;
mod sample_rate;

pub use device::{Device, ACTIVE_MARKER};
pub use sample_rate::SampleRate;
