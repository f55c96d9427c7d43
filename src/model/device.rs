//! Device records
//!
//! One `Device` per line of a GET_CONNECTED_DEVICES response.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LogicError, Result};
use crate::protocol::split_fields;

/// Marker in the fifth field of the currently selected device
pub const ACTIVE_MARKER: &str = "ACTIVE";

/// Snapshot of a device as reported by Logic
///
/// `num` is the position Logic gave this device for the call that produced
/// it. It is not stable across calls; use `dev_id` to track a device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Device {
    pub num: u32,
    pub name: String,
    pub kind: String,
    pub dev_id: String,
    /// Selected for capture
    pub active: bool,
}

impl Device {
    /// Parse one device line: `index, name, kind, id[, ACTIVE]`
    pub fn parse_line(line: &str) -> Result<Self> {
        let fields = split_fields(line);
        if fields.len() < 4 {
            return Err(LogicError::Parse(format!(
                "device line needs at least 4 fields, got {}: {:?}",
                fields.len(),
                line
            )));
        }

        let num = fields[0].parse::<u32>().map_err(|e| {
            LogicError::Parse(format!("invalid device index {:?}: {}", fields[0], e))
        })?;

        Ok(Self {
            num,
            name: fields[1].to_string(),
            kind: fields[2].to_string(),
            dev_id: fields[3].to_string(),
            active: fields.get(4).is_some_and(|marker| *marker == ACTIVE_MARKER),
        })
    }

    /// Parse every payload line of a device listing, keeping server order
    pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Self>> {
        lines.iter().map(|line| Self::parse_line(line.as_ref())).collect()
    }
}

impl FromStr for Device {
    type Err = LogicError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_line(s)
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Device(num={}, name=\"{}\", kind=\"{}\", dev_id=\"{}\", active={})",
            self.num, self.name, self.kind, self.dev_id, self.active
        )
    }
}
