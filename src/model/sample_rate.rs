//! Sample rate pairs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LogicError, Result};
use crate::protocol::split_fields;

/// Samples per second for the digital and analog channel groups
///
/// Field order drives the derived ordering: digital first, then analog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct SampleRate {
    pub digital: u64,
    pub analog: u64,
}

impl SampleRate {
    pub const fn new(digital: u64, analog: u64) -> Self {
        Self { digital, analog }
    }

    /// Parse one rate line: `digital, analog`
    pub fn parse_line(line: &str) -> Result<Self> {
        let fields = split_fields(line);
        if fields.len() != 2 {
            return Err(LogicError::Parse(format!(
                "sample rate line needs 2 fields, got {}: {:?}",
                fields.len(),
                line
            )));
        }

        Ok(Self {
            digital: parse_rate(fields[0], "digital")?,
            analog: parse_rate(fields[1], "analog")?,
        })
    }

    pub fn parse_lines<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Self>> {
        lines.iter().map(|line| Self::parse_line(line.as_ref())).collect()
    }

    /// Both components meet the given minimums
    pub fn satisfies(&self, digital_min: u64, analog_min: u64) -> bool {
        self.digital >= digital_min && self.analog >= analog_min
    }

    /// Smallest rate, in ascending order, meeting both minimums
    pub fn lowest_at_least(rates: &[SampleRate], digital_min: u64, analog_min: u64) -> Option<Self> {
        let mut sorted = rates.to_vec();
        sorted.sort();
        sorted.into_iter().find(|rate| rate.satisfies(digital_min, analog_min))
    }
}

fn parse_rate(field: &str, which: &str) -> Result<u64> {
    field
        .parse::<u64>()
        .map_err(|e| LogicError::Parse(format!("invalid {} sample rate {:?}: {}", which, field, e)))
}

impl FromStr for SampleRate {
    type Err = LogicError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_line(s)
    }
}

impl From<(u64, u64)> for SampleRate {
    fn from((digital, analog): (u64, u64)) -> Self {
        Self { digital, analog }
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.digital, self.analog)
    }
}
