//! Command definitions
//!
//! Represents requests sent to Logic.

use crate::model::SampleRate;

/// Command verbs understood by the scripting socket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandType {
    GetConnectedDevices,
    GetAllSampleRates,
    GetSampleRate,
    SetSampleRate,
    SetNumSamples,
    Capture,
}

impl CommandType {
    /// Wire spelling of the verb
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandType::GetConnectedDevices => "GET_CONNECTED_DEVICES",
            CommandType::GetAllSampleRates => "GET_ALL_SAMPLE_RATES",
            CommandType::GetSampleRate => "GET_SAMPLE_RATE",
            CommandType::SetSampleRate => "SET_SAMPLE_RATE",
            CommandType::SetNumSamples => "SET_NUM_SAMPLES",
            CommandType::Capture => "CAPTURE",
        }
    }
}

/// A request with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List devices known to Logic
    GetConnectedDevices,

    /// List the sample rates available with the current channel setup
    GetAllSampleRates,

    /// Read the configured sample rate
    GetSampleRate,

    /// Configure the sample rate
    SetSampleRate(SampleRate),

    /// Configure the capture length in samples
    SetNumSamples(u64),

    /// Run a capture and wait for it to complete
    Capture,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::GetConnectedDevices => CommandType::GetConnectedDevices,
            Command::GetAllSampleRates => CommandType::GetAllSampleRates,
            Command::GetSampleRate => CommandType::GetSampleRate,
            Command::SetSampleRate(_) => CommandType::SetSampleRate,
            Command::SetNumSamples(_) => CommandType::SetNumSamples,
            Command::Capture => CommandType::Capture,
        }
    }

    /// Argument values in wire order
    pub fn args(&self) -> Vec<String> {
        match self {
            Command::SetSampleRate(rate) => vec![rate.digital.to_string(), rate.analog.to_string()],
            Command::SetNumSamples(count) => vec![count.to_string()],
            Command::GetConnectedDevices
            | Command::GetAllSampleRates
            | Command::GetSampleRate
            | Command::Capture => Vec::new(),
        }
    }
}
