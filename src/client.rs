//! Command Client
//!
//! The public surface: one method per protocol verb, plus conveniences
//! built on top of them.
//!
//! ## Responsibilities
//! - Open the connection on first use
//! - Run exactly one request/response exchange per verb
//! - Turn payload lines into `Device` and `SampleRate` values

use crate::config::Config;
use crate::error::{LogicError, Result};
use crate::model::{Device, SampleRate};
use crate::network::{CancelHandle, Connection, ConnectionState};
use crate::protocol::{decode_response, Command, Response};

/// Client for the Logic scripting socket
///
/// ## Connection lifecycle
///
/// The client starts Disconnected and connects on the first verb (or on an
/// explicit `connect`). After `close`, the next verb reconnects
/// transparently; closing is a way to release the socket, not a terminal
/// state. Transport failures (including timeouts and cancels) also drop the
/// socket and leave reconnecting to the next call.
///
/// ## Concurrency
///
/// Responses carry no request id, so a request must be fully answered
/// before the next one is sent. Verbs take `&mut self`; share a client
/// between threads only behind a mutex. To abort a long `capture` from
/// elsewhere, use a `CancelHandle`.
pub struct LogicClient {
    connection: Connection,
}

impl LogicClient {
    /// Create a disconnected client
    pub fn new(config: Config) -> Self {
        Self {
            connection: Connection::new(config),
        }
    }

    pub fn config(&self) -> &Config {
        self.connection.config()
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_connected()
    }

    /// Connect now instead of on the first verb
    pub fn connect(&mut self) -> Result<()> {
        self.connection.connect()
    }

    /// Handle that can abort a pending exchange from another thread
    pub fn cancel_handle(&self) -> CancelHandle {
        self.connection.cancel_handle()
    }

    /// Release the connection
    pub fn close(&mut self) {
        self.connection.close();
    }

    // =========================================================================
    // Protocol Verbs
    // =========================================================================

    /// Devices known to Logic, in the order Logic lists them
    pub fn connected_devices(&mut self) -> Result<Vec<Device>> {
        let response = self.execute(Command::GetConnectedDevices)?;
        Device::parse_lines(&response.lines)
    }

    /// All sample rates available with the current channel setup, unsorted
    pub fn all_sample_rates(&mut self) -> Result<Vec<SampleRate>> {
        let response = self.execute(Command::GetAllSampleRates)?;
        SampleRate::parse_lines(&response.lines)
    }

    /// The configured sample rate
    pub fn sample_rate(&mut self) -> Result<SampleRate> {
        let response = self.execute(Command::GetSampleRate)?;
        SampleRate::parse_line(response.first_line()?)
    }

    pub fn set_sample_rate(&mut self, rate: SampleRate) -> Result<()> {
        self.execute_ack(Command::SetSampleRate(rate))
    }

    /// Set the capture length in samples
    pub fn set_num_samples(&mut self, count: u64) -> Result<()> {
        self.execute_ack(Command::SetNumSamples(count))
    }

    /// Start a capture and block until Logic reports it complete
    ///
    /// There is no upper bound on the wait unless an I/O timeout is
    /// configured.
    pub fn capture(&mut self) -> Result<()> {
        self.execute_ack(Command::Capture)
    }

    // =========================================================================
    // Conveniences
    // =========================================================================

    /// The device Logic currently captures with, if any
    pub fn active_device(&mut self) -> Result<Option<Device>> {
        Ok(self
            .connected_devices()?
            .into_iter()
            .find(|device| device.active))
    }

    /// Lowest available rate with at least the given digital and analog rates
    ///
    /// Rates are compared digital first, then analog. `Ok(None)` means no
    /// available rate qualifies.
    pub fn sample_rate_at_least(
        &mut self,
        digital_min: u64,
        analog_min: u64,
    ) -> Result<Option<SampleRate>> {
        let rates = self.all_sample_rates()?;
        Ok(SampleRate::lowest_at_least(&rates, digital_min, analog_min))
    }

    /// Set the capture length in seconds at the current digital rate
    ///
    /// Reads the rate back from Logic, so set the sample rate first. The
    /// sample count is `digital_rate * seconds`, truncated.
    pub fn set_num_seconds(&mut self, seconds: f64) -> Result<()> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(LogicError::InvalidArgument(format!(
                "capture length must be a non-negative number of seconds, got {}",
                seconds
            )));
        }

        let rate = self.sample_rate()?;
        let samples = samples_for(rate.digital, seconds).ok_or_else(|| {
            LogicError::InvalidArgument(format!(
                "{}s at {} Hz digital exceeds the largest sample count",
                seconds, rate.digital
            ))
        })?;
        tracing::debug!(
            "{}s at {} Hz digital -> {} samples",
            seconds,
            rate.digital,
            samples
        );
        self.set_num_samples(samples)
    }

    // =========================================================================
    // Exchange
    // =========================================================================

    /// One request/response round trip
    fn execute(&mut self, command: Command) -> Result<Response> {
        let verb = command.command_type().as_str();

        self.connection.ensure_connected()?;
        self.connection.send(&command)?;
        let lines = self.connection.receive_lines()?;
        let response = decode_response(lines)?;

        tracing::debug!("{} answered with {} line(s)", verb, response.lines.len());
        Ok(response)
    }

    /// Round trip for verbs whose only answer is the sentinel
    fn execute_ack(&mut self, command: Command) -> Result<()> {
        let verb = command.command_type().as_str();
        let response = self.execute(command)?;

        if !response.is_ack_only() {
            tracing::warn!(
                "{} expected a bare ACK, ignoring payload: {:?}",
                verb,
                response.lines
            );
        }
        Ok(())
    }
}

impl Default for LogicClient {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

/// Truncated product of a rate and a duration
///
/// Integer durations are computed exactly; fractional ones go through f64.
/// `None` when the count does not fit in a u64.
fn samples_for(rate: u64, seconds: f64) -> Option<u64> {
    // 2^64, the smallest f64 above u64::MAX
    const LIMIT: f64 = 18_446_744_073_709_551_616.0;

    if seconds.fract() == 0.0 && seconds < LIMIT {
        rate.checked_mul(seconds as u64)
    } else {
        let product = (rate as f64 * seconds).trunc();
        (product < LIMIT).then(|| product as u64)
    }
}
