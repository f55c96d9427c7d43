//! Connection Manager
//!
//! Owns the single TCP socket to Logic.

use std::io::{ErrorKind, Read};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{LogicError, Result};
use crate::protocol::{format_command, split_lines, write_command, Command};

/// Whether a socket is currently held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// State shared with every CancelHandle
#[derive(Debug, Default)]
struct CancelSlot {
    /// Clone of the live socket, used only to shut it down
    stream: Mutex<Option<TcpStream>>,

    /// Set by `cancel()`, consumed by the failure it causes
    cancelled: AtomicBool,
}

/// Aborts a blocked receive from another thread
///
/// Cancelling shuts the socket down; the blocked call then fails with
/// `LogicError::Cancelled` and the connection returns to Disconnected.
/// A cancel issued while no socket is open (including mid-connect) is
/// held until the next connect, which fails with `Cancelled`.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    slot: Arc<CancelSlot>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.slot.cancelled.store(true, Ordering::SeqCst);

        if let Some(stream) = self.slot.stream.lock().as_ref() {
            tracing::debug!("Cancelling pending exchange");
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                tracing::debug!("Shutdown during cancel failed: {}", e);
            }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.slot.cancelled.load(Ordering::SeqCst)
    }
}

/// The client side of the scripting socket
///
/// Starts Disconnected. `ensure_connected` opens the socket on first use and
/// it stays open until `close`, a transport failure, or a cancel. Each
/// `send` must be followed by `receive_lines` before the next `send`.
pub struct Connection {
    config: Config,

    /// `None` while Disconnected
    stream: Option<TcpStream>,

    /// Peer address for logging
    peer_addr: Option<SocketAddr>,

    /// Buffer for the single read of each response
    recv_buf: Vec<u8>,

    cancel: Arc<CancelSlot>,
}

impl Connection {
    /// Create a disconnected connection manager
    pub fn new(config: Config) -> Self {
        let recv_buf = vec![0u8; config.recv_buffer_size];
        Self {
            config,
            stream: None,
            peer_addr: None,
            recv_buf,
            cancel: Arc::new(CancelSlot::default()),
        }
    }

    pub fn state(&self) -> ConnectionState {
        if self.stream.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            slot: Arc::clone(&self.cancel),
        }
    }

    /// Open the socket if it is not already open
    pub fn ensure_connected(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }
        self.connect()
    }

    /// Open the socket; a no-op while Connected
    pub fn connect(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }
        if self.recv_buf.is_empty() {
            return Err(LogicError::Config(
                "receive buffer size must be greater than zero".to_string(),
            ));
        }

        let addr = self.config.addr();
        let candidates: Vec<SocketAddr> = addr
            .to_socket_addrs()
            .map_err(|e| LogicError::connection(format!("failed to resolve {}", addr), e))?
            .collect();

        if candidates.is_empty() {
            return Err(LogicError::Config(format!("{} resolved to no addresses", addr)));
        }

        let mut last_err = None;
        for candidate in candidates {
            let attempt = match self.config.connect_timeout() {
                Some(timeout) => TcpStream::connect_timeout(&candidate, timeout),
                None => TcpStream::connect(candidate),
            };

            match attempt {
                Ok(stream) => return self.attach(stream, candidate),
                Err(e) => {
                    tracing::debug!("Connect to {} failed: {}", candidate, e);
                    last_err = Some(e);
                }
            }
        }

        let source = last_err
            .unwrap_or_else(|| std::io::Error::new(ErrorKind::NotFound, "no address to try"));
        Err(LogicError::connection(format!("failed to connect to {}", addr), source))
    }

    /// Configure a freshly connected socket and make it current
    fn attach(&mut self, stream: TcpStream, peer: SocketAddr) -> Result<()> {
        let setup = |stream: &TcpStream| -> std::io::Result<TcpStream> {
            // Disable Nagle's algorithm: requests are tiny and latency-bound
            stream.set_nodelay(true)?;
            stream.set_read_timeout(self.config.io_timeout())?;
            stream.set_write_timeout(self.config.io_timeout())?;
            stream.try_clone()
        };

        let cancel_clone = setup(&stream)
            .map_err(|e| LogicError::connection(format!("failed to configure socket to {}", peer), e))?;

        *self.cancel.stream.lock() = Some(cancel_clone);

        // Publish the clone before checking, so a concurrent cancel either
        // sees the socket or leaves the flag for us to find here
        if self.cancel.cancelled.swap(false, Ordering::SeqCst) {
            *self.cancel.stream.lock() = None;
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                tracing::debug!("Shutdown of cancelled connect failed: {}", e);
            }
            tracing::debug!("Connect to {} cancelled", peer);
            return Err(LogicError::Cancelled);
        }

        self.stream = Some(stream);
        self.peer_addr = Some(peer);

        tracing::debug!("Connected to Logic at {}", peer);
        Ok(())
    }

    /// Encode and write one command
    pub fn send(&mut self, command: &Command) -> Result<()> {
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;

        tracing::trace!("-> {}", format_command(command));
        let written = write_command(stream, command);

        written.map_err(|e| self.fail("send", e))
    }

    /// Read the next response as text lines
    ///
    /// Performs exactly one read of at most `recv_buffer_size` bytes. A
    /// response split across reads is not reassembled.
    pub fn receive_lines(&mut self) -> Result<Vec<String>> {
        let stream = self.stream.as_mut().ok_or_else(not_connected)?;
        let read = read_once(stream, &mut self.recv_buf);

        let n = read.map_err(|e| self.fail("receive", e))?;
        if n == 0 {
            let eof = std::io::Error::new(ErrorKind::UnexpectedEof, "peer closed the connection");
            return Err(self.fail("receive", eof));
        }

        let lines = split_lines(&self.recv_buf[..n])?;
        for line in &lines {
            tracing::trace!("<- {}", line);
        }
        Ok(lines)
    }

    /// Release the socket and drop any pending cancel; the next operation
    /// reconnects
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.shutdown(Shutdown::Both) {
                tracing::debug!("Shutdown on close failed: {}", e);
            }
            tracing::debug!("Closed connection to {:?}", self.peer_addr);
        }
        *self.cancel.stream.lock() = None;
        self.cancel.cancelled.store(false, Ordering::SeqCst);
        self.peer_addr = None;
    }

    /// Drop the socket after a transport failure and classify the error
    fn fail(&mut self, operation: &'static str, e: std::io::Error) -> LogicError {
        let cancelled = self.cancel.cancelled.swap(false, Ordering::SeqCst);
        self.close();

        if cancelled {
            return LogicError::Cancelled;
        }

        match e.kind() {
            ErrorKind::WouldBlock | ErrorKind::TimedOut => {
                tracing::warn!("{} timed out, dropping connection", operation);
                LogicError::Timeout {
                    operation,
                    after: self.config.io_timeout().unwrap_or_default(),
                }
            }
            _ => {
                tracing::warn!("{} failed, dropping connection: {}", operation, e);
                LogicError::connection(format!("{} failed", operation), e)
            }
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}

fn read_once(stream: &mut TcpStream, buf: &mut [u8]) -> std::io::Result<usize> {
    loop {
        match stream.read(buf) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

fn not_connected() -> LogicError {
    LogicError::connection(
        "no open connection",
        std::io::Error::new(ErrorKind::NotConnected, "call connect() first"),
    )
}
