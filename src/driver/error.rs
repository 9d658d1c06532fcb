//! Error types for the W5500 driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`BusError`]: SPI transfer and chip-select failures
//! - [`ConfigError`]: Identification and configuration failures
//! - [`SocketError`]: Socket state machine, timeout and capacity failures
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by most driver methods.

use embedded_hal::digital;
use embedded_hal::spi;

use crate::socket::{Command, Status};

// =============================================================================
// Bus Errors
// =============================================================================

/// SPI bus and chip-select errors
///
/// Bus errors are never retried by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// SPI transfer failed
    Spi(spi::ErrorKind),
    /// Chip-select pin could not be driven
    ChipSelect(digital::ErrorKind),
    /// The controller is already borrowed by the calling context
    Busy,
}

impl core::fmt::Display for BusError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BusError::Spi(kind) => write!(f, "SPI transfer failed: {kind}"),
            BusError::ChipSelect(kind) => write!(f, "chip select failed: {kind}"),
            BusError::Busy => f.write_str(self.as_str()),
        }
    }
}

impl BusError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            BusError::Spi(_) => "SPI transfer failed",
            BusError::ChipSelect(_) => "chip select failed",
            BusError::Busy => "controller busy",
        }
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Identification and configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// MR.RST did not self-clear after a soft reset
    ResetTimeout,
    /// Mode register fingerprint did not read back
    ChipNotDetected,
    /// Version register holds an unexpected value
    UnsupportedVersion(u8),
    /// Protocol is neither TCP nor UDP
    UnsupportedProtocol,
    /// Buffer size is not one of 1, 2, 4, 8 or 16 KiB
    InvalidBufferSize,
    /// Socket index is not in 0..8
    InvalidSocketIndex,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::UnsupportedVersion(v) => write!(f, "unsupported chip version {v:#04x}"),
            _ => f.write_str(self.as_str()),
        }
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::ResetTimeout => "soft reset timed out",
            ConfigError::ChipNotDetected => "W5500 not detected",
            ConfigError::UnsupportedVersion(_) => "unsupported chip version",
            ConfigError::UnsupportedProtocol => "unsupported protocol",
            ConfigError::InvalidBufferSize => "invalid socket buffer size",
            ConfigError::InvalidSocketIndex => "invalid socket index",
        }
    }
}

// =============================================================================
// Socket Errors
// =============================================================================

/// Socket state machine and data path errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SocketError {
    /// Operation requires a different socket status
    InvalidState(Status),
    /// Sn_CR did not clear within the poll budget
    CommandTimeout(Command),
    /// Sn_CR read back neither zero nor the issued command
    InvalidCommandState(u8),
    /// Connect attempt ended in CLOSED
    ConnectionRefused,
    /// Connect did not reach ESTABLISHED in time
    ConnectTimeout,
    /// Payload is larger than the socket TX buffer
    PayloadTooLarge,
    /// Write on a socket that is not ESTABLISHED or CLOSE_WAIT
    WriteOnClosedSocket(Status),
    /// Remote side closed while waiting for TX free space
    RemoteClosed,
    /// Socket closed while waiting for SEND_OK
    SocketClosedDuringWrite,
    /// TX free space or SEND_OK did not arrive in time
    SendTimeout,
}

impl core::fmt::Display for SocketError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SocketError::InvalidState(status) => {
                write!(f, "invalid socket state {:#04x}", status.to_raw())
            }
            SocketError::CommandTimeout(cmd) => {
                write!(f, "socket command {:#04x} timed out", *cmd as u8)
            }
            SocketError::InvalidCommandState(raw) => {
                write!(f, "invalid command register value {raw:#04x}")
            }
            SocketError::WriteOnClosedSocket(status) => {
                write!(f, "write on closed socket ({:#04x})", status.to_raw())
            }
            _ => f.write_str(self.as_str()),
        }
    }
}

impl SocketError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            SocketError::InvalidState(_) => "invalid socket state",
            SocketError::CommandTimeout(_) => "socket command timed out",
            SocketError::InvalidCommandState(_) => "invalid command register value",
            SocketError::ConnectionRefused => "connection refused",
            SocketError::ConnectTimeout => "connect timed out",
            SocketError::PayloadTooLarge => "payload exceeds socket buffer",
            SocketError::WriteOnClosedSocket(_) => "write on closed socket",
            SocketError::RemoteClosed => "remote closed the connection",
            SocketError::SocketClosedDuringWrite => "socket closed during write",
            SocketError::SendTimeout => "send timed out",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match result {
///     Err(Error::Config(ConfigError::ChipNotDetected)) => { /* ... */ }
///     Err(Error::Socket(SocketError::ConnectTimeout)) => { /* ... */ }
///     Err(Error::Bus(_)) => { /* ... */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Bus error
    Bus(BusError),
    /// Configuration error
    Config(ConfigError),
    /// Socket error
    Socket(SocketError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "bus: {e}"),
            Error::Config(e) => write!(f, "config: {e}"),
            Error::Socket(e) => write!(f, "socket: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// From impls for automatic conversion
impl From<BusError> for Error {
    fn from(e: BusError) -> Self {
        Error::Bus(e)
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<SocketError> for Error {
    fn from(e: SocketError) -> Self {
        Error::Socket(e)
    }
}

// =============================================================================
// Partial Read Error
// =============================================================================

/// Error from a socket read that may already have moved data
///
/// When the RX pointer write-back or the RECV command fails, the bytes have
/// already been copied into the caller's buffer. `transferred` reports how
/// many, so the caller does not lose track of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReadError {
    /// Bytes copied into the destination before the failure
    pub transferred: usize,
    /// The failure
    pub error: Error,
}

impl core::fmt::Display for ReadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} (after {} bytes)", self.error, self.transferred)
    }
}

impl From<Error> for ReadError {
    fn from(error: Error) -> Self {
        Self {
            transferred: 0,
            error,
        }
    }
}

impl From<BusError> for ReadError {
    fn from(e: BusError) -> Self {
        Error::from(e).into()
    }
}

impl From<SocketError> for ReadError {
    fn from(e: SocketError) -> Self {
        Error::from(e).into()
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for bus operations
pub type BusResult<T> = core::result::Result<T, BusError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for socket operations
pub type SocketResult<T> = core::result::Result<T, SocketError>;

// =============================================================================
// Unit Tests
// =============================================================================
