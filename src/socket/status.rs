//! Socket status, command, mode and interrupt codes

use crate::driver::config::Protocol;
use crate::register::socket::SN_IR_CLEAR_ALL;

// =============================================================================
// Status
// =============================================================================

/// Socket status as reported by Sn_SR
///
/// Status is never cached by the driver; every decision re-reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Socket is closed
    Closed,
    /// Opened in TCP mode, not yet listening or connecting
    Init,
    /// Waiting for a connection request
    Listen,
    /// SYN sent, waiting for SYN/ACK
    SynSent,
    /// SYN received, handshake in progress
    SynRecv,
    /// Connection established
    Established,
    /// Local close in progress
    FinWait,
    /// Simultaneous close in progress
    Closing,
    /// Waiting for the TIME_WAIT period to expire
    TimeWait,
    /// Remote side closed, local side may still send
    CloseWait,
    /// Waiting for the final ACK
    LastAck,
    /// Opened in UDP mode
    Udp,
    /// Opened in MACRAW mode
    MacRaw,
    /// Value the driver does not know
    Unknown(u8),
}

impl Status {
    /// Decode a raw Sn_SR value
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0x00 => Status::Closed,
            0x13 => Status::Init,
            0x14 => Status::Listen,
            0x15 => Status::SynSent,
            0x16 => Status::SynRecv,
            0x17 => Status::Established,
            0x18 => Status::FinWait,
            0x1A => Status::Closing,
            0x1B => Status::TimeWait,
            0x1C => Status::CloseWait,
            0x1D => Status::LastAck,
            0x22 => Status::Udp,
            0x42 => Status::MacRaw,
            other => Status::Unknown(other),
        }
    }

    /// Raw Sn_SR value
    pub const fn to_raw(self) -> u8 {
        match self {
            Status::Closed => 0x00,
            Status::Init => 0x13,
            Status::Listen => 0x14,
            Status::SynSent => 0x15,
            Status::SynRecv => 0x16,
            Status::Established => 0x17,
            Status::FinWait => 0x18,
            Status::Closing => 0x1A,
            Status::TimeWait => 0x1B,
            Status::CloseWait => 0x1C,
            Status::LastAck => 0x1D,
            Status::Udp => 0x22,
            Status::MacRaw => 0x42,
            Status::Unknown(raw) => raw,
        }
    }

    /// Data may be written in this state
    pub const fn is_writable(self) -> bool {
        matches!(self, Status::Established | Status::CloseWait)
    }

    /// An empty RX buffer in this state means no more data will arrive
    pub const fn is_end_of_stream(self) -> bool {
        matches!(self, Status::Listen | Status::Closed | Status::CloseWait)
    }
}

// =============================================================================
// Command
// =============================================================================

/// Socket command written to Sn_CR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Command {
    /// Initialize the socket in the mode set in Sn_MR
    Open = 0x01,
    /// Wait for a TCP connection request
    Listen = 0x02,
    /// Start a TCP connection to Sn_DIPR:Sn_DPORT
    Connect = 0x04,
    /// Start a graceful TCP close
    Disconnect = 0x08,
    /// Close the socket immediately
    Close = 0x10,
    /// Transmit TX buffer contents up to Sn_TX_WR
    Send = 0x20,
    /// Acknowledge RX buffer contents up to Sn_RX_RD
    Recv = 0x40,
}

impl Command {
    /// Raw Sn_CR value
    pub const fn code(self) -> u8 {
        self as u8
    }
}

// =============================================================================
// Mode
// =============================================================================

/// Socket protocol mode written to Sn_MR
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    /// TCP with delayed ACK disabled
    Tcp = 0x21,
    /// UDP
    Udp = 0x02,
}

impl Mode {
    /// Raw Sn_MR value
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<Protocol> for Mode {
    fn from(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Tcp => Mode::Tcp,
            Protocol::Udp => Mode::Udp,
        }
    }
}

// =============================================================================
// Interrupt
// =============================================================================

/// Socket interrupt flags (Sn_IR)
///
/// Sn_IR is write-1-to-clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Interrupt(u8);

impl Interrupt {
    /// Connection established
    pub const CON: Self = Self(0x01);
    /// FIN or FIN/ACK received
    pub const DISCON: Self = Self(0x02);
    /// Data received
    pub const RECV: Self = Self(0x04);
    /// ARP or TCP retransmission timeout
    pub const TIMEOUT: Self = Self(0x08);
    /// SEND command completed
    pub const SEND_OK: Self = Self(0x10);
    /// Every flag
    pub const ALL: Self = Self(SN_IR_CLEAR_ALL);

    /// Wrap a raw Sn_IR value
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw Sn_IR value
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// All flags in `other` are set
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// No flag is set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl core::ops::BitOr for Interrupt {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
