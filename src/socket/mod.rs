//! Hardware sockets
//!
//! A [`Socket`] is a value handle: a socket index, its buffer configuration
//! and a shared reference to the controller. All socket state lives in the
//! chip and is re-read before every decision, so handles can be copied and
//! dropped freely. Dropping a handle does not close the socket.
//!
//! # State machine
//!
//! ```text
//!            open                listen
//!  CLOSED ─────────► INIT ─────────────────► LISTEN ──► ESTABLISHED
//!    ▲                 │   connect                         ▲
//!    │                 └──────────► SYN_SENT ──────────────┘
//!    │  close / disconnect / remote close
//!    └───────────────────────────────── ESTABLISHED, CLOSE_WAIT, ...
//! ```
//!
//! # Stream I/O
//!
//! [`Socket::read`] and [`Socket::write`] move bytes through the socket's
//! circular RX and TX buffers. Reads never block: an empty buffer reports
//! [`Received::Pending`] or, once the peer is gone, [`Received::EndOfStream`].
//! Writes wait, bounded, for buffer space and for the chip to finish
//! sending.

mod buffer;
mod ports;
mod status;

use core::net::Ipv4Addr;

use embedded_hal::delay::DelayNs;

pub use buffer::{rx_address, tx_address};
pub use ports::{RandomSource, XorShiftPorts, ephemeral_port};
pub use status::{Command, Interrupt, Mode, Status};

use crate::constants::{
    COMMAND_POLL_ATTEMPTS, CONNECT_TIMEOUT_MS, POLL_INTERVAL_MS, SEND_TIMEOUT_MS,
};
use crate::driver::access::RegisterAccess;
use crate::driver::config::{Protocol, SocketConfig};
use crate::driver::error::{ConfigError, ReadError, Result, SocketError};
use crate::register::{Block, SOCKET_COUNT};
use crate::register::socket::{
    SN_CR, SN_DIPR, SN_DPORT, SN_IR, SN_MR, SN_PORT, SN_RX_RD, SN_RX_RSR, SN_RXBUF_SIZE, SN_SR,
    SN_TX_FSR, SN_TX_WR, SN_TXBUF_SIZE,
};

// =============================================================================
// Socket Index
// =============================================================================

/// Hardware socket number, `0..8`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocketIndex(u8);

impl SocketIndex {
    /// Create an index, `None` if out of range
    pub const fn new(index: u8) -> Option<Self> {
        if index < SOCKET_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Socket number
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Register block of this socket
    pub const fn registers(self) -> Block {
        Block::Socket(self.0)
    }

    /// TX buffer block of this socket
    pub const fn tx_buffer(self) -> Block {
        Block::TxBuffer(self.0)
    }

    /// RX buffer block of this socket
    pub const fn rx_buffer(self) -> Block {
        Block::RxBuffer(self.0)
    }

    /// Every socket index in order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..SOCKET_COUNT).map(Self)
    }
}

impl TryFrom<u8> for SocketIndex {
    type Error = ConfigError;

    fn try_from(index: u8) -> core::result::Result<Self, Self::Error> {
        Self::new(index).ok_or(ConfigError::InvalidSocketIndex)
    }
}

// =============================================================================
// Read Outcome
// =============================================================================

/// Outcome of a non-blocking [`Socket::read`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Received {
    /// This many bytes were copied into the buffer
    Bytes(usize),
    /// Nothing buffered yet; poll again
    Pending,
    /// Nothing buffered and the connection will not deliver more
    EndOfStream,
}

// =============================================================================
// Socket Handle
// =============================================================================

/// Handle to one hardware socket
///
/// `A` is the shared controller: a `RefCell<W5500<..>>` or a
/// [`SharedW5500`](crate::sync::SharedW5500).
///
/// ```ignore
/// let device = RefCell::new(w5500);
/// let socket = Socket::new(&device, SocketIndex::new(0).unwrap());
///
/// socket.open(Protocol::Tcp, 0, &mut ports, &mut delay)?;
/// socket.connect(Ipv4Addr::new(192, 168, 1, 2), 80, &mut delay)?;
/// socket.write(b"GET / HTTP/1.0\r\n\r\n", &mut delay)?;
/// ```
pub struct Socket<'a, A: ?Sized> {
    device: &'a A,
    index: SocketIndex,
    config: SocketConfig,
}

impl<A: ?Sized> Clone for Socket<'_, A> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<A: ?Sized> Copy for Socket<'_, A> {}

impl<A: ?Sized> core::fmt::Debug for Socket<'_, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Socket")
            .field("index", &self.index)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<'a, A> Socket<'a, A>
where
    A: RegisterAccess + ?Sized,
{
    /// Create a handle with the default 2 KiB buffers
    pub const fn new(device: &'a A, index: SocketIndex) -> Self {
        Self::with_config(device, index, SocketConfig::new())
    }

    /// Create a handle with explicit buffer sizes
    pub const fn with_config(device: &'a A, index: SocketIndex, config: SocketConfig) -> Self {
        Self {
            device,
            index,
            config,
        }
    }

    /// Socket number
    pub const fn index(&self) -> SocketIndex {
        self.index
    }

    /// Buffer configuration
    pub const fn config(&self) -> SocketConfig {
        self.config
    }

    // =========================================================================
    // Register Helpers
    // =========================================================================

    fn read_u8(&self, offset: u16) -> Result<u8> {
        self.device.read_u8(self.index.registers(), offset)
    }

    fn read_u16(&self, offset: u16) -> Result<u16> {
        self.device.read_u16(self.index.registers(), offset)
    }

    fn write_u8(&self, offset: u16, value: u8) -> Result<()> {
        self.device.write_u8(self.index.registers(), offset, value)
    }

    fn write_u16(&self, offset: u16, value: u16) -> Result<()> {
        self.device.write_u16(self.index.registers(), offset, value)
    }

    /// Current status (Sn_SR)
    pub fn status(&self) -> Result<Status> {
        Ok(Status::from_raw(self.read_u8(SN_SR)?))
    }

    /// Pending interrupt flags (Sn_IR)
    pub fn interrupt(&self) -> Result<Interrupt> {
        Ok(Interrupt::from_bits(self.read_u8(SN_IR)?))
    }

    /// Clear interrupt flags
    pub fn clear_interrupt(&self, flags: Interrupt) -> Result<()> {
        self.write_u8(SN_IR, flags.bits())
    }

    /// Source port (Sn_PORT)
    pub fn local_port(&self) -> Result<u16> {
        self.read_u16(SN_PORT)
    }

    /// Bytes waiting in the RX buffer (Sn_RX_RSR)
    pub fn received_size(&self) -> Result<u16> {
        self.read_u16(SN_RX_RSR)
    }

    /// Free bytes in the TX buffer (Sn_TX_FSR)
    pub fn free_size(&self) -> Result<u16> {
        self.read_u16(SN_TX_FSR)
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// Issue a command and wait for the chip to accept it
    ///
    /// Sn_CR clears once the chip has taken the command. It is polled up to
    /// [`COMMAND_POLL_ATTEMPTS`] times, [`POLL_INTERVAL_MS`] apart.
    pub fn exec_command<D: DelayNs>(&self, command: Command, delay: &mut D) -> Result<()> {
        self.write_u8(SN_CR, command.code())?;

        for _ in 0..COMMAND_POLL_ATTEMPTS {
            let raw = self.read_u8(SN_CR)?;
            if raw == 0x00 {
                return Ok(());
            }
            if raw != command.code() {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "socket {}: Sn_CR reads {=u8:#x} after {}",
                    self.index.get(),
                    raw,
                    command
                );
                return Err(SocketError::InvalidCommandState(raw).into());
            }
            delay.delay_ms(POLL_INTERVAL_MS);
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("socket {}: {} timed out", self.index.get(), command);
        Err(SocketError::CommandTimeout(command).into())
    }

    /// Open the socket
    ///
    /// Programs the buffer sizes, closes the socket first if it is not
    /// CLOSED, then sets the mode, clears all interrupt flags, sets the
    /// source port and issues OPEN. Port 0 picks an ephemeral port from
    /// `random`.
    pub fn open<R, D>(
        &self,
        protocol: Protocol,
        port: u16,
        random: &mut R,
        delay: &mut D,
    ) -> Result<()>
    where
        R: RandomSource + ?Sized,
        D: DelayNs,
    {
        self.write_u8(SN_TXBUF_SIZE, self.config.tx_buffer.register_value())?;
        self.write_u8(SN_RXBUF_SIZE, self.config.rx_buffer.register_value())?;

        let status = self.status()?;
        if status != Status::Closed {
            #[cfg(feature = "defmt")]
            defmt::warn!("socket {}: open while {}, closing", self.index.get(), status);
            self.close(delay)?;
        }

        self.write_u8(SN_MR, Mode::from(protocol).code())?;
        self.clear_interrupt(Interrupt::ALL)?;

        let port = if port == 0 {
            ephemeral_port(random.next_u16())
        } else {
            port
        };
        self.write_u16(SN_PORT, port)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("socket {}: open {} port {}", self.index.get(), protocol, port);

        self.exec_command(Command::Open, delay)
    }

    /// Listen for an incoming TCP connection
    ///
    /// The socket must be in INIT.
    pub fn listen<D: DelayNs>(&self, delay: &mut D) -> Result<()> {
        let status = self.status()?;
        if status != Status::Init {
            return Err(SocketError::InvalidState(status).into());
        }
        self.exec_command(Command::Listen, delay)
    }

    /// Connect to a remote TCP endpoint
    ///
    /// The socket must be in INIT. Blocks until the connection is
    /// ESTABLISHED, polling every [`POLL_INTERVAL_MS`] for at most
    /// [`CONNECT_TIMEOUT_MS`].
    pub fn connect<D: DelayNs>(&self, ip: Ipv4Addr, port: u16, delay: &mut D) -> Result<()> {
        let status = self.status()?;
        if status != Status::Init {
            return Err(SocketError::InvalidState(status).into());
        }

        self.device
            .write(self.index.registers(), SN_DIPR, &ip.octets())?;
        self.write_u16(SN_DPORT, port)?;
        self.exec_command(Command::Connect, delay)?;

        let mut elapsed_ms = 0u32;
        loop {
            match self.status()? {
                Status::Established => return Ok(()),
                Status::Closed => return Err(SocketError::ConnectionRefused.into()),
                _ => {}
            }

            if elapsed_ms >= CONNECT_TIMEOUT_MS {
                #[cfg(feature = "defmt")]
                defmt::warn!("socket {}: connect timed out", self.index.get());
                return Err(SocketError::ConnectTimeout.into());
            }

            delay.delay_ms(POLL_INTERVAL_MS);
            elapsed_ms += POLL_INTERVAL_MS;
        }
    }

    /// Start a graceful TCP close
    pub fn disconnect<D: DelayNs>(&self, delay: &mut D) -> Result<()> {
        self.exec_command(Command::Disconnect, delay)
    }

    /// Close the socket immediately
    pub fn close<D: DelayNs>(&self, delay: &mut D) -> Result<()> {
        self.exec_command(Command::Close, delay)
    }

    // =========================================================================
    // Stream I/O
    // =========================================================================

    /// Read buffered bytes into `buf`
    ///
    /// Copies at most `buf.len()` bytes, advances Sn_RX_RD and issues RECV.
    /// If the pointer write-back or RECV fails after data was copied, the
    /// error carries the number of bytes already in `buf`.
    pub fn read<D: DelayNs>(
        &self,
        buf: &mut [u8],
        delay: &mut D,
    ) -> core::result::Result<Received, ReadError> {
        if buf.is_empty() {
            return Ok(Received::Bytes(0));
        }

        let available = self.received_size()?;
        if available == 0 {
            return if self.status()?.is_end_of_stream() {
                Ok(Received::EndOfStream)
            } else {
                Ok(Received::Pending)
            };
        }

        let len = usize::from(available).min(buf.len());
        let ptr = self.read_u16(SN_RX_RD)?;
        let address = rx_address(ptr, self.index, self.config.rx_buffer);
        self.device
            .read(self.index.rx_buffer(), address, &mut buf[..len])?;

        let transferred = |error| ReadError {
            transferred: len,
            error,
        };
        // len <= available, so it fits in u16
        self.write_u16(SN_RX_RD, ptr.wrapping_add(len as u16))
            .map_err(transferred)?;
        self.exec_command(Command::Recv, delay)
            .map_err(transferred)?;

        Ok(Received::Bytes(len))
    }

    /// Send `data` and wait until the chip reports SEND_OK
    ///
    /// `data` must fit in the TX buffer. Returns the number of bytes sent,
    /// which is always `data.len()`. An empty `data` still requires a
    /// writable socket but issues no SEND.
    pub fn write<D: DelayNs>(&self, data: &[u8], delay: &mut D) -> Result<usize> {
        if data.len() > usize::from(self.config.tx_buffer.bytes()) {
            return Err(SocketError::PayloadTooLarge.into());
        }
        // checked above against a u16 buffer size
        let len = data.len() as u16;

        let status = self.status()?;
        if !status.is_writable() {
            return Err(SocketError::WriteOnClosedSocket(status).into());
        }
        if data.is_empty() {
            return Ok(0);
        }

        self.wait_free_space(len, delay)?;

        let ptr = self.read_u16(SN_TX_WR)?;
        let address = tx_address(ptr, self.index, self.config.tx_buffer);
        self.device.write(self.index.tx_buffer(), address, data)?;
        self.write_u16(SN_TX_WR, ptr.wrapping_add(len))?;

        self.exec_command(Command::Send, delay)?;
        self.wait_send_ok(delay)?;

        Ok(data.len())
    }

    fn wait_free_space<D: DelayNs>(&self, len: u16, delay: &mut D) -> Result<()> {
        let mut elapsed_ms = 0u32;
        loop {
            let free = self.free_size()?;
            if !self.status()?.is_writable() {
                return Err(SocketError::RemoteClosed.into());
            }
            if free >= len {
                return Ok(());
            }
            if elapsed_ms >= SEND_TIMEOUT_MS {
                return Err(SocketError::SendTimeout.into());
            }
            delay.delay_ms(POLL_INTERVAL_MS);
            elapsed_ms += POLL_INTERVAL_MS;
        }
    }

    fn wait_send_ok<D: DelayNs>(&self, delay: &mut D) -> Result<()> {
        let mut elapsed_ms = 0u32;
        loop {
            if self.interrupt()?.contains(Interrupt::SEND_OK) {
                return self.clear_interrupt(Interrupt::SEND_OK);
            }
            if self.status()? == Status::Closed {
                return Err(SocketError::SocketClosedDuringWrite.into());
            }
            if elapsed_ms >= SEND_TIMEOUT_MS {
                #[cfg(feature = "defmt")]
                defmt::warn!("socket {}: SEND_OK timed out", self.index.get());
                return Err(SocketError::SendTimeout.into());
            }
            delay.delay_ms(POLL_INTERVAL_MS);
            elapsed_ms += POLL_INTERVAL_MS;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
