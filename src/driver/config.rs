//! Configuration types for the W5500 driver

use core::net::Ipv4Addr;
use core::str::FromStr;

use super::error::ConfigError;
use crate::constants::{DEFAULT_BUFFER_SIZE, MAC_ADDR_LEN, STARTUP_DELAY_MS};

// =============================================================================
// Protocol
// =============================================================================

/// Transport protocol of a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Protocol {
    /// TCP stream socket
    #[default]
    Tcp,
    /// UDP socket
    Udp,
}

impl FromStr for Protocol {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            _ => Err(ConfigError::UnsupportedProtocol),
        }
    }
}

// =============================================================================
// Socket Buffer Size
// =============================================================================

/// Per-socket buffer size
///
/// The W5500 has 16 KiB of TX and 16 KiB of RX memory shared by the eight
/// sockets. Each half of a socket can be given 1, 2, 4, 8 or 16 KiB. Sizes
/// are powers of two, which the circular buffer arithmetic relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum BufferSize {
    /// 1 KiB
    Kib1 = 1,
    /// 2 KiB
    #[default]
    Kib2 = 2,
    /// 4 KiB
    Kib4 = 4,
    /// 8 KiB
    Kib8 = 8,
    /// 16 KiB
    Kib16 = 16,
}

impl BufferSize {
    /// Size in bytes
    pub const fn bytes(self) -> u16 {
        (self as u16) << 10
    }

    /// Value for the Sn_TXBUF_SIZE / Sn_RXBUF_SIZE registers (size in KiB)
    pub const fn register_value(self) -> u8 {
        self as u8
    }

    /// Mask that maps a free-running pointer onto a buffer offset
    pub const fn mask(self) -> u16 {
        self.bytes() - 1
    }
}

impl TryFrom<u16> for BufferSize {
    type Error = ConfigError;

    fn try_from(bytes: u16) -> Result<Self, Self::Error> {
        match bytes {
            1024 => Ok(BufferSize::Kib1),
            2048 => Ok(BufferSize::Kib2),
            4096 => Ok(BufferSize::Kib4),
            8192 => Ok(BufferSize::Kib8),
            16384 => Ok(BufferSize::Kib16),
            _ => Err(ConfigError::InvalidBufferSize),
        }
    }
}

// =============================================================================
// Socket Configuration
// =============================================================================

/// Socket buffer configuration
///
/// Supplied when a [`Socket`](crate::socket::Socket) handle is created and
/// written to the chip on every open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SocketConfig {
    /// TX buffer size
    pub tx_buffer: BufferSize,
    /// RX buffer size
    pub rx_buffer: BufferSize,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SocketConfig {
    /// Create a configuration with the default 2 KiB buffers
    #[must_use]
    pub const fn new() -> Self {
        Self {
            tx_buffer: BufferSize::Kib2,
            rx_buffer: BufferSize::Kib2,
        }
    }

    /// Set both TX and RX buffer sizes
    #[must_use]
    pub const fn with_buffer_size(mut self, size: BufferSize) -> Self {
        self.tx_buffer = size;
        self.rx_buffer = size;
        self
    }

    /// Set the TX buffer size
    #[must_use]
    pub const fn with_tx_buffer(mut self, size: BufferSize) -> Self {
        self.tx_buffer = size;
        self
    }

    /// Set the RX buffer size
    #[must_use]
    pub const fn with_rx_buffer(mut self, size: BufferSize) -> Self {
        self.rx_buffer = size;
        self
    }
}

// =============================================================================
// Network Configuration
// =============================================================================

/// Static IPv4 network settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkConfig {
    /// Source IP address
    pub ip: Ipv4Addr,
    /// Subnet mask
    pub subnet: Ipv4Addr,
    /// Default gateway
    pub gateway: Ipv4Addr,
}

#[cfg(feature = "defmt")]
impl defmt::Format for NetworkConfig {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "NetworkConfig {{ ip: {}, subnet: {}, gateway: {} }}",
            self.ip.octets(),
            self.subnet.octets(),
            self.gateway.octets()
        );
    }
}

impl NetworkConfig {
    /// Create network settings
    pub const fn new(ip: Ipv4Addr, subnet: Ipv4Addr, gateway: Ipv4Addr) -> Self {
        Self {
            ip,
            subnet,
            gateway,
        }
    }
}

// =============================================================================
// Device Configuration
// =============================================================================

/// Configuration applied by [`W5500::configure`](crate::W5500::configure)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Time to wait before the first transaction, in milliseconds
    pub startup_delay_ms: u32,
    /// MAC address to program, if any
    pub mac_address: Option<[u8; MAC_ADDR_LEN]>,
    /// Static network settings to program, if any
    pub network: Option<NetworkConfig>,
    /// Ignore ICMP echo requests
    pub ping_block: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceConfig {
    /// Create a configuration that only resets and identifies the chip
    #[must_use]
    pub const fn new() -> Self {
        Self {
            startup_delay_ms: STARTUP_DELAY_MS,
            mac_address: None,
            network: None,
            ping_block: false,
        }
    }

    /// Set the power-on settle delay
    #[must_use]
    pub const fn with_startup_delay_ms(mut self, ms: u32) -> Self {
        self.startup_delay_ms = ms;
        self
    }

    /// Program this MAC address after identification
    #[must_use]
    pub const fn with_mac_address(mut self, mac: [u8; MAC_ADDR_LEN]) -> Self {
        self.mac_address = Some(mac);
        self
    }

    /// Program these network settings after identification
    #[must_use]
    pub const fn with_network(mut self, network: NetworkConfig) -> Self {
        self.network = Some(network);
        self
    }

    /// Enable or disable ping block
    #[must_use]
    pub const fn with_ping_block(mut self, enabled: bool) -> Self {
        self.ping_block = enabled;
        self
    }
}

const _: () = assert!(DEFAULT_BUFFER_SIZE == BufferSize::Kib2.bytes());
