//! Centralized Constants
//!
//! Single source of truth for timing budgets and defaults used by the
//! driver.
//!
//! # Organization
//!
//! - **SPI bus**: clock and mode requirements of the W5500
//! - **Timing**: poll intervals and retry budgets of every busy-wait loop
//! - **Sockets**: buffer sizes and ephemeral port range
//!
//! Register offsets and bit values live in [`crate::register`].

use embedded_hal::spi::{MODE_0, Mode};

// =============================================================================
// SPI Bus
// =============================================================================

/// SPI mode required by the W5500 (CPOL = 0, CPHA = 0)
///
/// Mode 3 also works on the chip; mode 0 is what this driver is tested with.
pub const SPI_MODE: Mode = MODE_0;

/// Recommended maximum SCLK frequency in Hz
///
/// The datasheet guarantees 33.3 MHz in theory, but most boards with flying
/// leads are reliable only up to about 8 MHz.
pub const MAX_SPI_FREQUENCY_HZ: u32 = 8_000_000;

// =============================================================================
// Timing
// =============================================================================

/// Default settle time after power-on before the first transaction
pub const STARTUP_DELAY_MS: u32 = 600;

/// Interval between polls of any hardware register
pub const POLL_INTERVAL_MS: u32 = 1;

/// Number of MR polls waiting for a soft reset to complete
pub const RESET_POLL_ATTEMPTS: u32 = 20;

/// Number of Sn_CR polls waiting for a command to be accepted
pub const COMMAND_POLL_ATTEMPTS: u32 = 10;

/// Time allowed for a TCP connect to reach ESTABLISHED
// TODO: make this a per-socket setting once SocketConfig grows a timeout field.
pub const CONNECT_TIMEOUT_MS: u32 = 5_000;

/// Time allowed for TX free space and SEND_OK while writing
pub const SEND_TIMEOUT_MS: u32 = 5_000;

// =============================================================================
// Sockets
// =============================================================================

/// Default TX and RX buffer size per socket in bytes
pub const DEFAULT_BUFFER_SIZE: u16 = 2048;

/// Total TX (and RX) buffer memory shared by all sockets in bytes
pub const TOTAL_BUFFER_MEMORY: usize = 16 * 1024;

/// First port of the IANA dynamic/private range
pub const EPHEMERAL_PORT_BASE: u16 = 49152;

/// Number of ports the driver picks ephemeral ports from
pub const EPHEMERAL_PORT_RANGE: u16 = 16383;

// =============================================================================
// MAC Address
// =============================================================================

/// MAC address length in bytes
pub const MAC_ADDR_LEN: usize = 6;
