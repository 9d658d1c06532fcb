//! Socket register block (block selector `n*4+1`)
//!
//! Every socket has an identical register layout; the block selector picks
//! the socket. Multi-byte registers are big-endian.

/// Socket mode register (1 byte)
pub const SN_MR: u16 = 0x0000;
/// Socket command register (1 byte)
pub const SN_CR: u16 = 0x0001;
/// Socket interrupt register (1 byte, write 1 to clear)
pub const SN_IR: u16 = 0x0002;
/// Socket status register (1 byte)
pub const SN_SR: u16 = 0x0003;
/// Source port (2 bytes)
pub const SN_PORT: u16 = 0x0004;
/// Destination hardware address (6 bytes)
pub const SN_DHAR: u16 = 0x0006;
/// Destination IP address (4 bytes)
pub const SN_DIPR: u16 = 0x000C;
/// Destination port (2 bytes)
pub const SN_DPORT: u16 = 0x0010;
/// Maximum segment size (2 bytes)
pub const SN_MSSR: u16 = 0x0012;
/// IP type of service (1 byte)
pub const SN_TOS: u16 = 0x0015;
/// IP time to live (1 byte)
pub const SN_TTL: u16 = 0x0016;
/// RX buffer size in KiB (1 byte)
pub const SN_RXBUF_SIZE: u16 = 0x001E;
/// TX buffer size in KiB (1 byte)
pub const SN_TXBUF_SIZE: u16 = 0x001F;
/// TX free size (2 bytes)
pub const SN_TX_FSR: u16 = 0x0020;
/// TX read pointer (2 bytes)
pub const SN_TX_RD: u16 = 0x0022;
/// TX write pointer (2 bytes)
pub const SN_TX_WR: u16 = 0x0024;
/// RX received size (2 bytes)
pub const SN_RX_RSR: u16 = 0x0026;
/// RX read pointer (2 bytes)
pub const SN_RX_RD: u16 = 0x0028;
/// RX write pointer (2 bytes)
pub const SN_RX_WR: u16 = 0x002A;
/// Socket interrupt mask (1 byte)
pub const SN_IMR: u16 = 0x002C;
/// Fragment offset in IP header (2 bytes)
pub const SN_FRAG: u16 = 0x002D;
/// Keep-alive timer (1 byte)
pub const SN_KPALVTR: u16 = 0x002F;

/// Size of the socket register block
pub const SN_BLOCK_LEN: usize = 0x0030;

/// Value that clears every bit of [`SN_IR`]
pub const SN_IR_CLEAR_ALL: u8 = 0xFF;

/// Base offset added to RX buffer addresses
///
/// The chip only decodes the low bits of a buffer address (masked by the
/// socket buffer size), so this offset does not move the access.
pub const RX_BASE: u16 = 0xC000;
