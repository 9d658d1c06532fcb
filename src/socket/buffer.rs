//! Circular buffer addressing
//!
//! Sn_TX_WR, Sn_TX_RD and Sn_RX_RD are free-running 16-bit pointers. The
//! chip masks them onto the socket's buffer memory itself, so the driver
//! only has to produce an address inside the right window of the TX or RX
//! block.

use super::SocketIndex;
use crate::driver::config::BufferSize;
use crate::register::socket::RX_BASE;

/// Address in the RX buffer block for read pointer `ptr`
///
/// The pointer is reduced modulo the buffer size and offset into the
/// socket's slot above [`RX_BASE`].
pub const fn rx_address(ptr: u16, index: SocketIndex, size: BufferSize) -> u16 {
    let base = RX_BASE.wrapping_add((index.get() as u16).wrapping_mul(size.bytes()));
    (ptr & size.mask()).wrapping_add(base)
}

/// Address in the TX buffer block for write pointer `ptr`
///
/// Unlike [`rx_address`] the pointer is not masked; the chip wraps it.
pub const fn tx_address(ptr: u16, index: SocketIndex, size: BufferSize) -> u16 {
    ptr.wrapping_add((index.get() as u16).wrapping_mul(size.bytes()))
}
