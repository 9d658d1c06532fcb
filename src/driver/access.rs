//! Shared register access
//!
//! [`Socket`](crate::socket::Socket) handles only hold a shared reference
//! to the controller. [`RegisterAccess`] is the `&self` view of the
//! controller they use; each call takes the lock for exactly one SPI frame,
//! so accesses from different handles never interleave on the bus.

use core::cell::RefCell;

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::device::W5500;
use super::error::{BusError, Result};
use crate::register::Block;

/// Lock-guarded register access to a W5500
pub trait RegisterAccess {
    /// Read `buf.len()` bytes at `address` in `block`
    fn read(&self, block: Block, address: u16, buf: &mut [u8]) -> Result<()>;

    /// Write `data` at `address` in `block`
    fn write(&self, block: Block, address: u16, data: &[u8]) -> Result<()>;

    /// Read one byte
    fn read_u8(&self, block: Block, address: u16) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read(block, address, &mut buf)?;
        Ok(buf[0])
    }

    /// Read a big-endian 16-bit register
    fn read_u16(&self, block: Block, address: u16) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read(block, address, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Write one byte
    fn write_u8(&self, block: Block, address: u16, value: u8) -> Result<()> {
        self.write(block, address, &[value])
    }

    /// Write a big-endian 16-bit register
    fn write_u16(&self, block: Block, address: u16, value: u16) -> Result<()> {
        self.write(block, address, &value.to_be_bytes())
    }
}

/// Single-context sharing
///
/// Re-entrant use from the same context fails with [`BusError::Busy`].
impl<SPI, CS> RegisterAccess for RefCell<W5500<SPI, CS>>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    fn read(&self, block: Block, address: u16, buf: &mut [u8]) -> Result<()> {
        self.try_borrow_mut()
            .map_err(|_| BusError::Busy)?
            .read(block, address, buf)
    }

    fn write(&self, block: Block, address: u16, data: &[u8]) -> Result<()> {
        self.try_borrow_mut()
            .map_err(|_| BusError::Busy)?
            .write(block, address, data)
    }
}
