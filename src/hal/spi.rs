//! SPI Frame Transport
//!
//! Every W5500 access is one SPI frame: a 3-byte header (address high,
//! address low, control byte) followed by a data phase. In variable length
//! mode the chip uses the chip-select line to delimit the frame, so the
//! header and data phase must run inside a single CS-low window.
//!
//! The transport takes an exclusive [`SpiBus`] plus a separate
//! [`OutputPin`] for chip select rather than an `SpiDevice`, because the
//! frame is two bus operations of different direction that must share one
//! assertion.

use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};

use crate::driver::error::{BusError, BusResult};
use crate::register::{AccessMode, Block, frame_header};

// =============================================================================
// Frame Transport
// =============================================================================

/// SPI frame transport for the W5500
///
/// Owns the bus and the chip-select pin. Chip select is driven high (idle)
/// by [`SpiTransport::deselect`] and held low only for the duration of a
/// single frame.
#[derive(Debug)]
pub struct SpiTransport<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiTransport<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Create a transport from a bus and chip-select pin
    pub const fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Release the bus and pin
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// Drive chip select to its idle (high) level
    pub fn deselect(&mut self) -> BusResult<()> {
        self.cs.set_high().map_err(cs_error)
    }

    /// Read `buf.len()` bytes starting at `address` in `block`
    pub fn read(&mut self, block: Block, address: u16, buf: &mut [u8]) -> BusResult<()> {
        let header = frame_header(block, address, AccessMode::Read);
        self.frame(|spi| {
            spi.write(&header)?;
            spi.read(buf)
        })
    }

    /// Write `data` starting at `address` in `block`
    pub fn write(&mut self, block: Block, address: u16, data: &[u8]) -> BusResult<()> {
        let header = frame_header(block, address, AccessMode::Write);
        self.frame(|spi| {
            spi.write(&header)?;
            spi.write(data)
        })
    }

    /// Run `f` with chip select asserted
    ///
    /// The bus is flushed before chip select is released so the last byte is
    /// clocked out inside the frame. Chip select is released even if the
    /// transfer fails; the transfer error takes precedence.
    fn frame<F>(&mut self, f: F) -> BusResult<()>
    where
        F: FnOnce(&mut SPI) -> Result<(), SPI::Error>,
    {
        self.cs.set_low().map_err(cs_error)?;
        let result = f(&mut self.spi).and_then(|()| self.spi.flush());
        let released = self.cs.set_high().map_err(cs_error);
        result.map_err(spi_error)?;
        released
    }
}

fn spi_error<E: spi::Error>(e: E) -> BusError {
    BusError::Spi(e.kind())
}

fn cs_error<E: digital::Error>(e: E) -> BusError {
    BusError::ChipSelect(e.kind())
}

// =============================================================================
// Unit Tests
// =============================================================================
