//! ISR-safe W5500 wrapper using critical sections.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::primitives::CriticalSectionCell;
use crate::driver::access::RegisterAccess;
use crate::driver::device::W5500;
use crate::driver::error::{BusError, Result};
use crate::register::Block;

/// ISR-safe W5500 wrapper using critical sections.
///
/// Each register access through [`RegisterAccess`] runs one SPI frame
/// inside `critical_section::with()`. Waits between polls happen outside
/// the critical section, so sockets on other contexts keep making progress.
///
/// # Example
///
/// ```ignore
/// static DEVICE: StaticCell<SharedW5500<Spi, Output>> = StaticCell::new();
///
/// // Bring-up waits for hundreds of milliseconds; do it before sharing.
/// let mut w5500 = W5500::new(spi, cs);
/// w5500.configure(&DeviceConfig::new(), &mut delay)?;
/// let device = DEVICE.init(SharedW5500::new(w5500));
///
/// let socket = Socket::new(device, SocketIndex::new(0).unwrap());
/// ```
pub struct SharedW5500<SPI, CS> {
    inner: CriticalSectionCell<W5500<SPI, CS>>,
}

impl<SPI, CS> SharedW5500<SPI, CS> {
    /// Wrap a controller (const, suitable for static initialization).
    pub const fn new(device: W5500<SPI, CS>) -> Self {
        Self {
            inner: CriticalSectionCell::new(device),
        }
    }

    /// Execute a closure with exclusive access to the controller.
    ///
    /// Interrupts are disabled for the duration of the closure, so keep
    /// long waits such as [`W5500::configure`] out of interrupt-sensitive
    /// phases.
    #[inline]
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&mut W5500<SPI, CS>) -> R,
    {
        self.inner.with(f)
    }

    /// Try to execute a closure, returning `None` if already borrowed.
    #[inline]
    pub fn try_with<R, F>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut W5500<SPI, CS>) -> R,
    {
        self.inner.try_with(f)
    }
}

impl<SPI, CS> RegisterAccess for SharedW5500<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    fn read(&self, block: Block, address: u16, buf: &mut [u8]) -> Result<()> {
        self.try_with(|w5500| w5500.read(block, address, buf))
            .unwrap_or(Err(BusError::Busy.into()))
    }

    fn write(&self, block: Block, address: u16, data: &[u8]) -> Result<()> {
        self.try_with(|w5500| w5500.write(block, address, data))
            .unwrap_or(Err(BusError::Busy.into()))
    }
}
