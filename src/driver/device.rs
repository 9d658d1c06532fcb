//! W5500 chip controller
//!
//! [`W5500`] owns the SPI transport and exposes block/offset register
//! access, the reset and identification sequence, and typed accessors for
//! the common register block. The chip keeps all state; the controller
//! keeps none beyond the bus handles.

use core::net::Ipv4Addr;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::config::{DeviceConfig, NetworkConfig};
use super::error::{ConfigError, Result};
use crate::constants::{MAC_ADDR_LEN, POLL_INTERVAL_MS, RESET_POLL_ATTEMPTS};
use crate::hal::spi::SpiTransport;
use crate::register::Block;
use crate::register::common::{
    CHIP_VERSION, FINGERPRINT_SEQUENCE, GAR, IPV4_LEN, MR, PHYCFGR, SHAR, SIPR, SUBR, VERSIONR,
    mr, phycfgr,
};

// =============================================================================
// PHY Status
// =============================================================================

/// Link state reported by the integrated PHY
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PhyStatus {
    /// Link is up
    pub link_up: bool,
    /// Link runs at 100 Mbps (10 Mbps otherwise)
    pub speed_100: bool,
    /// Link is full duplex
    pub full_duplex: bool,
}

impl PhyStatus {
    /// Decode the PHYCFGR register
    pub const fn from_register(value: u8) -> Self {
        Self {
            link_up: value & phycfgr::LNK != 0,
            speed_100: value & phycfgr::SPD != 0,
            full_duplex: value & phycfgr::DPX != 0,
        }
    }
}

// =============================================================================
// Chip Controller
// =============================================================================

/// W5500 chip controller
///
/// # Type Parameters
/// * `SPI` - Exclusive SPI bus (mode 0, MSB first, see [`crate::constants::SPI_MODE`])
/// * `CS` - Chip-select output pin, active low
///
/// Every access is one chip-select framed transaction. To share the
/// controller between [`Socket`](crate::socket::Socket) handles, wrap it in a
/// `RefCell` or, with the `critical-section` feature, a
/// [`SharedW5500`](crate::sync::SharedW5500).
#[derive(Debug)]
pub struct W5500<SPI, CS> {
    transport: SpiTransport<SPI, CS>,
}

impl<SPI, CS> W5500<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    /// Create a controller from a bus and chip-select pin
    ///
    /// No bus traffic happens until [`W5500::configure`].
    pub const fn new(spi: SPI, cs: CS) -> Self {
        Self {
            transport: SpiTransport::new(spi, cs),
        }
    }

    /// Release the bus and chip-select pin
    pub fn release(self) -> (SPI, CS) {
        self.transport.release()
    }

    /// Bring the chip up
    ///
    /// Drives chip select idle, waits the configured settle time, resets and
    /// identifies the chip, then programs the optional MAC address, network
    /// settings and ping block.
    ///
    /// The SPI bus itself must already be set up by the HAL for
    /// [`SPI_MODE`](crate::constants::SPI_MODE), MSB first, at no more than
    /// [`MAX_SPI_FREQUENCY_HZ`](crate::constants::MAX_SPI_FREQUENCY_HZ).
    pub fn configure<D: DelayNs>(&mut self, config: &DeviceConfig, delay: &mut D) -> Result<()> {
        self.transport.deselect()?;
        if config.startup_delay_ms > 0 {
            delay.delay_ms(config.startup_delay_ms);
        }

        self.identify(delay)?;

        if let Some(mac) = config.mac_address {
            self.set_mac_address(mac)?;
        }
        if let Some(network) = config.network {
            self.set_network(&network)?;
        }
        if config.ping_block {
            self.set_ping_block(true)?;
        }

        #[cfg(feature = "defmt")]
        defmt::info!("W5500 configured");

        Ok(())
    }

    /// Reset the chip and verify it is a W5500
    ///
    /// Performs a soft reset, round-trips [`FINGERPRINT_SEQUENCE`] through the
    /// mode register and checks the version register.
    pub fn identify<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        self.reset(delay)?;

        for value in FINGERPRINT_SEQUENCE {
            self.write_u8(Block::Common, MR, value)?;
            let readback = self.read_u8(Block::Common, MR)?;
            if readback != value {
                #[cfg(feature = "defmt")]
                defmt::warn!(
                    "MR fingerprint mismatch: wrote {=u8:#x}, read {=u8:#x}",
                    value,
                    readback
                );
                return Err(ConfigError::ChipNotDetected.into());
            }
        }

        let version = self.version()?;
        if version != CHIP_VERSION {
            #[cfg(feature = "defmt")]
            defmt::warn!("unexpected VERSIONR {=u8:#x}", version);
            return Err(ConfigError::UnsupportedVersion(version).into());
        }

        Ok(())
    }

    /// Soft reset the chip
    ///
    /// Sets MR.RST and polls MR until the chip clears it.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        self.write_u8(Block::Common, MR, mr::RST)?;

        for _ in 0..RESET_POLL_ATTEMPTS {
            if self.read_u8(Block::Common, MR)? == 0x00 {
                return Ok(());
            }
            delay.delay_ms(POLL_INTERVAL_MS);
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("soft reset did not complete");
        Err(ConfigError::ResetTimeout.into())
    }

    /// Read the chip version register
    pub fn version(&mut self) -> Result<u8> {
        self.read_u8(Block::Common, VERSIONR)
    }

    // =========================================================================
    // Raw Access
    // =========================================================================

    /// Read `buf.len()` bytes at `address` in `block`
    pub fn read(&mut self, block: Block, address: u16, buf: &mut [u8]) -> Result<()> {
        Ok(self.transport.read(block, address, buf)?)
    }

    /// Write `data` at `address` in `block`
    pub fn write(&mut self, block: Block, address: u16, data: &[u8]) -> Result<()> {
        Ok(self.transport.write(block, address, data)?)
    }

    /// Read one byte
    pub fn read_u8(&mut self, block: Block, address: u16) -> Result<u8> {
        let mut buf = [0u8; 1];
        self.read(block, address, &mut buf)?;
        Ok(buf[0])
    }

    /// Read a big-endian 16-bit register
    pub fn read_u16(&mut self, block: Block, address: u16) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read(block, address, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Write one byte
    pub fn write_u8(&mut self, block: Block, address: u16, value: u8) -> Result<()> {
        self.write(block, address, &[value])
    }

    /// Write a big-endian 16-bit register
    pub fn write_u16(&mut self, block: Block, address: u16, value: u16) -> Result<()> {
        self.write(block, address, &value.to_be_bytes())
    }

    // =========================================================================
    // Common Registers
    // =========================================================================

    fn read_ipv4(&mut self, address: u16) -> Result<Ipv4Addr> {
        let mut octets = [0u8; IPV4_LEN];
        self.read(Block::Common, address, &mut octets)?;
        Ok(Ipv4Addr::from(octets))
    }

    /// Set the source IP address
    pub fn set_ip_address(&mut self, ip: Ipv4Addr) -> Result<()> {
        self.write(Block::Common, SIPR, &ip.octets())
    }

    /// Read the source IP address
    pub fn ip_address(&mut self) -> Result<Ipv4Addr> {
        self.read_ipv4(SIPR)
    }

    /// Set the default gateway
    pub fn set_gateway(&mut self, gateway: Ipv4Addr) -> Result<()> {
        self.write(Block::Common, GAR, &gateway.octets())
    }

    /// Read the default gateway
    pub fn gateway(&mut self) -> Result<Ipv4Addr> {
        self.read_ipv4(GAR)
    }

    /// Set the subnet mask
    pub fn set_subnet_mask(&mut self, mask: Ipv4Addr) -> Result<()> {
        self.write(Block::Common, SUBR, &mask.octets())
    }

    /// Read the subnet mask
    pub fn subnet_mask(&mut self) -> Result<Ipv4Addr> {
        self.read_ipv4(SUBR)
    }

    /// Set the MAC address
    pub fn set_mac_address(&mut self, mac: [u8; MAC_ADDR_LEN]) -> Result<()> {
        self.write(Block::Common, SHAR, &mac)
    }

    /// Read the MAC address
    pub fn mac_address(&mut self) -> Result<[u8; MAC_ADDR_LEN]> {
        let mut mac = [0u8; MAC_ADDR_LEN];
        self.read(Block::Common, SHAR, &mut mac)?;
        Ok(mac)
    }

    /// Program IP address, subnet mask and gateway
    pub fn set_network(&mut self, network: &NetworkConfig) -> Result<()> {
        self.set_ip_address(network.ip)?;
        self.set_subnet_mask(network.subnet)?;
        self.set_gateway(network.gateway)
    }

    /// Read IP address, subnet mask and gateway
    pub fn network(&mut self) -> Result<NetworkConfig> {
        Ok(NetworkConfig {
            ip: self.ip_address()?,
            subnet: self.subnet_mask()?,
            gateway: self.gateway()?,
        })
    }

    /// Enable or disable ping block in the mode register
    pub fn set_ping_block(&mut self, enabled: bool) -> Result<()> {
        let mode = self.read_u8(Block::Common, MR)?;
        let mode = if enabled { mode | mr::PB } else { mode & !mr::PB };
        self.write_u8(Block::Common, MR, mode)
    }

    /// Read the PHY link state
    pub fn phy_status(&mut self) -> Result<PhyStatus> {
        Ok(PhyStatus::from_register(self.read_u8(Block::Common, PHYCFGR)?))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
