//! Common register block (block selector 0)
//!
//! Offsets are byte addresses within the common block. Multi-byte registers
//! are big-endian.

// =============================================================================
// Register Offsets
// =============================================================================

/// Mode register (1 byte)
pub const MR: u16 = 0x0000;
/// Gateway IP address (4 bytes)
pub const GAR: u16 = 0x0001;
/// Subnet mask (4 bytes)
pub const SUBR: u16 = 0x0005;
/// Source hardware (MAC) address (6 bytes)
pub const SHAR: u16 = 0x0009;
/// Source IP address (4 bytes)
pub const SIPR: u16 = 0x000F;
/// Interrupt low level timer (2 bytes)
pub const INTLEVEL: u16 = 0x0013;
/// Interrupt register (1 byte)
pub const IR: u16 = 0x0015;
/// Interrupt mask (1 byte)
pub const IMR: u16 = 0x0016;
/// Socket interrupt register (1 byte)
pub const SIR: u16 = 0x0017;
/// Socket interrupt mask (1 byte)
pub const SIMR: u16 = 0x0018;
/// PHY configuration register (1 byte)
pub const PHYCFGR: u16 = 0x002E;
/// Chip version register (1 byte)
pub const VERSIONR: u16 = 0x0039;

/// Length of an IPv4 address register
pub const IPV4_LEN: usize = 4;

// =============================================================================
// Mode Register Bits
// =============================================================================

/// Mode register bit values
pub mod mr {
    /// Software reset; self-clears once the reset completes
    pub const RST: u8 = 0x80;
    /// Wake-on-LAN
    pub const WOL: u8 = 0x20;
    /// Ping block
    pub const PB: u8 = 0x10;
    /// PPPoE mode
    pub const PPPOE: u8 = 0x08;
    /// Force ARP
    pub const FARP: u8 = 0x02;
}

/// Values written to MR after reset to fingerprint the chip
///
/// Each must read back unchanged on a W5500.
pub const FINGERPRINT_SEQUENCE: [u8; 3] = [mr::PPPOE, mr::PB, 0x00];

/// Expected content of [`VERSIONR`]
pub const CHIP_VERSION: u8 = 0x04;

// =============================================================================
// PHY Configuration Register Bits
// =============================================================================

/// PHY configuration register bit values
pub mod phycfgr {
    /// Link is up
    pub const LNK: u8 = 0x01;
    /// 100 Mbps when set, 10 Mbps when clear
    pub const SPD: u8 = 0x02;
    /// Full duplex when set
    pub const DPX: u8 = 0x04;
}
