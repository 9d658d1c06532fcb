//! W5500 register map
//!
//! The W5500 exposes a flat 16-bit address space per *block*. A transaction
//! picks the block with a 5-bit block selector carried in the SPI control
//! byte, and the offset with the two address bytes that precede it.
//!
//! | Selector | Block |
//! |----------|-------|
//! | `0` | Common registers ([`common`]) |
//! | `n*4+1` | Socket `n` registers ([`socket`]) |
//! | `n*4+2` | Socket `n` TX buffer |
//! | `n*4+3` | Socket `n` RX buffer |

pub mod common;
pub mod socket;

// =============================================================================
// Control Byte Layout
// =============================================================================

/// Shift of the block selector field in the control byte (bits 7:3)
pub const BSB_SHIFT: u8 = 3;

/// Mask of the block selector value (5 bits)
pub const BSB_MASK: u8 = 0x1F;

/// Shift of the read/write access bit (bit 2)
pub const RWB_SHIFT: u8 = 2;

/// Mask of the operation mode field (bits 1:0)
pub const OM_MASK: u8 = 0x03;

/// Number of hardware sockets
pub const SOCKET_COUNT: u8 = 8;

/// Length of the SPI frame header (address high, address low, control)
pub const HEADER_LEN: usize = 3;

// =============================================================================
// Access and Length Modes
// =============================================================================

/// Data direction of a SPI frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AccessMode {
    /// Read from the chip
    Read = 0,
    /// Write to the chip
    Write = 1,
}

/// Operation mode of a SPI frame
///
/// The driver only issues [`LengthMode::Variable`] frames; the fixed modes are
/// listed so that decoded control bytes can be represented faithfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LengthMode {
    /// Length implied by the data phase (chip select frames the transfer)
    #[default]
    Variable = 0,
    /// Fixed one-byte data phase
    Fixed1 = 1,
    /// Fixed two-byte data phase
    Fixed2 = 2,
    /// Fixed four-byte data phase
    Fixed4 = 3,
}

impl LengthMode {
    const fn from_bits(bits: u8) -> Self {
        match bits & OM_MASK {
            0 => LengthMode::Variable,
            1 => LengthMode::Fixed1,
            2 => LengthMode::Fixed2,
            _ => LengthMode::Fixed4,
        }
    }
}

// =============================================================================
// Blocks
// =============================================================================

/// Addressable block of the W5500
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Block {
    /// Common register block
    Common,
    /// Register block of socket `n`
    Socket(u8),
    /// TX buffer memory of socket `n`
    TxBuffer(u8),
    /// RX buffer memory of socket `n`
    RxBuffer(u8),
}

impl Block {
    /// 5-bit block selector value
    pub const fn selector(self) -> u8 {
        match self {
            Block::Common => 0,
            Block::Socket(n) => (n & 0x07) * 4 + 1,
            Block::TxBuffer(n) => (n & 0x07) * 4 + 2,
            Block::RxBuffer(n) => (n & 0x07) * 4 + 3,
        }
    }

    /// Block for a raw selector value
    ///
    /// Returns `None` for the reserved selectors (`n*4`, `n > 0`).
    pub const fn from_selector(selector: u8) -> Option<Self> {
        let selector = selector & BSB_MASK;
        let socket = selector / 4;
        match selector % 4 {
            0 if socket == 0 => Some(Block::Common),
            1 => Some(Block::Socket(socket)),
            2 => Some(Block::TxBuffer(socket)),
            3 => Some(Block::RxBuffer(socket)),
            _ => None,
        }
    }
}

// =============================================================================
// Control Byte Encoding
// =============================================================================

/// Encode a variable-length-mode control byte
#[inline]
pub const fn control_byte(selector: u8, access: AccessMode) -> u8 {
    ((selector & BSB_MASK) << BSB_SHIFT)
        | ((access as u8) << RWB_SHIFT)
        | LengthMode::Variable as u8
}

/// Decoded fields of a control byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlByte {
    /// Block selector
    pub selector: u8,
    /// Access direction
    pub access: AccessMode,
    /// Operation mode
    pub length: LengthMode,
}

impl ControlByte {
    /// Split a raw control byte into its fields
    pub const fn decode(raw: u8) -> Self {
        let access = if raw & (1 << RWB_SHIFT) != 0 {
            AccessMode::Write
        } else {
            AccessMode::Read
        };
        Self {
            selector: (raw >> BSB_SHIFT) & BSB_MASK,
            access,
            length: LengthMode::from_bits(raw),
        }
    }
}

/// Build the 3-byte frame header for an access
#[inline]
pub const fn frame_header(block: Block, address: u16, access: AccessMode) -> [u8; HEADER_LEN] {
    let [hi, lo] = address.to_be_bytes();
    [hi, lo, control_byte(block.selector(), access)]
}
