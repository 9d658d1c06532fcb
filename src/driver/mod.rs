//! Core driver components for the W5500.
//!
//! This module contains the building blocks for bringing up the chip and
//! sharing it between sockets:
//!
//! - [`config`] - Configuration types and builder patterns
//! - [`error`] - Error types and result aliases
//! - [`device`] - The chip controller
//! - [`access`] - Lock-guarded `&self` register access used by sockets
//!
//! # Example
//!
//! ```ignore
//! use ph_w5500::driver::{DeviceConfig, NetworkConfig, W5500};
//!
//! let config = DeviceConfig::new()
//!     .with_mac_address([0x02, 0x00, 0x00, 0x00, 0x00, 0x01])
//!     .with_network(NetworkConfig::new(ip, subnet, gateway));
//!
//! let mut w5500 = W5500::new(spi, cs);
//! w5500.configure(&config, &mut delay)?;
//! ```

// Submodules
pub mod access;
pub mod config;
pub mod device;
pub mod error;

// Re-exports for convenience
pub use access::RegisterAccess;
pub use config::{BufferSize, DeviceConfig, NetworkConfig, Protocol, SocketConfig};
pub use device::{PhyStatus, W5500};
pub use error::{
    BusError, BusResult, ConfigError, ConfigResult, Error, ReadError, Result, SocketError,
    SocketResult,
};
