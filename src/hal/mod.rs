//! Hardware Abstraction Layer
//!
//! This module holds the bus-level pieces that sit between the driver and
//! the `embedded-hal` traits supplied by the target HAL.
//!
//! # Modules
//!
//! - [`spi`]: SPI frame transport (header + data phase under chip select)
//!
//! # Delay Integration
//!
//! All operations that wait on the chip take an `embedded_hal::delay::DelayNs`
//! argument. Pass any delay implementation from your HAL.

pub mod spi;

pub use spi::SpiTransport;
