//! W5500 Driver
//!
//! A `no_std`, `no_alloc` Rust driver for the WIZnet W5500 hardwired TCP/IP
//! Ethernet controller.
//!
//! The W5500 runs the whole TCP/IP stack in silicon and exposes eight
//! hardware sockets through a register map reached over SPI. This crate
//! speaks the chip's SPI framing, brings the chip up, and drives each socket
//! through its command/status state machine with byte-stream reads and
//! writes over the chip's circular buffers.
//!
//! # Architecture
//!
//! 1. **Register map** ([`register`]): block selectors, control byte, offsets
//! 2. **Bus transport** ([`hal::spi`]): one chip-select framed SPI transaction per access
//! 3. **Chip controller** ([`W5500`]): reset, identification, common registers
//! 4. **Sockets** ([`socket`]): open/listen/connect/close and stream I/O
//!
//! Sockets borrow the controller through [`RegisterAccess`]. Use a
//! `RefCell<W5500<..>>` from a single context, or [`sync::SharedW5500`]
//! (feature `critical-section`) to share it with interrupt handlers.
//!
//! All waits are bounded busy-polls. Every operation that waits takes an
//! `embedded_hal::delay::DelayNs`.
//!
//! # Features
//!
//! - `defmt`: Enable defmt formatting for public types and diagnostic logging
//! - `critical-section`: Enable the ISR-safe `SharedW5500` wrapper
//!
//! # Example
//!
//! ```ignore
//! use core::cell::RefCell;
//! use core::net::Ipv4Addr;
//! use ph_w5500::{DeviceConfig, Protocol, Received, Socket, SocketIndex, W5500, XorShiftPorts};
//!
//! let mut w5500 = W5500::new(spi, cs);
//! w5500.configure(&DeviceConfig::new().with_mac_address(mac), &mut delay)?;
//! let device = RefCell::new(w5500);
//!
//! let socket = Socket::new(&device, SocketIndex::new(0).unwrap());
//! let mut ports = XorShiftPorts::new(seed);
//! socket.open(Protocol::Tcp, 0, &mut ports, &mut delay)?;
//! socket.connect(Ipv4Addr::new(192, 168, 1, 10), 80, &mut delay)?;
//! socket.write(b"GET / HTTP/1.0\r\n\r\n", &mut delay)?;
//!
//! let mut buf = [0u8; 512];
//! loop {
//!     match socket.read(&mut buf, &mut delay)? {
//!         Received::Bytes(n) => handle(&buf[..n]),
//!         Received::Pending => continue,
//!         Received::EndOfStream => break,
//!     }
//! }
//! ```

#![no_std]
#![deny(missing_docs)]
#![allow(unsafe_code)]
#![deny(unsafe_op_in_unsafe_fn)]
// Clippy lint levels live here and mirror the [lints] table in Cargo.toml.
#![deny(clippy::correctness)]
#![warn(
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::cloned_instead_of_copied,
    clippy::explicit_iter_loop,
    clippy::implicit_clone,
    clippy::inconsistent_struct_constructor,
    clippy::manual_assert,
    clippy::manual_let_else,
    clippy::match_same_arms,
    clippy::needless_pass_by_value,
    clippy::semicolon_if_nothing_returned,
    clippy::uninlined_format_args,
    clippy::unnested_or_patterns,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc,
    clippy::alloc_instead_of_core
)]
#![allow(
    clippy::mod_module_files,
    clippy::self_named_module_files,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::struct_excessive_bools,
    clippy::fn_params_excessive_bools,
    clippy::type_complexity,
    clippy::must_use_candidate,
    clippy::assertions_on_constants,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::panic_in_result_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::items_after_statements,
    clippy::let_underscore_future
)]

// =============================================================================
// Modules
// =============================================================================

pub mod constants;
pub mod driver;
pub mod hal;
pub mod register;
pub mod socket;

#[cfg(feature = "critical-section")]
#[cfg_attr(docsrs, doc(cfg(feature = "critical-section")))]
pub mod sync;

// Test utilities (only available during testing)
#[cfg(test)]
pub(crate) mod test_utils;

// =============================================================================
// Re-exports
// =============================================================================

pub use driver::access::RegisterAccess;
pub use driver::config::{BufferSize, DeviceConfig, NetworkConfig, Protocol, SocketConfig};
pub use driver::device::{PhyStatus, W5500};
pub use driver::error::{
    BusError, BusResult, ConfigError, ConfigResult, Error, ReadError, Result, SocketError,
    SocketResult,
};
pub use socket::{
    Command, Interrupt, Mode, RandomSource, Received, Socket, SocketIndex, Status, XorShiftPorts,
};

// Re-export sync types when critical-section is enabled
#[cfg(feature = "critical-section")]
pub use sync::SharedW5500;
