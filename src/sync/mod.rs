//! Synchronization Support
//!
//! Critical-section protected sharing of one [`W5500`](crate::W5500)
//! between several [`Socket`](crate::socket::Socket) handles and
//! interrupt handlers:
//!
//! - [`CriticalSectionCell`] - ISR-safe interior mutability
//! - [`SharedW5500`] - controller wrapper implementing
//!   [`RegisterAccess`](crate::RegisterAccess)
//!
//! For a single execution context a plain `RefCell<W5500<..>>` does the
//! same job without disabling interrupts.
//!
//! # Feature Flags
//!
//! - `critical-section`: enables this module

mod primitives;
mod shared;

pub use primitives::CriticalSectionCell;
pub use shared::SharedW5500;
