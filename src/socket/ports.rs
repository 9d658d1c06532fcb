//! Ephemeral source ports
//!
//! Opening a socket on port 0 draws a port from the dynamic range
//! `49152..65535`. The randomness is supplied by the caller through
//! [`RandomSource`] so targets can plug in a hardware RNG.

use crate::constants::{EPHEMERAL_PORT_BASE, EPHEMERAL_PORT_RANGE};

/// Source of 16-bit random values
pub trait RandomSource {
    /// Next random value
    fn next_u16(&mut self) -> u16;
}

impl<F> RandomSource for F
where
    F: FnMut() -> u16,
{
    fn next_u16(&mut self) -> u16 {
        self()
    }
}

/// Map a random value into the ephemeral port range
pub const fn ephemeral_port(random: u16) -> u16 {
    EPHEMERAL_PORT_BASE + random % EPHEMERAL_PORT_RANGE
}

/// 16-bit xorshift generator
///
/// Not cryptographic. Good enough to avoid reusing the same source port
/// across reboots when seeded from something that varies, such as the
/// MAC address or a free-running timer.
#[derive(Debug, Clone)]
pub struct XorShiftPorts {
    state: u16,
}

impl XorShiftPorts {
    /// Create a generator; a zero seed is replaced with a fixed constant
    pub const fn new(seed: u16) -> Self {
        Self {
            state: if seed == 0 { 0xACE1 } else { seed },
        }
    }
}

impl RandomSource for XorShiftPorts {
    fn next_u16(&mut self) -> u16 {
        let mut x = self.state;
        x ^= x << 7;
        x ^= x >> 9;
        x ^= x << 8;
        self.state = x;
        x
    }
}
