//! Bus transaction executor.
//!
//! This module defines the contract the sampler consumes for talking to
//! the device: a single atomic write-then-read exchange against one bus
//! address. Implementations may block internally (bus I/O can be slow),
//! so the sampler only ever invokes them from its background worker,
//! never from the timer context. Injecting the trait at construction
//! also lets tests drive the sampler with a scripted fake instead of
//! real hardware.

use async_trait::async_trait;

use crate::error::Result;

pub mod linux;

pub use linux::LinuxI2c;

/// One atomic two-message exchange against a bus device.
#[async_trait]
pub trait I2cBus {
    /// Write `write` to `addr`, then read `read_len` bytes from `addr`,
    /// as one transaction. Returns the bytes read.
    ///
    /// Any failure of the exchange, including a reply of unexpected
    /// length, is reported as an opaque transaction error; callers do
    /// not retry within the same poll cycle.
    async fn transact(&mut self, addr: u16, write: &[u8], read_len: usize) -> Result<Vec<u8>>;
}
