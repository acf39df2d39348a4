//! Userspace EEPROM polling daemon.
//!
//! Polls a byte-oriented device over I2C once per second on a dedicated
//! background worker, keeps the most recent sanitized reading in a
//! single-slot mailbox, and serves it to blocking readers over an HTTP
//! API. Each poll is one two-message bus transaction: a 2-byte offset
//! select followed by a fixed-length read.

pub mod api;
pub mod bus;
pub mod config;
pub mod device;
pub mod error;
pub mod sample;
pub mod sampler;
pub mod slot;
pub mod tracing;
