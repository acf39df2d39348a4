//! Common error types for eeprom-poller.
//!
//! This module provides a centralized Error enum using thiserror,
//! with conversions from underlying error types used throughout the crate.

use thiserror::Error;

/// Main error type for eeprom-poller operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O errors from tokio or std
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A bus exchange failed or returned the wrong amount of data.
    /// The current poll cycle is skipped; the next cycle retries.
    #[error("Bus transaction error: {0}")]
    Transaction(String),

    /// A blocking wait was aborted by shutdown before data arrived.
    /// No slot state is mutated.
    #[error("Wait interrupted")]
    Interrupted,

    /// Copying a sample out to the caller failed. The slot is left
    /// undrained so the data is not lost and the caller may retry.
    #[error("Sample transfer failed: {0}")]
    Transfer(String),

    /// Startup acquisition failed (bus device, endpoint, ...).
    #[error("Initialization error: {0}")]
    Init(String),
}

/// Convenience type alias for Results using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
