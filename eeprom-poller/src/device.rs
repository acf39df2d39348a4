//! Reader session handle.
//!
//! A [`DeviceHandle`] is the open/read/write/close surface over the
//! running sampler, the userspace analog of a character-device session.
//! Handles are cheap to clone and carry no session state of their own.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};
use crate::sample::Sample;
use crate::slot::SampleSlot;
use crate::tracing::prelude::*;

/// One reader session over the sampler's slot.
///
/// Obtained from [`Sampler::open`](crate::sampler::Sampler::open).
#[derive(Clone)]
pub struct DeviceHandle {
    slot: Arc<SampleSlot>,
    running: CancellationToken,
}

impl DeviceHandle {
    pub(crate) fn new(slot: Arc<SampleSlot>, running: CancellationToken) -> Self {
        Self { slot, running }
    }

    /// Block until a sample is available, copy it into `buf`, and clear
    /// the slot. Returns the number of bytes copied.
    ///
    /// Returns [`Error::Interrupted`] if the sampler shuts down while
    /// waiting, and [`Error::Transfer`] if `buf` cannot hold the sample,
    /// in which case the slot is NOT cleared and the call may be retried.
    pub async fn read(&self, buf: &mut [u8]) -> Result<usize> {
        trace!("Device read requested.");
        if self.running.is_cancelled() {
            return Err(Error::Interrupted);
        }
        tokio::select! {
            _ = self.running.cancelled() => Err(Error::Interrupted),
            res = self.slot.copy_out(buf) => res,
        }
    }

    /// Block until a sample is available, drain it, and return it.
    ///
    /// Returns [`Error::Interrupted`] if the sampler shuts down while
    /// waiting.
    pub async fn read_sample(&self) -> Result<Sample> {
        trace!("Device read requested.");
        if self.running.is_cancelled() {
            return Err(Error::Interrupted);
        }
        tokio::select! {
            _ = self.running.cancelled() => Err(Error::Interrupted),
            sample = self.slot.consume() => Ok(sample),
        }
    }

    /// Accept a write. The data is discarded; the full length is
    /// reported as written and no sampler state changes.
    pub fn write(&self, data: &[u8]) -> usize {
        debug!(len = data.len(), "Device write accepted and ignored.");
        data.len()
    }

    /// Release the session. Nothing to tear down.
    pub fn close(self) {
        debug!("Device session closed.");
    }
}
