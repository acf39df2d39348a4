//! Single-slot sample mailbox.
//!
//! This module provides the buffer between the poll worker and blocked
//! readers: one slot holding the most recent sample, a lock protecting
//! it, and a notifier that wakes readers when the slot fills. A new
//! sample overwrites any undrained previous one (most-recent-wins); a
//! reader drains the slot exactly once and leaves it empty.

use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::error::{Error, Result};
use crate::sample::Sample;

/// Mailbox holding zero or one undrained [`Sample`].
///
/// The slot lock is only ever held for the duration of a copy and never
/// across a suspension point. Readers park on the notifier and re-check
/// the slot after every wake, so a spurious wake or a lost race against
/// another reader re-blocks instead of returning empty data.
#[derive(Debug, Default)]
pub struct SampleSlot {
    slot: Mutex<Option<Sample>>,
    notify: Notify,
}

impl SampleSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a sample and wake all blocked readers.
    ///
    /// Overwrites any undrained previous sample. Never blocks waiting
    /// for a reader.
    pub fn produce(&self, sample: Sample) {
        *self.slot.lock() = Some(sample);
        self.notify.notify_waiters();
    }

    /// Whether the slot currently holds an undrained sample.
    pub fn has_sample(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Block until a sample is present, then drain and return it.
    ///
    /// At most one caller returns any given production; the rest keep
    /// waiting for a later one. The future is cancellation-safe: if it
    /// is dropped before completing, no slot state has been touched.
    pub async fn consume(&self) -> Sample {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        loop {
            // Register for a wakeup before checking, so a production
            // racing with the check cannot be lost.
            notified.as_mut().enable();
            if let Some(sample) = self.slot.lock().take() {
                return sample;
            }
            notified.as_mut().await;
            notified.set(self.notify.notified());
        }
    }

    /// Block until a sample is present, then copy it into `buf` and
    /// drain the slot. Returns the number of bytes copied.
    ///
    /// If `buf` is too small for the payload the slot is left undrained
    /// and a transfer error is returned, so the caller can retry with a
    /// larger buffer without losing the sample.
    pub async fn copy_out(&self, buf: &mut [u8]) -> Result<usize> {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        loop {
            notified.as_mut().enable();
            {
                let mut slot = self.slot.lock();
                if let Some(sample) = slot.as_ref() {
                    if buf.len() < sample.len() {
                        return Err(Error::Transfer(format!(
                            "buffer of {} bytes cannot hold {} byte sample",
                            buf.len(),
                            sample.len()
                        )));
                    }
                    let len = sample.len();
                    buf[..len].copy_from_slice(sample.as_bytes());
                    *slot = None;
                    return Ok(len);
                }
            }
            notified.as_mut().await;
            notified.set(self.notify.notified());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SAMPLE_LEN;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::time::timeout;

    fn sample(fill: u8) -> Sample {
        Sample::sanitize([fill; SAMPLE_LEN])
    }

    #[tokio::test(start_paused = true)]
    async fn consume_returns_produced_sample() {
        let slot = SampleSlot::new();
        slot.produce(sample(b'A'));
        assert_eq!(slot.consume().await, sample(b'A'));
    }

    #[tokio::test(start_paused = true)]
    async fn consume_drains_the_slot() {
        let slot = SampleSlot::new();
        slot.produce(sample(b'A'));
        let _ = slot.consume().await;
        assert!(!slot.has_sample());
        let again = timeout(Duration::from_millis(10), slot.consume()).await;
        assert!(again.is_err(), "drained slot must block the next reader");
    }

    #[tokio::test(start_paused = true)]
    async fn newer_production_overwrites_undrained_sample() {
        let slot = SampleSlot::new();
        slot.produce(sample(b'A'));
        slot.produce(sample(b'B'));
        assert_eq!(slot.consume().await, sample(b'B'));
        assert!(!slot.has_sample());
    }

    #[tokio::test(start_paused = true)]
    async fn blocked_reader_wakes_on_production() {
        let slot = Arc::new(SampleSlot::new());
        let reader = tokio::spawn({
            let slot = Arc::clone(&slot);
            async move { slot.consume().await }
        });
        // Let the reader park before producing.
        tokio::time::sleep(Duration::from_millis(1)).await;
        slot.produce(sample(b'Z'));
        let got = timeout(Duration::from_secs(1), reader)
            .await
            .expect("reader should wake")
            .expect("reader task should not panic");
        assert_eq!(got, sample(b'Z'));
    }

    #[tokio::test(start_paused = true)]
    async fn racing_readers_drain_each_production_once() {
        let slot = Arc::new(SampleSlot::new());
        let a = tokio::spawn({
            let slot = Arc::clone(&slot);
            async move { slot.consume().await }
        });
        let b = tokio::spawn({
            let slot = Arc::clone(&slot);
            async move { slot.consume().await }
        });
        tokio::time::sleep(Duration::from_millis(1)).await;

        // First production satisfies exactly one reader; the loser
        // re-blocks until the second.
        slot.produce(sample(b'1'));
        tokio::time::sleep(Duration::from_millis(1)).await;
        slot.produce(sample(b'2'));

        let mut got = vec![a.await.unwrap(), b.await.unwrap()];
        got.sort_by_key(|s| s.as_bytes()[0]);
        assert_eq!(got, vec![sample(b'1'), sample(b'2')]);
        assert!(!slot.has_sample());
    }

    #[tokio::test(start_paused = true)]
    async fn copy_out_into_short_buffer_keeps_sample() {
        let slot = SampleSlot::new();
        slot.produce(sample(b'K'));

        let mut short = [0u8; SAMPLE_LEN - 1];
        let err = slot.copy_out(&mut short).await;
        assert!(matches!(err, Err(Error::Transfer(_))));
        assert!(slot.has_sample(), "failed transfer must not drain");

        let mut buf = [0u8; SAMPLE_LEN];
        let n = slot.copy_out(&mut buf).await.unwrap();
        assert_eq!(n, SAMPLE_LEN);
        assert_eq!(&buf, sample(b'K').as_bytes());
        assert!(!slot.has_sample());
    }
}
