//! Periodic device sampler.
//!
//! Two cooperating tasks, split so that the time-sensitive side never
//! waits on the bus: a tick task that owns the poll schedule and only
//! dispatches cycle markers, and a single poll worker that performs the
//! bus exchange, sanitizes the reply, and publishes it to the slot.
//! The schedule is fixed at start + n * period, so a slow poll never
//! delays the next tick; a tick that arrives while the worker is still
//! busy queues at most one cycle behind it and coalesces beyond that,
//! since only the latest sample matters.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::bus::I2cBus;
use crate::device::DeviceHandle;
use crate::error::{Error, Result};
use crate::sample::{Sample, SAMPLE_LEN};
use crate::slot::SampleSlot;
use crate::tracing::prelude::*;

/// Poll once per second.
pub const POLL_PERIOD: Duration = Duration::from_secs(1);

/// Address-select preamble written before each read (device offset 0).
const READ_SELECT: [u8; 2] = [0x00, 0x00];

/// Marker message dispatching one poll cycle to the worker.
struct PollCycle;

/// Running sampler service.
///
/// Owns the sample slot, the shutdown token, and both background tasks.
/// Construct with [`Sampler::start`], hand out reader sessions with
/// [`Sampler::open`], and tear down with [`Sampler::shutdown`].
pub struct Sampler {
    slot: Arc<SampleSlot>,
    running: CancellationToken,
    tasks: TaskTracker,
}

impl Sampler {
    /// Start polling `addr` on `bus` once per [`POLL_PERIOD`].
    ///
    /// The first poll fires one full period after start. The slot is
    /// empty until the first successful poll completes.
    pub fn start<B>(bus: B, addr: u16) -> Self
    where
        B: I2cBus + Send + 'static,
    {
        let slot = Arc::new(SampleSlot::new());
        let running = CancellationToken::new();
        let tasks = TaskTracker::new();

        let (cycle_tx, cycle_rx) = mpsc::channel(1);
        tasks.spawn(tick_task(POLL_PERIOD, cycle_tx, running.clone()));
        tasks.spawn(poll_task(
            bus,
            addr,
            cycle_rx,
            Arc::clone(&slot),
            running.clone(),
        ));
        tasks.close();

        info!(addr = format!("0x{:02x}", addr), "Sampler started.");
        Self {
            slot,
            running,
            tasks,
        }
    }

    /// Open a reader session. Never fails, carries no session state.
    pub fn open(&self) -> DeviceHandle {
        debug!("Device session opened.");
        DeviceHandle::new(Arc::clone(&self.slot), self.running.clone())
    }

    /// Stop the sampler.
    ///
    /// After this returns no further tick fires and no poll job runs;
    /// readers blocked in a handle are released with an interruption
    /// error.
    pub async fn shutdown(&self) {
        self.running.cancel();
        self.tasks.wait().await;
        info!("Sampler stopped.");
    }
}

/// Task owning the poll schedule.
///
/// Only re-arms the ticker and dispatches cycle markers; never touches
/// the bus. The next deadline is established by the interval schedule
/// before the current cycle is handed to the worker.
async fn tick_task(
    period: Duration,
    cycles: mpsc::Sender<PollCycle>,
    running: CancellationToken,
) {
    trace!("Tick task started.");

    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = running.cancelled() => break,
            _ = ticker.tick() => {
                match cycles.try_send(PollCycle) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => {
                        trace!("Previous poll cycle still pending, coalescing.");
                    }
                    Err(TrySendError::Closed(_)) => break,
                }
            }
        }
    }

    trace!("Tick task stopped.");
}

/// The single poll worker.
///
/// Serializes all bus exchanges for the device; a failed cycle is
/// logged and skipped, leaving any previous sample in the slot for the
/// next reader.
async fn poll_task<B>(
    mut bus: B,
    addr: u16,
    mut cycles: mpsc::Receiver<PollCycle>,
    slot: Arc<SampleSlot>,
    running: CancellationToken,
) where
    B: I2cBus + Send,
{
    trace!("Poll task started.");

    loop {
        tokio::select! {
            biased;
            _ = running.cancelled() => break,
            cycle = cycles.recv() => {
                if cycle.is_none() {
                    break;
                }
                if let Err(e) = poll_once(&mut bus, addr, &slot).await {
                    error!(error = %e, "Poll cycle failed, keeping previous sample.");
                }
            }
        }
    }

    trace!("Poll task stopped.");
}

/// One poll cycle: exchange, verify length, sanitize, publish.
async fn poll_once<B>(bus: &mut B, addr: u16, slot: &SampleSlot) -> Result<()>
where
    B: I2cBus + Send,
{
    let raw = bus.transact(addr, &READ_SELECT, SAMPLE_LEN).await?;
    let raw: [u8; SAMPLE_LEN] = raw.as_slice().try_into().map_err(|_| {
        Error::Transaction(format!(
            "expected {} byte reply, got {}",
            SAMPLE_LEN,
            raw.len()
        ))
    })?;

    let sample = Sample::sanitize(raw);
    trace!(sample = %sample, "Sample updated.");
    slot.produce(sample);
    Ok(())
}
