use tokio::net::TcpListener;
use tokio::signal::unix::{self, SignalKind};
use tokio_util::{
    sync::CancellationToken,
    task::TaskTracker,
};

use eeprom_poller::api;
use eeprom_poller::bus::LinuxI2c;
use eeprom_poller::config::Config;
use eeprom_poller::sampler::Sampler;
use eeprom_poller::tracing::{self, prelude::*};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing::init_journald_or_stdout();

    let config = Config::from_env();

    // Acquire in order: bus adapter, sampler, API endpoint. A failure
    // releases whatever was already acquired, newest first.
    let bus = LinuxI2c::open(&config.bus_path)?;
    let sampler = Sampler::start(bus, config.device_addr);

    let listener = match TcpListener::bind(config.api_listen).await {
        Ok(listener) => listener,
        Err(e) => {
            sampler.shutdown().await;
            return Err(anyhow::Error::from(e)
                .context(format!("cannot bind API listener on {}", config.api_listen)));
        }
    };

    let running = CancellationToken::new();
    let tracker = TaskTracker::new();
    let state = api::AppState::new(sampler.open());
    tracker.spawn(api::task(listener, state, running.clone()));
    tracker.close();
    info!("Started.");

    let mut sigint = unix::signal(SignalKind::interrupt())?;
    let mut sigterm = unix::signal(SignalKind::terminate())?;
    tokio::select! {
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
    }

    trace!("Shutting down.");
    // Sampler first, so readers blocked in API requests are released
    // before the endpoint waits out its in-flight requests.
    sampler.shutdown().await;
    running.cancel();
    tracker.wait().await;
    info!("Exiting.");
    Ok(())
}
