//! Provide tracing, tailored to this daemon.
//!
//! Call [`init_journald_or_stdout`] once at startup to install a
//! subscriber. The rest of the crate imports
//! `crate::tracing::prelude::*` for the level macros.

use std::env;
use time::OffsetDateTime;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt::{format::Writer, time::FormatTime},
    prelude::*,
};

pub mod prelude {
    #[allow(unused_imports)]
    pub use tracing::{trace, debug, info, warn, error};
}

use prelude::*;

/// Initialize logging.
///
/// Under systemd (detected via JOURNAL_STREAM) events go to journald,
/// which supplies its own timestamps and metadata; everywhere else they
/// go to stdout with a compact local-time format.
pub fn init_journald_or_stdout() {
    match env::var("JOURNAL_STREAM")
        .ok()
        .and_then(|_| tracing_journald::layer().ok())
    {
        Some(journald) => tracing_subscriber::registry().with(journald).init(),
        None => init_stdout(),
    }
}

/// Log to stdout, filtered by RUST_LOG with a default level of INFO.
fn init_stdout() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var("RUST_LOG")
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_timer(ClockTimer))
        .init();

    if env::var("JOURNAL_STREAM").is_ok() {
        warn!("Journald unavailable, logging to stdout instead.");
    }
}

// Second-resolution wall-clock timestamps in local time; falls back to
// UTC when the local offset cannot be determined.
struct ClockTimer;

impl FormatTime for ClockTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        const FORMAT: &'static [time::format_description::FormatItem<'static>] =
            time::macros::format_description!("[hour]:[minute]:[second]");
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        match now.format(FORMAT) {
            Ok(stamp) => write!(w, "{}", stamp),
            Err(_) => Err(std::fmt::Error),
        }
    }
}
