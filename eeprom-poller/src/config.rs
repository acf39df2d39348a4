//! Configuration for the polling daemon.
//!
//! Everything here is read from `EEPROM_POLLER_*` environment variables
//! with sensible defaults, so the daemon runs unconfigured on a board
//! with the device on adapter 0. The poll period and sample length are
//! deliberately not configurable; they are compile-time constants of
//! the sampler.

use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::tracing::prelude::*;

/// Default I2C adapter character device.
const DEFAULT_BUS_PATH: &str = "/dev/i2c-0";

/// Default device address on the bus.
const DEFAULT_DEVICE_ADDR: u16 = 0x50;

/// Default API listen address.
const DEFAULT_API_LISTEN: &str = "127.0.0.1:7786";

/// Daemon configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// I2C adapter device path (EEPROM_POLLER_BUS)
    pub bus_path: PathBuf,

    /// Device address on the bus (EEPROM_POLLER_ADDR, decimal or 0x-hex)
    pub device_addr: u16,

    /// HTTP API listen address (EEPROM_POLLER_API_LISTEN)
    pub api_listen: SocketAddr,
}

impl Config {
    /// Load configuration from the environment, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let bus_path = env::var("EEPROM_POLLER_BUS")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_BUS_PATH));

        let device_addr = env::var("EEPROM_POLLER_ADDR")
            .ok()
            .and_then(|s| parse_addr(&s))
            .unwrap_or(DEFAULT_DEVICE_ADDR);

        let api_listen = env::var("EEPROM_POLLER_API_LISTEN")
            .ok()
            .and_then(|s| match s.parse() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    warn!(value = %s, error = %e, "Ignoring bad API listen address.");
                    None
                }
            })
            .unwrap_or_else(|| {
                DEFAULT_API_LISTEN
                    .parse()
                    .expect("default listen address parses")
            });

        Self {
            bus_path,
            device_addr,
            api_listen,
        }
    }
}

/// Parse a bus address given as decimal or 0x-prefixed hex.
fn parse_addr(s: &str) -> Option<u16> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u16::from_str_radix(hex, 16).ok()
    } else {
        s.parse().ok()
    }
}
