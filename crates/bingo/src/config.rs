//! Server configuration.

use std::net::SocketAddr;
use std::time::Duration;

use bingo_room::RoomConfig;
use serde::{Deserialize, Serialize};

/// Environment variable overriding [`ServerConfig::bind_addr`].
pub const BIND_ADDR_ENV: &str = "BINGO_BIND_ADDR";
/// Environment variable overriding [`ServerConfig::idle_timeout`], in
/// seconds. `0` disables the timeout.
pub const IDLE_TIMEOUT_ENV: &str = "BINGO_IDLE_TIMEOUT_SECS";
/// Environment variable overriding [`RoomConfig::channel_size`].
pub const ROOM_CHANNEL_SIZE_ENV: &str = "BINGO_ROOM_CHANNEL_SIZE";
/// Environment variable overriding [`RoomConfig::outbound_buffer`].
pub const OUTBOUND_BUFFER_ENV: &str = "BINGO_OUTBOUND_BUFFER";

/// Everything the server needs to start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the WebSocket listener binds to.
    pub bind_addr: String,

    /// Drop a connection that sends nothing for this long. `None` keeps
    /// idle connections open forever; players often sit quietly between
    /// calls, so this is off by default.
    pub idle_timeout: Option<Duration>,

    /// Settings for every room.
    pub room: RoomConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:4000".to_string(),
            idle_timeout: None,
            room: RoomConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Loads config from the process environment, falling back to the
    /// defaults for anything unset or unparsable.
    pub fn load_or_default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`load_or_default`](Self::load_or_default) but reads
    /// variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup(BIND_ADDR_ENV) {
            if addr.parse::<SocketAddr>().is_ok() {
                config.bind_addr = addr;
            } else {
                tracing::warn!(%addr, "invalid {BIND_ADDR_ENV}, using default");
            }
        }

        if let Some(secs) = lookup(IDLE_TIMEOUT_ENV) {
            match secs.parse::<u64>() {
                Ok(0) => config.idle_timeout = None,
                Ok(secs) => {
                    config.idle_timeout = Some(Duration::from_secs(secs));
                }
                Err(_) => {
                    tracing::warn!(%secs, "invalid {IDLE_TIMEOUT_ENV}, using default");
                }
            }
        }

        if let Some(size) = lookup(ROOM_CHANNEL_SIZE_ENV) {
            match positive(&size) {
                Some(parsed) => config.room.channel_size = parsed,
                None => {
                    tracing::warn!(%size, "{ROOM_CHANNEL_SIZE_ENV} must be > 0, using default");
                }
            }
        }

        if let Some(size) = lookup(OUTBOUND_BUFFER_ENV) {
            match positive(&size) {
                Some(parsed) => config.room.outbound_buffer = parsed,
                None => {
                    tracing::warn!(%size, "{OUTBOUND_BUFFER_ENV} must be > 0, using default");
                }
            }
        }

        config
    }
}

fn positive(value: &str) -> Option<usize> {
    value.parse::<usize>().ok().filter(|&n| n > 0)
}
