//! Configuration loading and management.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server information.
    pub server: ServerConfig,
    /// Network listen configuration.
    pub listen: ListenConfig,
    /// Per-connection session tuning.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name shown by the `version` command (e.g., "Hearth").
    pub name: String,
}

/// Network listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    /// Address to bind to (e.g., "0.0.0.0:19132").
    pub address: SocketAddr,
}

/// Session and connection limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Packets that may wait in a connection's outbound queue.
    pub outbound_queue: usize,
    /// Largest accepted frame in bytes.
    pub max_frame_len: usize,
    /// Seconds a client has to send its Login packet.
    pub login_timeout_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            outbound_queue: 256,
            max_frame_len: hearth_proto::codec::DEFAULT_MAX_FRAME_LEN,
            login_timeout_secs: 10,
        }
    }
}

impl SessionConfig {
    /// Login timeout as a [`Duration`].
    pub fn login_timeout(&self) -> Duration {
        Duration::from_secs(self.login_timeout_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
