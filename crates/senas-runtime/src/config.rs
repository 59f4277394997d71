//! Service configuration

use std::net::SocketAddr;
use std::str::FromStr;

use crate::{RuntimeError, RuntimeResult};

pub const ENV_BIND_ADDR: &str = "SENAS_BIND_ADDR";
pub const ENV_OUTBOUND_BUFFER: &str = "SENAS_OUTBOUND_BUFFER";
pub const ENV_LOG_FORMAT: &str = "SENAS_LOG_FORMAT";
pub const ENV_LOG_FILTER: &str = "SENAS_LOG_FILTER";

/// Log output format
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(RuntimeError::Config(format!("unknown log format '{other}'"))),
        }
    }
}

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// HTTP / WebSocket listen address
    pub bind_addr: SocketAddr,
    /// Queued outgoing messages per session before broadcasts are dropped
    pub outbound_buffer: usize,
    pub log_format: LogFormat,
    /// Fallback filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            outbound_buffer: 64,
            log_format: LogFormat::Pretty,
            log_filter: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults overlaid with `SENAS_*` environment variables
    pub fn from_env() -> RuntimeResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from an arbitrary source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RuntimeResult<Self> {
        let mut config = ServerConfig::default();

        if let Some(addr) = lookup(ENV_BIND_ADDR) {
            config.bind_addr = addr
                .parse()
                .map_err(|e| RuntimeError::Config(format!("{ENV_BIND_ADDR}='{addr}': {e}")))?;
        }

        if let Some(buffer) = lookup(ENV_OUTBOUND_BUFFER) {
            let parsed: usize = buffer.parse().map_err(|e| {
                RuntimeError::Config(format!("{ENV_OUTBOUND_BUFFER}='{buffer}': {e}"))
            })?;
            if parsed == 0 {
                return Err(RuntimeError::Config(format!(
                    "{ENV_OUTBOUND_BUFFER} must be at least 1"
                )));
            }
            config.outbound_buffer = parsed;
        }

        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            config.log_format = format.parse()?;
        }

        if let Some(filter) = lookup(ENV_LOG_FILTER) {
            config.log_filter = filter;
        }

        Ok(config)
    }
}
