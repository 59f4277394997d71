//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

use crate::{LogFormat, RuntimeError, RuntimeResult, ServerConfig};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured filter. Fails if a subscriber is
/// already installed.
pub fn init_tracing(config: &ServerConfig) -> RuntimeResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .map_err(|e| RuntimeError::Telemetry(e.to_string()))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match config.log_format {
        LogFormat::Json => builder.json().with_current_span(false).try_init(),
        LogFormat::Pretty => builder.try_init(),
    };

    installed.map_err(|e| RuntimeError::Telemetry(e.to_string()))
}
