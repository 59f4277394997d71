//! Señas Connect server
//!
//! Configuration comes from `SENAS_*` environment variables; `RUST_LOG`
//! overrides the log filter. Stops on Ctrl-C.

use senas_runtime::{init_tracing, Server, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    init_tracing(&config)?;

    tracing::info!(
        bind = %config.bind_addr,
        outbound_buffer = config.outbound_buffer,
        "starting Señas Connect"
    );

    let server = Server::bind(&config).await?;
    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutdown requested");
        })
        .await?;

    Ok(())
}
