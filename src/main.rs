//! microircd - minimal IRC daemon.
//!
//! Usage: `microircd [config.toml]`. A missing config file means defaults.

use microircd::config::Config;
use microircd::network::Gateway;
use microircd::state::{Matrix, ServerInfo};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load_or_default(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.server.name,
        network = %config.server.network,
        version = %config.server.version,
        "Starting microircd"
    );

    let matrix = Matrix::new(ServerInfo::from_config(&config.server));
    let (handle, _matrix_task) = matrix.spawn(config.limits.event_queue);

    let gateway = Gateway::bind(config.listen.address, handle, config.limits.clone()).await?;

    tokio::select! {
        result = gateway.run() => result,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Received Ctrl-C, shutting down");
            Ok(())
        }
    }
}
