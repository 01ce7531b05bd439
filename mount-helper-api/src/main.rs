use anyhow::Result;
use mount_helper_api::{run_server, shutdown_signal, Config, SERVICE_NAME};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = mount_helper_logging::init_subscriber();

    info!("Starting {} service...", SERVICE_NAME);

    let config = Config::from_env();
    info!(
        "Configuration loaded: listen_address={}, execution_timeout_secs={:?}, debug_log_dir={}",
        config.listen_address,
        config.execution_timeout_secs,
        config.debug_log_dir.display()
    );

    run_server(config, shutdown_signal()).await
}
