use item_catalog::config::Config;
use item_catalog::http;
use item_catalog::lifecycle::CatalogSystem;
use record_framework::tracing::setup_tracing;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = Config::from_env();
    info!(?config, "Starting item catalog");

    let system = CatalogSystem::new(&config);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| format!("bind {} failed: {e}", config.bind_addr))?;

    let served = http::serve(listener, system.service.clone(), shutdown_signal()).await;

    system.shutdown().await?;
    served.map_err(|e| format!("server failed: {e}"))?;

    info!("Item catalog stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
