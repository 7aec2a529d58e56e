use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use metro_server::config::ServerConfig;
use metro_server::ingest::load_network;
use metro_server::web::{AppState, create_router};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("metro_server=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "server exited");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    let metro = load_network(&config.network_path)?;

    let app = create_router(AppState::new(metro), &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "metro server listening");
    info!("  GET  /health                - Health check");
    info!("  GET  /stations              - All stations");
    info!("  GET  /lines/:name/adjacent  - Lines connecting with a line");
    info!("  GET  /path?from=&to=        - Find a route");

    axum::serve(listener, app).await?;
    Ok(())
}
