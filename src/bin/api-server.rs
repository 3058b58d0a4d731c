//! Signal API Server
//!
//! Thin HTTP surface over the signal engine: indicator calculation, agent
//! signal aggregation with sentiment summary, and position sizing.

use dotenvy::dotenv;
use signalmesh::config::EngineConfig;
use signalmesh::core::http::start_server;
use signalmesh::logging;
use std::env;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let config = EngineConfig::from_env()?;
    let env = signalmesh::config::get_environment();
    info!("Starting signal API server");
    info!(environment = %env, "Environment");
    info!(
        max_leverage = config.leverage.max_leverage,
        mlmi_neighbors = config.indicators.mlmi.num_neighbors,
        pair_lookback = config.indicators.divergence.lookback_period,
        "Engine configuration loaded"
    );

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(config, port).await {
            error!(error = %e, "HTTP server error");
        }
    });

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
