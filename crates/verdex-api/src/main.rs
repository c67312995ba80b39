//! Binary entrypoint for the Verdex API server.
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use verdex_api::{run, AppState};
use verdex_core::AppConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let state = AppState::from_config(&config).expect("Failed to build application state");

    run(&config.bind_addr, Arc::new(state)).await;
}
