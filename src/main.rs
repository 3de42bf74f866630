//! filevault - Entry Point
//!
//! An authenticated file upload and retrieval server.

use log::{error, info};

use filevault::config::AppConfig;
use filevault::error::AppError;
use filevault::server::Server;
use filevault::utils::logging::setup_logging;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    setup_logging();

    info!("Launching file vault...");

    let config = AppConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    let server = Server::new(&config).await?;
    server.start().await
}
