//! HireTrack Server — Application entry point.

use hiretrack_db::{DbConfig, DbManager};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("hiretrack=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting HireTrack server...");

    let config = DbConfig::from_env();
    let manager = match DbManager::connect(&config).await {
        Ok(manager) => manager,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to SurrealDB");
            std::process::exit(1);
        }
    };

    if let Err(e) = hiretrack_db::run_migrations(manager.client()).await {
        tracing::error!(error = %e, "Migrations failed");
        std::process::exit(1);
    }

    // TODO: mount the REST API once the transport layer lands

    tracing::info!("HireTrack server stopped.");
}
