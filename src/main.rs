use coin_tracker_service::{config::Config, db, explorer::ExplorerClient, sync, SyncEngine};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting coin-tracker-service");

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Configuration loaded: {:?}", config);

    // Setup database connection
    let db_pool = db::connection::establish_connection(&config.database_url).await?;
    sqlx::query("SELECT 1").execute(&db_pool).await?;
    tracing::info!("Database connection established");

    // Remote explorer client, shared by all concurrent address syncs
    let remote = Arc::new(ExplorerClient::new(&config)?);

    let engine = Arc::new(SyncEngine::new(db_pool, remote, config.clone()));

    // Run the periodic scheduler until ctrl-c
    let shutdown = CancellationToken::new();
    let scheduler_handle = tokio::spawn(sync::scheduler::run(
        engine,
        config.sync_interval,
        shutdown.clone(),
    ));

    tokio::signal::ctrl_c().await?;
    tracing::info!("Received shutdown signal");
    shutdown.cancel();
    scheduler_handle.await?;

    Ok(())
}
