// SQLite connection pool setup and schema initialization.

use crate::db::INIT_SCHEMA;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Pool, Sqlite};

pub async fn establish_connection(database_url: &str) -> Result<Pool<Sqlite>, sqlx::Error> {
    // Create database if it doesn't exist
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        Sqlite::create_database(database_url).await?;
    }

    let pool = SqlitePoolOptions::new().connect(database_url).await?;

    // Enable WAL mode for better concurrency
    sqlx::query("PRAGMA journal_mode=WAL").execute(&pool).await?;

    // Initialize schema
    sqlx::query(INIT_SCHEMA).execute(&pool).await?;

    Ok(pool)
}

/// Single-connection in-memory pool, used by the demo driver and tests.
pub async fn establish_in_memory() -> Result<Pool<Sqlite>, sqlx::Error> {
    // One connection only: each sqlite::memory: connection is its own database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;

    sqlx::query(INIT_SCHEMA).execute(&pool).await?;

    Ok(pool)
}
