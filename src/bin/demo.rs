// End-to-end walkthrough against an in-memory database and the live
// explorer: provision a user with two addresses, exercise the delete +
// reinsert lifecycle, then run one sync batch and dump the tables.

use chrono::Utc;
use coin_tracker_service::config::Config;
use coin_tracker_service::db::{address, connection, transaction, user};
use coin_tracker_service::explorer::ExplorerClient;
use coin_tracker_service::SyncEngine;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    println!("Setting up in-memory database...");
    let pool = connection::establish_in_memory().await?;
    println!("✅ Database ready!");

    // Demo user with two bitcoin addresses
    let user_id = user::add_user(
        &pool,
        "motorcade",
        Some("Cade"),
        Some("Cunningham"),
        Some("ccunningham@gmail.com"),
    )
    .await?;
    println!("✅ Created user {user_id}");

    let first_address = "12xQ9k5ousS8MqNsMBqHKtjAtCuKezm2Ju";
    let second_address = "bc1qm34lsc65zpw79lxes69zkqmk6ee3ewf0j77s3h";
    let now = Utc::now().timestamp();

    address::add_address(&pool, first_address, user_id, "100000", now).await?;
    address::add_address(&pool, second_address, user_id, "256000", now).await?;

    println!("Addresses after tracking both:");
    print_addresses(&pool).await?;

    // Delete + reinsert: the address comes back under a fresh row id.
    address::remove_address(&pool, first_address).await?;
    println!("Addresses after removing the first:");
    print_addresses(&pool).await?;

    address::add_address(&pool, first_address, user_id, "100000", now).await?;
    println!("Addresses after reinserting the first:");
    print_addresses(&pool).await?;

    // One reconciliation batch against the live explorer
    let config = Config::from_env();
    let remote = Arc::new(ExplorerClient::new(&config)?);
    let engine = SyncEngine::new(pool.clone(), remote, config);

    println!("Running sync batch...");
    let report = engine.run_batch().await?;
    println!(
        "✅ Sync done: {} ok, {} failed, {} transactions merged",
        report.succeeded(),
        report.failed(),
        report.merged_transactions()
    );
    for result in &report.results {
        if let Err(e) = &result.result {
            println!("  sync failed for {}: {}", result.address, e);
        }
    }

    println!("Addresses after sync:");
    print_addresses(&pool).await?;

    println!("Merged transactions:");
    for tx in transaction::get_all_transactions(&pool).await? {
        println!(
            "  {} : {} -> {} at {}",
            tx.transaction_hash, tx.from_address, tx.to_address, tx.transaction_time
        );
    }

    Ok(())
}

async fn print_addresses(pool: &sqlx::SqlitePool) -> Result<(), sqlx::Error> {
    for addr in address::get_all_addresses(pool).await? {
        println!(
            "  [{}] {} user={} balance={} last_synced={}",
            addr.id, addr.address, addr.user_id, addr.balance, addr.last_synced_time
        );
    }
    Ok(())
}
