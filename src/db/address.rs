// Tracked-address CRUD plus the conditional balance update the sync engine
// writes through.

use crate::db::StoreError;
use crate::models::Address;
use crate::validation::validate_address;
use sqlx::{Pool, Row, Sqlite};

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Address {
    Address {
        id: row.get("id"),
        address: row.get("address"),
        user_id: row.get("user_id"),
        balance: row.get("balance"),
        last_synced_time: row.get("last_synced_time"),
    }
}

pub async fn add_address(
    pool: &Pool<Sqlite>,
    address: &str,
    user_id: i64,
    balance: &str,
    last_synced_time: i64,
) -> Result<i64, StoreError> {
    validate_address(address)?;

    let result = sqlx::query(
        "INSERT INTO addresses (address, user_id, balance, last_synced_time) VALUES (?, ?, ?, ?)",
    )
    .bind(address)
    .bind(user_id)
    .bind(balance)
    .bind(last_synced_time)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn remove_address(pool: &Pool<Sqlite>, address: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM addresses WHERE address = ?")
        .bind(address)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn get_address(
    pool: &Pool<Sqlite>,
    address: &str,
) -> Result<Option<Address>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT id, address, user_id, balance, last_synced_time FROM addresses WHERE address = ?",
    )
    .bind(address)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(map_row))
}

pub async fn get_all_addresses(pool: &Pool<Sqlite>) -> Result<Vec<Address>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT id, address, user_id, balance, last_synced_time FROM addresses ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_row).collect())
}

/// Write a new balance snapshot, guarded so `last_synced_time` never moves
/// backwards. An update carrying a timestamp older than the stored one is
/// ignored and reported as not applied.
pub async fn update_balance(
    pool: &Pool<Sqlite>,
    address: &str,
    new_balance: &str,
    new_synced_time: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE addresses SET balance = ?, last_synced_time = ?
         WHERE address = ? AND last_synced_time <= ?",
    )
    .bind(new_balance)
    .bind(new_synced_time)
    .bind(address)
    .bind(new_synced_time)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
