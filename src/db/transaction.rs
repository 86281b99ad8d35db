use crate::models::Transaction;
use sqlx::{Pool, Row, Sqlite};
use std::collections::HashSet;

/// Insert a transaction unless its hash is already present. Returns whether a
/// row was actually written, so callers can tell a merge from a no-op. The
/// conditional form makes check-then-insert races harmless: two syncs
/// discovering the same hash via different addresses cannot double-insert.
pub async fn insert_transaction_if_absent(
    pool: &Pool<Sqlite>,
    tx: &Transaction,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO transactions (transaction_hash, from_address, to_address, transaction_time)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(transaction_hash) DO NOTHING
        "#,
    )
    .bind(&tx.transaction_hash)
    .bind(&tx.from_address)
    .bind(&tx.to_address)
    .bind(tx.transaction_time)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Hashes of every transaction already known to involve the address, on
/// either side of the relation.
pub async fn get_known_transaction_ids(
    pool: &Pool<Sqlite>,
    address: &str,
) -> Result<HashSet<String>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT transaction_hash FROM transactions WHERE from_address = ? OR to_address = ?",
    )
    .bind(address)
    .bind(address)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("transaction_hash")).collect())
}

pub async fn get_transactions_for_address(
    pool: &Pool<Sqlite>,
    address: &str,
) -> Result<Vec<Transaction>, sqlx::Error> {
    let rows = sqlx::query(
        r#"SELECT transaction_hash, from_address, to_address, transaction_time
           FROM transactions
           WHERE from_address = ? OR to_address = ?
           ORDER BY transaction_time ASC"#,
    )
    .bind(address)
    .bind(address)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_row).collect())
}

pub async fn get_all_transactions(pool: &Pool<Sqlite>) -> Result<Vec<Transaction>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT transaction_hash, from_address, to_address, transaction_time
         FROM transactions ORDER BY transaction_time ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_row).collect())
}

fn map_row(row: &sqlx::sqlite::SqliteRow) -> Transaction {
    Transaction {
        transaction_hash: row.get("transaction_hash"),
        from_address: row.get("from_address"),
        to_address: row.get("to_address"),
        transaction_time: row.get("transaction_time"),
    }
}
