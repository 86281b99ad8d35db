pub mod address;
pub mod connection;
pub mod transaction;
pub mod user;

use crate::validation::ValidationError;
use thiserror::Error;

/// Failure of a store write that validates its input first. Keeps a bad
/// caller argument distinguishable from a driver-level failure.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] sqlx::Error),
}

pub const INIT_SCHEMA: &str = r#"
-- Create users table
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    first_name TEXT,
    last_name TEXT,
    email TEXT
);

-- Create addresses table. Delete + reinsert of the same address string
-- produces a fresh id, never a resurrected row.
CREATE TABLE IF NOT EXISTS addresses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    address TEXT NOT NULL UNIQUE,
    user_id INTEGER NOT NULL,
    balance TEXT NOT NULL,
    last_synced_time INTEGER NOT NULL,
    FOREIGN KEY (user_id) REFERENCES users(id)
);

-- Create transactions table. The hash is the natural key; uniqueness is
-- enforced here so concurrent or retried syncs cannot double-insert.
CREATE TABLE IF NOT EXISTS transactions (
    transaction_hash TEXT PRIMARY KEY,
    from_address TEXT NOT NULL,
    to_address TEXT NOT NULL,
    transaction_time INTEGER NOT NULL
);

-- Create indexes for "involves address X" lookups on either side
CREATE INDEX IF NOT EXISTS idx_transactions_from ON transactions(from_address);
CREATE INDEX IF NOT EXISTS idx_transactions_to ON transactions(to_address);
"#;
