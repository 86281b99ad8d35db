// Row models for users, addresses and transactions, plus the DTO the
// explorer client decodes remote transaction payloads into.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// A tracked address with its cached balance snapshot.
///
/// `balance` is the opaque string the remote last reported; no numeric
/// interpretation happens anywhere in this crate. `last_synced_time` is unix
/// seconds and is non-decreasing across syncs of the same address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: i64,
    pub address: String,
    pub user_id: i64,
    pub balance: String,
    pub last_synced_time: i64,
}

/// A merged ledger transaction, keyed by its hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_hash: String,
    pub from_address: String,
    pub to_address: String,
    pub transaction_time: i64,
}

/// Raw transaction detail as reported by the remote explorer, before the
/// resolver has applied shape checks or time parsing.
#[derive(Debug, Clone, Default)]
pub struct RemoteTransaction {
    pub input_addresses: Vec<String>,
    pub output_addresses: Vec<String>,
    pub time: Option<String>,
}
