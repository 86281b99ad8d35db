pub mod config;
pub mod db;
pub mod explorer;
pub mod models;
pub mod sync;
pub mod validation;

#[cfg(test)]
mod tests;

// Re-export specific items for convenience
pub use config::Config;
pub use explorer::{ClientError, ExplorerClient, RemoteLedger};
pub use models::{Address, Transaction, User};
pub use sync::{SyncEngine, SyncError, SyncOutcome, SyncReport};
pub use validation::{validate_address, validate_transaction_hash};
