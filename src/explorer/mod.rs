pub mod client;
pub mod resolver;

use crate::models::RemoteTransaction;
use async_trait::async_trait;

// Re-exports for convenience
pub use client::{ClientError, ExplorerClient};
pub use resolver::resolve_transaction;

/// Read-only surface of the remote ledger consumed by the sync engine.
///
/// `ExplorerClient` is the production implementation; tests substitute a
/// scripted mock behind the same trait.
#[async_trait]
pub trait RemoteLedger: Send + Sync {
    /// Current balance for the address, as the opaque string the remote
    /// reports. No numeric coercion happens on this side.
    async fn get_balance(&self, address: &str) -> Result<String, ClientError>;

    /// Most recent transaction ids involving the address, in remote order,
    /// capped at `limit`.
    async fn get_recent_transaction_ids(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<String>, ClientError>;

    /// Raw detail for a single transaction.
    async fn get_transaction(&self, tx_id: &str) -> Result<RemoteTransaction, ClientError>;
}
