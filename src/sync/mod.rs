//! Reconciliation engine: advances each tracked address's local state to
//! match the remote ledger, idempotently and with per-address failure
//! isolation.

pub mod dedup;
pub mod scheduler;

use crate::config::Config;
use crate::db;
use crate::explorer::{resolve_transaction, ClientError, RemoteLedger};
use crate::models::Address;
use chrono::Utc;
use futures::stream::{self, StreamExt};
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum SyncError {
    /// Transient: the remote could not be reached or answered non-2xx.
    /// Retrying the whole address sync later is reasonable.
    #[error("remote ledger unavailable: {0}")]
    RemoteUnavailable(String),

    /// The remote answered with an unexpected payload shape. Not retried.
    #[error("malformed remote response: {0}")]
    MalformedResponse(String),

    /// The ledger store rejected a read or write. Fatal for this attempt.
    #[error("storage failure: {0}")]
    StorageFailure(#[from] sqlx::Error),
}

impl From<ClientError> for SyncError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unavailable(msg) => SyncError::RemoteUnavailable(msg),
            ClientError::Malformed(msg) => SyncError::MalformedResponse(msg),
        }
    }
}

/// What one successful address sync actually did.
#[derive(Debug, Default)]
pub struct SyncOutcome {
    pub balance_updated: bool,
    pub new_transactions: usize,
    pub skipped: Vec<SkippedTransaction>,
}

impl SyncOutcome {
    /// True when the sync completed without touching local state.
    pub fn is_noop(&self) -> bool {
        !self.balance_updated && self.new_transactions == 0 && self.skipped.is_empty()
    }
}

/// A transaction id whose resolution failed; the rest of the address's sync
/// carried on without it.
#[derive(Debug)]
pub struct SkippedTransaction {
    pub transaction_hash: String,
    pub reason: String,
}

#[derive(Debug)]
pub struct AddressSyncResult {
    pub address: String,
    pub result: Result<SyncOutcome, SyncError>,
}

/// Per-address outcomes for one batch. "Nothing changed" and "failed" stay
/// distinguishable here.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub results: Vec<AddressSyncResult>,
}

impl SyncReport {
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }

    pub fn merged_transactions(&self) -> usize {
        self.results
            .iter()
            .filter_map(|r| r.result.as_ref().ok())
            .map(|outcome| outcome.new_transactions)
            .sum()
    }
}

/// The sync engine owns its collaborators explicitly: a storage pool and a
/// remote ledger handle injected at construction, no shared globals.
pub struct SyncEngine {
    pool: SqlitePool,
    remote: Arc<dyn RemoteLedger>,
    config: Config,
}

impl SyncEngine {
    pub fn new(pool: SqlitePool, remote: Arc<dyn RemoteLedger>, config: Config) -> Self {
        Self {
            pool,
            remote,
            config,
        }
    }

    /// One reconciliation pass for one address: balance refresh plus
    /// transaction merge.
    ///
    /// All remote reads happen before any local write, so a fetch failure
    /// leaves both the balance and the transaction log untouched.
    pub async fn sync_address(&self, address: &Address) -> Result<SyncOutcome, SyncError> {
        let remote_balance = self.remote.get_balance(&address.address).await?;
        let remote_ids = self
            .remote
            .get_recent_transaction_ids(&address.address, self.config.recent_tx_limit)
            .await?;
        let known = db::transaction::get_known_transaction_ids(&self.pool, &address.address).await?;

        let mut outcome = SyncOutcome::default();

        // Opaque string comparison; an unchanged balance must not touch
        // last_synced_time.
        if remote_balance != address.balance {
            let now = Utc::now().timestamp();
            let applied =
                db::address::update_balance(&self.pool, &address.address, &remote_balance, now)
                    .await?;
            if !applied {
                debug!(
                    "balance update for {} carried a stale timestamp, ignored",
                    address.address
                );
            }
            outcome.balance_updated = applied;
        }

        let unseen = dedup::unseen_candidates(&remote_ids, &known);
        debug!(
            "{}: {} remote ids, {} known, {} unseen",
            address.address,
            remote_ids.len(),
            known.len(),
            unseen.len()
        );

        for tx_id in &unseen {
            match resolve_transaction(self.remote.as_ref(), tx_id).await {
                Ok(tx) => {
                    // Conditional insert: a concurrent sync of the counterpart
                    // address may have merged this hash already.
                    if db::transaction::insert_transaction_if_absent(&self.pool, &tx).await? {
                        outcome.new_transactions += 1;
                    }
                }
                Err(err) => {
                    warn!(
                        "skipping transaction {} for {}: {}",
                        tx_id, address.address, err
                    );
                    outcome.skipped.push(SkippedTransaction {
                        transaction_hash: tx_id.clone(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }

    /// Sync every address in the batch with bounded concurrency. One
    /// address's failure never aborts the others; each outcome lands in the
    /// report.
    pub async fn sync_all(&self, addresses: &[Address]) -> SyncReport {
        let timeout = self.config.address_sync_timeout;
        let concurrency = self.config.sync_concurrency.max(1);

        let results = stream::iter(addresses.iter().cloned())
            .map(|address| async move {
                let result =
                    match tokio::time::timeout(timeout, self.sync_address(&address)).await {
                        Ok(result) => result,
                        Err(_) => Err(SyncError::RemoteUnavailable(format!(
                            "sync timed out after {timeout:?}"
                        ))),
                    };

                match &result {
                    Ok(outcome) => debug!(
                        "synced {}: balance_updated={}, new={}, skipped={}",
                        address.address,
                        outcome.balance_updated,
                        outcome.new_transactions,
                        outcome.skipped.len()
                    ),
                    Err(err) => warn!("sync failed for {}: {}", address.address, err),
                }

                AddressSyncResult {
                    address: address.address,
                    result,
                }
            })
            .buffer_unordered(concurrency)
            .collect::<Vec<_>>()
            .await;

        SyncReport { results }
    }

    /// Load the tracked addresses and sync them all.
    pub async fn run_batch(&self) -> Result<SyncReport, SyncError> {
        let addresses = db::address::get_all_addresses(&self.pool).await?;
        info!("syncing {} tracked addresses", addresses.len());

        let report = self.sync_all(&addresses).await;
        info!(
            "sync batch done: {} ok, {} failed, {} transactions merged",
            report.succeeded(),
            report.failed(),
            report.merged_transactions()
        );

        Ok(report)
    }
}
