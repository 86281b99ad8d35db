// HTTP client for a Blockchair-shaped explorer API. The URL shape
// (`/address/{address}`, `/transaction/{hash}`) is a detail of this module;
// nothing above the RemoteLedger trait knows about it.

use crate::config::Config;
use crate::explorer::RemoteLedger;
use crate::models::RemoteTransaction;
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::num::NonZeroU32;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("remote ledger unavailable: {0}")]
    Unavailable(String),

    #[error("malformed remote response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Malformed(err.to_string())
        } else {
            // Timeouts, connect errors and the rest are transient.
            ClientError::Unavailable(err.to_string())
        }
    }
}

pub struct ExplorerClient {
    http: reqwest::Client,
    base_url: String,
    limiter: Option<DefaultDirectRateLimiter>,
    retry: ExponentialBuilder,
}

impl ExplorerClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        let limiter = config
            .remote_rate_limit
            .and_then(NonZeroU32::new)
            .map(|per_second| RateLimiter::direct(Quota::per_second(per_second)));

        let retry = ExponentialBuilder::default().with_max_times(config.retry_max_attempts);

        info!(
            "Initializing explorer client for {} (rate limit: {:?}/s)",
            config.explorer_url, config.remote_rate_limit
        );

        Ok(Self {
            http,
            base_url: config.explorer_url.trim_end_matches('/').to_string(),
            limiter,
            retry,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ClientError> {
        let fetch = || async {
            // Shared admission gate: concurrent syncs queue here instead of
            // hitting the remote independently.
            if let Some(limiter) = &self.limiter {
                limiter.until_ready().await;
            }

            let response = self.http.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(ClientError::Unavailable(format!(
                    "{url} returned status {status}"
                )));
            }

            response
                .json::<T>()
                .await
                .map_err(|e| ClientError::Malformed(e.to_string()))
        };

        // Only transient failures are worth retrying; a malformed payload
        // will not get better on a second read.
        fetch
            .retry(self.retry)
            .when(|err| matches!(err, ClientError::Unavailable(_)))
            .notify(|err, dur| warn!("retrying remote call in {:?}: {}", dur, err))
            .await
    }
}

#[async_trait]
impl RemoteLedger for ExplorerClient {
    async fn get_balance(&self, address: &str) -> Result<String, ClientError> {
        let url = format!("{}/address/{}", self.base_url, address);
        let dashboard: AddressDashboard = self.get_json(&url).await?;

        let entry = dashboard.data.get(address).ok_or_else(|| {
            ClientError::Malformed(format!("address {address} missing from response"))
        })?;

        let balance = entry
            .address
            .as_ref()
            .and_then(|summary| summary.balance.as_ref())
            .ok_or_else(|| ClientError::Malformed(format!("no balance field for {address}")))?;

        balance_to_string(balance)
    }

    async fn get_recent_transaction_ids(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<String>, ClientError> {
        let url = format!("{}/address/{}?limit={}", self.base_url, address, limit);
        let dashboard: AddressDashboard = self.get_json(&url).await?;

        let entry = dashboard.data.get(address).ok_or_else(|| {
            ClientError::Malformed(format!("address {address} missing from response"))
        })?;

        recent_ids_from_entry(entry, address, limit)
    }

    async fn get_transaction(&self, tx_id: &str) -> Result<RemoteTransaction, ClientError> {
        let url = format!("{}/transaction/{}", self.base_url, tx_id);
        let dashboard: TransactionDashboard = self.get_json(&url).await?;

        let entry = dashboard.data.get(tx_id).ok_or_else(|| {
            ClientError::Malformed(format!("transaction {tx_id} missing from response"))
        })?;

        Ok(RemoteTransaction {
            input_addresses: entry
                .inputs
                .iter()
                .filter_map(|party| party.recipient.clone())
                .collect(),
            output_addresses: entry
                .outputs
                .iter()
                .filter_map(|party| party.recipient.clone())
                .collect(),
            time: entry
                .transaction
                .as_ref()
                .and_then(|summary| summary.time.clone()),
        })
    }
}

/// A dashboard without a `transactions` list is a shape violation, not an
/// address with no history; it must fail the same way a missing balance does.
fn recent_ids_from_entry(
    entry: &AddressEntry,
    address: &str,
    limit: usize,
) -> Result<Vec<String>, ClientError> {
    let transactions = entry
        .transactions
        .as_deref()
        .ok_or_else(|| ClientError::Malformed(format!("no transactions field for {address}")))?;

    Ok(transactions.iter().take(limit).cloned().collect())
}

/// The remote reports balances as JSON numbers; locally they are opaque
/// strings, so normalize without any numeric interpretation.
fn balance_to_string(value: &Value) -> Result<String, ClientError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(ClientError::Malformed(format!(
            "unexpected balance value: {other}"
        ))),
    }
}

// Payload shapes for the explorer's dashboard endpoints. Everything is
// optional-by-default so shape violations surface as Malformed errors with
// context rather than opaque decode failures.

#[derive(Deserialize)]
struct AddressDashboard {
    #[serde(default)]
    data: HashMap<String, AddressEntry>,
}

#[derive(Deserialize)]
struct AddressEntry {
    address: Option<AddressSummary>,
    transactions: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct AddressSummary {
    balance: Option<Value>,
}

#[derive(Deserialize)]
struct TransactionDashboard {
    #[serde(default)]
    data: HashMap<String, TransactionEntry>,
}

#[derive(Deserialize)]
struct TransactionEntry {
    #[serde(default)]
    inputs: Vec<TransactionParty>,
    #[serde(default)]
    outputs: Vec<TransactionParty>,
    transaction: Option<TransactionSummary>,
}

#[derive(Deserialize)]
struct TransactionParty {
    recipient: Option<String>,
}

#[derive(Deserialize)]
struct TransactionSummary {
    time: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_for(payload: &str, address: &str) -> AddressEntry {
        let mut dashboard: AddressDashboard = serde_json::from_str(payload).unwrap();
        dashboard.data.remove(address).unwrap()
    }

    #[test]
    fn missing_transactions_field_is_malformed_not_empty() {
        let entry = entry_for(r#"{"data":{"addr1":{"address":{"balance":100000}}}}"#, "addr1");

        let err = recent_ids_from_entry(&entry, "addr1", 5).unwrap_err();
        assert!(matches!(err, ClientError::Malformed(_)));
        assert!(err.to_string().contains("no transactions field"));
    }

    #[test]
    fn present_transactions_list_is_returned_in_order_and_capped() {
        let entry = entry_for(
            r#"{"data":{"addr1":{"address":{"balance":100000},"transactions":["h1","h2","h3"]}}}"#,
            "addr1",
        );

        assert_eq!(
            recent_ids_from_entry(&entry, "addr1", 5).unwrap(),
            vec!["h1".to_string(), "h2".to_string(), "h3".to_string()]
        );
        assert_eq!(
            recent_ids_from_entry(&entry, "addr1", 2).unwrap(),
            vec!["h1".to_string(), "h2".to_string()]
        );
    }

    #[test]
    fn empty_transactions_list_is_a_clean_no_op() {
        let entry = entry_for(
            r#"{"data":{"addr1":{"address":{"balance":100000},"transactions":[]}}}"#,
            "addr1",
        );

        assert!(recent_ids_from_entry(&entry, "addr1", 5).unwrap().is_empty());
    }
}
