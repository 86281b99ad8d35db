// Configuration structure for:
// - Explorer API base URL and request timeout
// - Database connection string
// - Sync scheduling (interval, per-address timeout, concurrency)
// - Remote rate limit / retry budget

use dotenv::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub explorer_url: String,
    pub http_timeout: Duration,
    pub address_sync_timeout: Duration,
    pub sync_interval: Duration,
    pub sync_concurrency: usize,
    pub recent_tx_limit: usize,
    pub remote_rate_limit: Option<u32>,
    pub retry_max_attempts: usize,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:coin_tracker.db".to_string());
        let explorer_url = env::var("EXPLORER_URL")
            .unwrap_or_else(|_| "https://api.blockchair.com/bitcoin/dashboards".to_string());
        let http_timeout = env::var("HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));
        let address_sync_timeout = env::var("ADDRESS_SYNC_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(120));
        let sync_interval = env::var("SYNC_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(300));
        let sync_concurrency = env::var("SYNC_CONCURRENCY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(num_cpus::get);
        let recent_tx_limit = env::var("RECENT_TX_LIMIT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);
        let remote_rate_limit = env::var("REMOTE_RATE_LIMIT")
            .map(|v| v.parse().ok())
            .unwrap_or(None);
        let retry_max_attempts = env::var("RETRY_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(3);

        Self {
            database_url,
            explorer_url,
            http_timeout,
            address_sync_timeout,
            sync_interval,
            sync_concurrency,
            recent_tx_limit,
            remote_rate_limit,
            retry_max_attempts,
        }
    }
}
