// Turns a remote transaction id into a storable Transaction row.

use crate::explorer::{ClientError, RemoteLedger};
use crate::models::Transaction;
use crate::validation::validate_transaction_hash;
use chrono::NaiveDateTime;

const REMOTE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Resolve a transaction id to `(hash, from, to, time)`.
///
/// Policy: multi-input/multi-output transactions are represented by the
/// first listed party on each side only. Stakeholders have accepted this
/// flattening; full multi-party modeling is tracked as an open question.
///
/// Empty inputs, empty outputs, or a missing/unparseable time field fail
/// with `Malformed`.
pub async fn resolve_transaction(
    remote: &dyn RemoteLedger,
    tx_id: &str,
) -> Result<Transaction, ClientError> {
    validate_transaction_hash(tx_id).map_err(|e| ClientError::Malformed(e.to_string()))?;

    let detail = remote.get_transaction(tx_id).await?;

    let from_address = detail
        .input_addresses
        .first()
        .cloned()
        .ok_or_else(|| ClientError::Malformed(format!("transaction {tx_id} has no inputs")))?;

    let to_address = detail
        .output_addresses
        .first()
        .cloned()
        .ok_or_else(|| ClientError::Malformed(format!("transaction {tx_id} has no outputs")))?;

    let raw_time = detail
        .time
        .ok_or_else(|| ClientError::Malformed(format!("transaction {tx_id} has no time field")))?;

    Ok(Transaction {
        transaction_hash: tx_id.to_string(),
        from_address,
        to_address,
        transaction_time: parse_remote_time(&raw_time)?,
    })
}

fn parse_remote_time(raw: &str) -> Result<i64, ClientError> {
    NaiveDateTime::parse_from_str(raw, REMOTE_TIME_FORMAT)
        .map(|dt| dt.and_utc().timestamp())
        .map_err(|e| ClientError::Malformed(format!("unparseable transaction time {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::parse_remote_time;

    #[test]
    fn parses_explorer_time_format() {
        assert_eq!(parse_remote_time("1970-01-01 00:00:05").unwrap(), 5);
    }

    #[test]
    fn rejects_unexpected_time_format() {
        assert!(parse_remote_time("05:00 Jan 1").is_err());
        assert!(parse_remote_time("").is_err());
    }
}
