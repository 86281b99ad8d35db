//! Ledger store behavior: conditional inserts, either-side lookups and the
//! monotonic balance snapshot guard.

use crate::db::{address, connection, transaction, user, StoreError};
use crate::models::Transaction;
use sqlx::SqlitePool;

async fn setup() -> SqlitePool {
    connection::establish_in_memory()
        .await
        .expect("in-memory pool")
}

fn tx(hash: &str, from: &str, to: &str, time: i64) -> Transaction {
    Transaction {
        transaction_hash: hash.to_string(),
        from_address: from.to_string(),
        to_address: to.to_string(),
        transaction_time: time,
    }
}

#[tokio::test]
async fn conditional_insert_reports_duplicates() {
    let pool = setup().await;

    let first = transaction::insert_transaction_if_absent(&pool, &tx("h1", "a", "b", 100))
        .await
        .unwrap();
    assert!(first, "first insert should write a row");

    // Same hash rediscovered with different details must be a no-op.
    let second = transaction::insert_transaction_if_absent(&pool, &tx("h1", "c", "d", 999))
        .await
        .unwrap();
    assert!(!second, "duplicate hash must not write");

    let all = transaction::get_all_transactions(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].from_address, "a", "original row must be untouched");
}

#[tokio::test]
async fn known_ids_cover_both_sides_of_the_relation() {
    let pool = setup().await;

    transaction::insert_transaction_if_absent(&pool, &tx("h1", "alpha", "beta", 100))
        .await
        .unwrap();
    transaction::insert_transaction_if_absent(&pool, &tx("h2", "gamma", "alpha", 200))
        .await
        .unwrap();

    let known = transaction::get_known_transaction_ids(&pool, "alpha")
        .await
        .unwrap();
    assert!(known.contains("h1"));
    assert!(known.contains("h2"));
    assert_eq!(known.len(), 2);

    let beta_known = transaction::get_known_transaction_ids(&pool, "beta")
        .await
        .unwrap();
    assert_eq!(beta_known.len(), 1);
    assert!(beta_known.contains("h1"));
}

#[tokio::test]
async fn transactions_for_address_ordered_by_time() {
    let pool = setup().await;

    transaction::insert_transaction_if_absent(&pool, &tx("h2", "a", "b", 200))
        .await
        .unwrap();
    transaction::insert_transaction_if_absent(&pool, &tx("h1", "b", "a", 100))
        .await
        .unwrap();

    let txs = transaction::get_transactions_for_address(&pool, "a")
        .await
        .unwrap();
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].transaction_hash, "h1");
    assert_eq!(txs[1].transaction_hash, "h2");
}

#[tokio::test]
async fn balance_update_is_monotonic() {
    let pool = setup().await;
    let user_id = user::add_user(&pool, "tester", None, None, None)
        .await
        .unwrap();
    address::add_address(&pool, "addr", user_id, "100000", 1000)
        .await
        .unwrap();

    let applied = address::update_balance(&pool, "addr", "105000", 2000)
        .await
        .unwrap();
    assert!(applied);

    // An update bearing an older timestamp than the stored one is ignored.
    let stale = address::update_balance(&pool, "addr", "90000", 1500)
        .await
        .unwrap();
    assert!(!stale);

    let addr = address::get_address(&pool, "addr").await.unwrap().unwrap();
    assert_eq!(addr.balance, "105000");
    assert_eq!(addr.last_synced_time, 2000);

    // Equal timestamps are still non-decreasing.
    let equal = address::update_balance(&pool, "addr", "106000", 2000)
        .await
        .unwrap();
    assert!(equal);
}

#[tokio::test]
async fn delete_and_reinsert_yields_a_new_row() {
    let pool = setup().await;
    let user_id = user::add_user(&pool, "tester", None, None, None)
        .await
        .unwrap();

    let first_id = address::add_address(&pool, "addr", user_id, "100000", 1000)
        .await
        .unwrap();

    assert!(address::remove_address(&pool, "addr").await.unwrap());
    assert!(
        !address::remove_address(&pool, "addr").await.unwrap(),
        "second delete has nothing to remove"
    );

    let second_id = address::add_address(&pool, "addr", user_id, "100000", 1000)
        .await
        .unwrap();
    assert!(second_id > first_id, "reinsert must produce a fresh row id");

    let listed = address::get_all_addresses(&pool).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, second_id);
}

#[tokio::test]
async fn rejects_blank_address_as_a_validation_error() {
    let pool = setup().await;
    let user_id = user::add_user(&pool, "tester", None, None, None)
        .await
        .unwrap();

    let err = address::add_address(&pool, "  ", user_id, "0", 0)
        .await
        .unwrap_err();

    // A bad argument is the caller's problem, not a driver failure.
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(address::get_all_addresses(&pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn user_roundtrip() {
    let pool = setup().await;
    let user_id = user::add_user(
        &pool,
        "motorcade",
        Some("Cade"),
        Some("Cunningham"),
        Some("ccunningham@gmail.com"),
    )
    .await
    .unwrap();

    let loaded = user::get_user(&pool, user_id).await.unwrap().unwrap();
    assert_eq!(loaded.username, "motorcade");
    assert_eq!(loaded.first_name.as_deref(), Some("Cade"));
    assert_eq!(loaded.email.as_deref(), Some("ccunningham@gmail.com"));

    assert!(user::get_user(&pool, user_id + 1).await.unwrap().is_none());
}
