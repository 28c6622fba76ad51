//! Architectural Contract Test: Idempotent Reconciliation
//!
//! This test verifies that present and clean_up can be repeated safely.
//!
//! Constraints verified:
//! - present twice leaves exactly one record and the second call succeeds
//! - clean_up on a missing record succeeds without touching the provider
//! - A failed mutation leaves provider state unchanged, so a retry is safe
//!
//! If this test fails, host retries can duplicate or lose challenge records.

mod common;

use common::*;
use dns01_core::traits::Solver;
use dns01_core::{Error, MemorySecretStore, ReconcileOutcome};

#[tokio::test]
async fn first_present_creates_challenge_record() {
    let provider = FakeProvider::new(valid_credentials());
    let solver = initialized_solver(&provider, &MemorySecretStore::new()).await;

    let outcome = solver
        .reconcile_present(&challenge("abc123"))
        .await
        .expect("present succeeds");

    assert_eq!(outcome, ReconcileOutcome::Created);
    assert_eq!(
        provider.calls(),
        vec![ProviderCall::Create {
            zone: "example.com".to_string(),
            name: "_acme-challenge".to_string(),
            content: "abc123".to_string(),
            ttl: "600".to_string(),
        }]
    );

    let records = provider.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "_acme-challenge.example.com");
    assert_eq!(records[0].record_type, "TXT");
}

#[tokio::test]
async fn repeated_present_is_a_no_op() {
    let provider = FakeProvider::new(valid_credentials());
    let solver = initialized_solver(&provider, &MemorySecretStore::new()).await;
    let request = challenge("abc123");

    solver.present(&request).await.expect("first present succeeds");
    let records_after_first = provider.records();

    let outcome = solver
        .reconcile_present(&request)
        .await
        .expect("second present succeeds");

    assert!(
        matches!(outcome, ReconcileOutcome::Unchanged { .. }),
        "Expected Unchanged on second present, got {:?}",
        outcome
    );
    assert_eq!(provider.records(), records_after_first);
    assert_eq!(provider.calls().len(), 1, "Only the first present may mutate");
}

#[tokio::test]
async fn clean_up_after_absence_succeeds() {
    let provider = FakeProvider::new(valid_credentials());
    let solver = initialized_solver(&provider, &MemorySecretStore::new()).await;

    let outcome = solver
        .reconcile_clean_up(&challenge("never-created"))
        .await
        .expect("clean_up of missing record succeeds");

    assert_eq!(outcome, ReconcileOutcome::Absent);
    assert!(provider.calls().is_empty());
    assert_eq!(provider.search_count(), 1);
}

#[tokio::test]
async fn repeated_clean_up_deletes_once() {
    let provider = FakeProvider::new(valid_credentials());
    let solver = initialized_solver(&provider, &MemorySecretStore::new()).await;
    let request = challenge("abc123");

    solver.present(&request).await.unwrap();
    solver.clean_up(&request).await.expect("first clean_up succeeds");
    solver.clean_up(&request).await.expect("second clean_up succeeds");

    assert!(provider.records().is_empty());
    let deletes = provider
        .calls()
        .into_iter()
        .filter(|c| matches!(c, ProviderCall::Delete { .. }))
        .count();
    assert_eq!(deletes, 1);
}

#[tokio::test]
async fn failed_create_leaves_state_unchanged_and_retry_succeeds() {
    let provider = FakeProvider::new(valid_credentials());
    let solver = initialized_solver(&provider, &MemorySecretStore::new()).await;
    let request = challenge("abc123");

    provider.reject_mutations();
    let err = solver.present(&request).await.unwrap_err();
    assert!(
        matches!(err, Error::ProviderRejected { status: 400, .. }),
        "got {err:?}"
    );
    assert!(err.is_retryable());
    assert!(provider.records().is_empty());

    // Provider recovered: the host's retry of the same request goes through
    let healthy = FakeProvider::new(valid_credentials());
    let solver = initialized_solver(&healthy, &MemorySecretStore::new()).await;
    tokio_test::assert_ok!(solver.present(&request).await);
    assert_eq!(healthy.records().len(), 1);
}
