//! Locating and decoding a Safe's creation transaction on a fork

use std::collections::HashMap;
use std::pin::pin;

use futures::StreamExt;
use safe_clone::{ScanOutcome, Session, SessionConfig};

use crate::common::{KnownCreations, TestHarness};
use crate::skip_if_no_rpc;

#[tokio::test]
async fn test_recover_decodes_factory_deployment() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let params = harness.params(7_001);
    let (safe_address, tx_hash) = harness
        .deploy_safe(&params)
        .await
        .expect("Failed to deploy Safe");

    let indexer = KnownCreations(HashMap::from([((harness.chain_id, safe_address), tx_hash)]));
    let session = Session::read_only(vec![harness.chain()], indexer, SessionConfig::default());

    let recovered = session.recover(safe_address).await.expect("Failed to recover Safe");

    assert_eq!(recovered.chain_id, harness.chain_id);
    assert_eq!(recovered.transaction.hash, tx_hash);
    assert_eq!(recovered.transaction.from, harness.signer_address());
    assert_eq!(recovered.params, params);
}

#[tokio::test]
async fn test_scan_reports_missing_contract() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let params = harness.params(7_002);
    let safe_address = harness.predict(&params).await;

    let session = Session::read_only(
        vec![harness.chain()],
        KnownCreations::default(),
        SessionConfig::default(),
    );

    let mut scans = pin!(session.scan(safe_address));
    let scan = scans.next().await.expect("one item per chain");
    assert_eq!(scan.chain_id, harness.chain_id);
    assert_eq!(scan.outcome, ScanOutcome::NoContract);
    assert!(scans.next().await.is_none());

    assert!(session.recover(safe_address).await.is_err());
}
