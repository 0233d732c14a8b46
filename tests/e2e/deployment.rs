//! Feasibility checks and deployments against the canonical factory on a fork

use alloy::primitives::{address, Address, U256};
use alloy::providers::Provider;
use safe_clone::{
    DeployMethod, ExecutorConfig, FeeConfig, NoIndexer, Session, SessionConfig,
};

use crate::common::TestHarness;
use crate::skip_if_no_rpc;

const FEE_RECEIVER: Address = address!("000000000000000000000000000000000000fee5");

#[tokio::test]
async fn test_deployed_safe_reports_deployed() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let params = harness.params(8_001);
    let (safe_address, _) = harness
        .deploy_safe(&params)
        .await
        .expect("Failed to deploy Safe");

    let status = safe_clone::check_chain(&harness.client(), &params, safe_address, None)
        .await
        .expect("Feasibility check failed");

    assert!(status.is_deployed);
    assert!(!status.can_deploy);
}

#[tokio::test]
async fn test_factory_reproduces_undeployed_safe() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let params = harness.params(8_002);
    let safe_address = harness.predict(&params).await;

    let status = safe_clone::check_chain(&harness.client(), &params, safe_address, None)
        .await
        .expect("Feasibility check failed");

    assert!(!status.is_deployed);
    assert!(status.can_deploy);
    assert_eq!(status.method, DeployMethod::Factory);
}

#[tokio::test]
async fn test_wrong_target_is_not_deployable() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let params = harness.params(8_003);
    let unrelated = address!("00000000000000000000000000000000deadbeef");

    let status = safe_clone::check_chain(&harness.client(), &params, unrelated, None)
        .await
        .expect("Feasibility check failed");

    assert!(!status.can_deploy);
    assert_eq!(status.method, DeployMethod::None);
}

#[tokio::test]
async fn test_factory_deploy_pays_fee_and_creates_safe() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let params = harness.params(8_004);
    let safe_address = harness.predict(&params).await;
    let fee = U256::from(1_000_000_000_000_000u64);

    let config = SessionConfig {
        fees: FeeConfig {
            receiver: FEE_RECEIVER,
            amount: fee,
            exempt_chains: vec![],
        },
        executor: ExecutorConfig { confirmations: 1 },
        ..Default::default()
    };
    let mut session = Session::connect(
        harness.signer_address(),
        vec![harness.chain()],
        NoIndexer,
        config,
    );

    let status = session
        .check_chain(harness.chain_id, &params, safe_address, None)
        .await
        .expect("Feasibility check failed");
    assert_eq!(status.method, DeployMethod::Factory);

    let balance_before = harness.get_balance(FEE_RECEIVER).await.unwrap();
    let receipt = session
        .deploy(harness.chain_id, safe_address, &status, &params, None)
        .await
        .expect("Deployment failed");

    assert_eq!(receipt.method, DeployMethod::Factory);
    assert_eq!(receipt.fee, Some(fee));
    assert!(receipt.status.expect("re-checked status").is_deployed);
    assert_eq!(session.active_chain(), Some(harness.chain_id));

    let code = harness.provider.get_code_at(safe_address).await.unwrap();
    assert!(!code.is_empty(), "Safe should have code deployed");
    let balance_after = harness.get_balance(FEE_RECEIVER).await.unwrap();
    assert_eq!(balance_after - balance_before, fee);
}

#[tokio::test]
async fn test_refresh_board_marks_chain_deployed() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let params = harness.params(8_005);
    let (safe_address, _) = harness
        .deploy_safe(&params)
        .await
        .expect("Failed to deploy Safe");

    let session = Session::read_only(vec![harness.chain()], NoIndexer, SessionConfig::default());
    let mut board = session.board(safe_address, params);
    assert!(board.is_loading());

    session.refresh_board(&mut board, None).await;

    assert!(!board.is_loading());
    let status = board.status(harness.chain_id).expect("chain on board");
    assert!(status.is_deployed);
}
