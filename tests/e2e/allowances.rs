//! Allowance reconciliation against a MockERC20 on a fork

use alloy::primitives::{address, Address, U256};
use alloy::providers::Provider;
use safe_clone::allowance::{AllowanceReconciler, Erc20AllowanceReader};
use safe_clone::AllowanceConfig;

use crate::common::TestHarness;
use crate::skip_if_no_rpc;

const ROUTER: Address = address!("00000000000000000000000000000000000000cc");
const VAULT: Address = address!("00000000000000000000000000000000000000dd");

#[tokio::test]
async fn test_reconcile_reports_live_allowances() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();
    let (token, deployed_at) = harness
        .deploy_mock_erc20()
        .await
        .expect("Failed to deploy MockERC20");

    harness.approve(token, ROUTER, U256::from(100)).await.unwrap();
    harness.approve(token, VAULT, U256::MAX).await.unwrap();
    // revoked later: must come back with value zero
    harness.approve(token, ROUTER, U256::ZERO).await.unwrap();

    let client = harness.client();
    let mut reconciler = AllowanceReconciler::new(
        harness.chain_id,
        owner,
        [token],
        AllowanceConfig {
            page_size: 2,
            start_block: deployed_at,
        },
    );

    let report = reconciler.sync(&client).await.expect("Sync failed");
    assert_eq!(report.failed_pages, 0);
    assert_eq!(report.new_events, 3);
    // the revoked router approval replaces the first one
    assert_eq!(reconciler.events().len(), 2);

    let set = reconciler.reconcile(&Erc20AllowanceReader::new(&client)).await;
    assert_eq!(set.len(), 2);

    let live: Vec<_> = set.non_zero().collect();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].spender, VAULT);
    assert_eq!(live[0].value, U256::MAX);

    let router = set.by_spender(ROUTER).next().expect("router entry");
    assert!(router.value.is_zero());
}

#[tokio::test]
async fn test_added_token_is_backfilled() {
    skip_if_no_rpc!();

    let harness = TestHarness::new().await;
    let owner = harness.signer_address();
    let (first, first_block) = harness.deploy_mock_erc20().await.unwrap();
    let (second, second_block) = harness.deploy_mock_erc20().await.unwrap();

    harness.approve(first, ROUTER, U256::from(5)).await.unwrap();
    harness
        .set_allowance(second, owner, VAULT, U256::from(9))
        .await
        .unwrap();

    let client = harness.client();
    let mut reconciler = AllowanceReconciler::new(
        harness.chain_id,
        owner,
        [first],
        AllowanceConfig {
            page_size: 1_000,
            start_block: first_block,
        },
    );
    reconciler.sync(&client).await.unwrap();
    assert_eq!(reconciler.events().len(), 1);

    assert!(reconciler.add_token(second, second_block));
    let head = harness.provider.get_block_number().await.unwrap();
    reconciler.sync(&client).await.unwrap();
    assert!(reconciler.is_caught_up(head));

    let set = reconciler.reconcile(&Erc20AllowanceReader::new(&client)).await;
    assert_eq!(set.len(), 2);
    let newest = set.iter().next().unwrap();
    assert_eq!(newest.token, second);
    assert_eq!(newest.value, U256::from(9));
}
