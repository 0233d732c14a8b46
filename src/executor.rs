//! Submits redeployments once a chain has been found deployable

use alloy::primitives::{Address, Bytes, TxHash, U256};
use alloy::sol_types::SolCall;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::chain::{CallRequest, ChainClient, FeeConfig, OriginalTransaction};
use crate::contracts::{IMulticall3, MULTICALL3};
use crate::error::{Error, Result};
use crate::feasibility::check_chain;
use crate::indexer::CreationIndexer;
use crate::session::Session;
use crate::types::{ChainDeploymentStatus, DeployMethod, DeploymentParameters};

/// Result of a mined, successful deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentReceipt {
    pub chain_id: u64,
    pub tx_hash: TxHash,
    pub method: DeployMethod,
    /// Fee bundled into a factory batch, if any
    pub fee: Option<U256>,
    /// Set when gas estimation for a replay failed but the send went ahead
    pub gas_warning: Option<String>,
    /// Status re-read from the chain after the transaction was mined;
    /// `None` when that re-check failed
    pub status: Option<ChainDeploymentStatus>,
    /// Why the post-deployment re-check failed, if it did
    pub recheck_error: Option<String>,
}

/// Deploys the Safe at `target` on `chain_id` using the method in `status`.
///
/// The session is switched to the chain first. Failures are returned as-is and
/// never retried. Once the transaction is mined the receipt is always
/// returned, even if the follow-up status check fails.
pub async fn deploy<C, I>(
    session: &mut Session<C, I>,
    chain_id: u64,
    target: Address,
    status: &ChainDeploymentStatus,
    params: &DeploymentParameters,
    original: Option<&OriginalTransaction>,
) -> Result<DeploymentReceipt>
where
    C: ChainClient,
    I: CreationIndexer,
{
    if !status.can_deploy || status.chain_id != chain_id {
        return Err(Error::CannotDeploy { chain_id });
    }
    let account = session.account().ok_or(Error::NoAccount)?;
    session.switch_chain(chain_id).await?;

    let client = &session.chain(chain_id)?.client;
    let config = session.config();

    let (request, fee, gas_warning) = match status.method {
        DeployMethod::DirectReplay => {
            let request = original
                .and_then(OriginalTransaction::replay_request)
                .ok_or(Error::CannotDeploy { chain_id })?
                .from(account);
            let gas_warning = match client.estimate_gas(&request).await {
                Ok(gas) => {
                    debug!(chain_id, gas, "replay gas estimate");
                    None
                }
                Err(e) => {
                    warn!(chain_id, error = %e, "gas estimation failed for replay");
                    Some(format!(
                        "gas estimation failed, the transaction will likely revert: {}",
                        e
                    ))
                }
            };
            (request, None, gas_warning)
        }
        DeployMethod::Factory => {
            let fee = fee_transfer(&config.fees, chain_id);
            let request = factory_batch(params, fee).from(account);
            (request, fee.map(|(_, amount)| amount), None)
        }
        DeployMethod::None => return Err(Error::CannotDeploy { chain_id }),
    };

    info!(
        chain_id,
        method = ?status.method,
        to = %request.to,
        value = %request.value,
        "submitting deployment"
    );
    let outcome = client
        .send_transaction(&request, config.executor.confirmations)
        .await?;
    if !outcome.success {
        return Err(Error::TransactionReverted {
            tx_hash: outcome.tx_hash,
        });
    }
    info!(chain_id, tx = %outcome.tx_hash, "deployment mined");

    let (refreshed, recheck_error) = match check_chain(client, params, target, original).await {
        Ok(refreshed) => (Some(refreshed), None),
        Err(e) => {
            warn!(chain_id, tx = %outcome.tx_hash, error = %e, "status re-check after deployment failed");
            (None, Some(e.to_string()))
        }
    };
    Ok(DeploymentReceipt {
        chain_id,
        tx_hash: outcome.tx_hash,
        method: status.method,
        fee,
        gas_warning,
        status: refreshed,
        recheck_error,
    })
}

fn fee_transfer(fees: &FeeConfig, chain_id: u64) -> Option<(Address, U256)> {
    fees.fee_for(chain_id).map(|amount| (fees.receiver, amount))
}

/// Multicall3 `aggregate3Value` batch: optional fee transfer, then the
/// factory call. No call may fail.
pub fn factory_batch(params: &DeploymentParameters, fee: Option<(Address, U256)>) -> CallRequest {
    let mut calls = Vec::with_capacity(2);
    if let Some((receiver, amount)) = fee {
        calls.push(IMulticall3::Call3Value {
            target: receiver,
            allowFailure: false,
            value: amount,
            callData: Bytes::new(),
        });
    }
    calls.push(IMulticall3::Call3Value {
        target: params.addresses().proxy_factory,
        allowFailure: false,
        value: U256::ZERO,
        callData: params.create_call(),
    });

    let value = fee.map_or(U256::ZERO, |(_, amount)| amount);
    let data = IMulticall3::aggregate3ValueCall { calls }.abi_encode();
    CallRequest::new(MULTICALL3, data).with_value(value)
}
