//! Decides whether a Safe can be reproduced at its address on a chain

use alloy::primitives::{Address, Bytes, B256};
use tracing::debug;

use crate::chain::{CallRequest, ChainClient, OriginalTransaction};
use crate::error::Result;
use crate::types::{ChainDeploymentStatus, DeployMethod, DeploymentParameters};

/// Classifies `chain` for `target`.
///
/// Order: bytecode presence, legacy variant, factory dry-run, then a literal
/// replay of `original` from its sender. The replay call is only made when
/// the factory dry-run does not produce `target`. Dry-run failures fall
/// through; only the bytecode check propagates errors.
pub async fn check_chain<C: ChainClient>(
    client: &C,
    params: &DeploymentParameters,
    target: Address,
    original: Option<&OriginalTransaction>,
) -> Result<ChainDeploymentStatus> {
    let chain_id = client.chain_id();

    let code = client.get_code(target).await?;
    if !code.is_empty() {
        debug!(chain_id, %target, "already deployed");
        return Ok(ChainDeploymentStatus::deployed(chain_id));
    }

    if !params.variant.is_cloneable() {
        debug!(chain_id, variant = %params.variant, "variant is not cloneable");
        return Ok(ChainDeploymentStatus::blocked(chain_id));
    }

    if factory_reproduces(client, params, target).await {
        return Ok(ChainDeploymentStatus::deployable(chain_id, DeployMethod::Factory));
    }

    if let Some(request) = original.and_then(OriginalTransaction::replay_request) {
        match client.call(&request).await {
            Ok(data) if low_address(&data) == Some(target) => {
                return Ok(ChainDeploymentStatus::deployable(
                    chain_id,
                    DeployMethod::DirectReplay,
                ));
            }
            Ok(data) => debug!(chain_id, returned = %data, "replay produced a different address"),
            Err(e) => debug!(chain_id, error = %e, "replay dry-run failed"),
        }
    }

    Ok(ChainDeploymentStatus::blocked(chain_id))
}

async fn factory_reproduces<C: ChainClient>(
    client: &C,
    params: &DeploymentParameters,
    target: Address,
) -> bool {
    let chain_id = client.chain_id();
    let request = CallRequest::new(params.addresses().proxy_factory, params.create_call());
    match client.call(&request).await {
        Ok(data) => {
            let predicted = first_word_address(&data);
            debug!(chain_id, ?predicted, %target, "factory dry-run");
            predicted == Some(target)
        }
        Err(e) => {
            debug!(chain_id, error = %e, "factory dry-run failed");
            false
        }
    }
}

/// Address ABI-encoded in the first return word
fn first_word_address(data: &Bytes) -> Option<Address> {
    let word = data.get(..32)?;
    Some(Address::from_word(B256::from_slice(word)))
}

/// Low-order 20 bytes of the return data
fn low_address(data: &Bytes) -> Option<Address> {
    let start = data.len().checked_sub(20)?;
    Some(Address::from_slice(&data[start..]))
}
