//! Live allowance lookups

use std::future::Future;

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use tracing::warn;

use super::events::AllowanceKey;
use crate::chain::{CallRequest, ChainClient};
use crate::contracts::{IMulticall3, IERC20, MULTICALL3};
use crate::error::{Error, Result};

/// Reads the current allowance of each `(token, owner, spender)`.
///
/// Returns one result per key, in the order given. A key that cannot be read
/// fails on its own without affecting the others. Tokens with a non-standard
/// `allowance` get their own implementation.
pub trait AllowanceReader: Send + Sync {
    fn allowances(&self, keys: &[AllowanceKey]) -> impl Future<Output = Vec<Result<U256>>> + Send;
}

/// ERC-20 `allowance(owner, spender)` batched through Multicall3 `aggregate3`.
///
/// Every inner call sets `allowFailure`, so one reverting token only drops its
/// own entry. If the batch itself fails (no Multicall3 on the chain, malformed
/// return), each key is read with its own `eth_call`.
#[derive(Debug)]
pub struct Erc20AllowanceReader<'a, C> {
    client: &'a C,
}

impl<'a, C: ChainClient> Erc20AllowanceReader<'a, C> {
    pub fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// One `eth_call` against the token
    pub async fn allowance(&self, key: &AllowanceKey) -> Result<U256> {
        let returned = self
            .client
            .call(&CallRequest::new(key.token, allowance_calldata(key)))
            .await?;
        decode_word(key.token, &returned)
    }

    async fn read_batch(&self, keys: &[AllowanceKey]) -> Result<Vec<Result<U256>>> {
        let calls = keys
            .iter()
            .map(|key| IMulticall3::Call3 {
                target: key.token,
                allowFailure: true,
                callData: allowance_calldata(key).into(),
            })
            .collect();
        let data = IMulticall3::aggregate3Call { calls }.abi_encode();
        let returned = self.client.call(&CallRequest::new(MULTICALL3, data)).await?;

        let results = IMulticall3::aggregate3Call::abi_decode_returns(&returned)
            .map_err(|e| Error::Abi(format!("aggregate3 return: {e}")))?;
        if results.len() != keys.len() {
            return Err(Error::Abi(format!(
                "aggregate3 returned {} results for {} calls",
                results.len(),
                keys.len()
            )));
        }

        Ok(keys
            .iter()
            .zip(results)
            .map(|(key, result)| {
                if result.success {
                    decode_word(key.token, &result.returnData)
                } else {
                    Err(Error::SimulationReverted {
                        reason: format!("allowance() on {} reverted", key.token),
                    })
                }
            })
            .collect())
    }
}

impl<C: ChainClient> AllowanceReader for Erc20AllowanceReader<'_, C> {
    async fn allowances(&self, keys: &[AllowanceKey]) -> Vec<Result<U256>> {
        if keys.is_empty() {
            return Vec::new();
        }
        match self.read_batch(keys).await {
            Ok(values) => values,
            Err(e) => {
                warn!(
                    chain_id = self.client.chain_id(),
                    keys = keys.len(),
                    error = %e,
                    "batched allowance read failed, reading tokens one by one"
                );
                let mut values = Vec::with_capacity(keys.len());
                for key in keys {
                    values.push(self.allowance(key).await);
                }
                values
            }
        }
    }
}

fn allowance_calldata(key: &AllowanceKey) -> Vec<u8> {
    IERC20::allowanceCall {
        owner: key.owner,
        spender: key.spender,
    }
    .abi_encode()
}

fn decode_word(token: Address, returned: &[u8]) -> Result<U256> {
    returned
        .get(..32)
        .map(U256::from_be_slice)
        .ok_or_else(|| {
            Error::Abi(format!(
                "allowance() on {} returned {} bytes",
                token,
                returned.len()
            ))
        })
}
