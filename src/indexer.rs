//! Off-chain lookup of Safe creation transactions

use std::collections::HashMap;
use std::future::Future;

use alloy::primitives::{Address, TxHash};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::chain::ChainConfig;
use crate::error::{Error, Result};

/// Source of creation transaction hashes that is faster than scanning logs
pub trait CreationIndexer: Send + Sync {
    /// Whether an endpoint is configured for `chain_id`.
    fn supports(&self, chain_id: u64) -> bool;

    /// Looks up the creation transaction of `address`; `None` if unknown.
    fn creation_transaction(
        &self,
        chain_id: u64,
        address: Address,
    ) -> impl Future<Output = Result<Option<TxHash>>> + Send;
}

/// Indexer that knows no chains; every scan falls back to logs
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndexer;

impl CreationIndexer for NoIndexer {
    fn supports(&self, _chain_id: u64) -> bool {
        false
    }

    async fn creation_transaction(&self, _chain_id: u64, _address: Address) -> Result<Option<TxHash>> {
        Ok(None)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreationResponse {
    transaction_hash: Option<TxHash>,
}

/// Safe transaction service client (`GET {base}/safes/{address}/creation/`)
#[derive(Debug, Clone, Default)]
pub struct TransactionServiceIndexer {
    client: reqwest::Client,
    endpoints: HashMap<u64, Url>,
}

impl TransactionServiceIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the `indexer_url` of every chain that has one
    pub fn from_configs<'a>(configs: impl IntoIterator<Item = &'a ChainConfig>) -> Self {
        configs
            .into_iter()
            .filter_map(|config| Some((config.chain_id, config.indexer_url.clone()?)))
            .fold(Self::new(), |indexer, (chain_id, url)| {
                indexer.with_endpoint(chain_id, url)
            })
    }

    /// Registers the service base URL for a chain
    pub fn with_endpoint(mut self, chain_id: u64, base: Url) -> Self {
        self.endpoints.insert(chain_id, base);
        self
    }

    /// Builds the creation endpoint for `address`
    pub fn creation_url(base: &Url, address: Address) -> String {
        format!(
            "{}/safes/{}/creation/",
            base.as_str().trim_end_matches('/'),
            address
        )
    }
}

impl CreationIndexer for TransactionServiceIndexer {
    fn supports(&self, chain_id: u64) -> bool {
        self.endpoints.contains_key(&chain_id)
    }

    async fn creation_transaction(&self, chain_id: u64, address: Address) -> Result<Option<TxHash>> {
        let base = self
            .endpoints
            .get(&chain_id)
            .ok_or(Error::UnsupportedChain(chain_id))?;
        let url = Self::creation_url(base, address);
        tracing::debug!(chain_id, %address, %url, "querying transaction service");

        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status()?;
        let body: CreationResponse = response.json().await?;
        Ok(body.transaction_hash)
    }
}
