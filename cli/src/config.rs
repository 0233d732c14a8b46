//! Chain list file and provider construction

use std::path::Path;

use alloy::network::{AnyNetwork, EthereumWallet};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use color_eyre::eyre::{eyre, Result, WrapErr};
use safe_clone::{ChainConfig, ChainHandle, RpcClient, TransactionServiceIndexer};
use serde::Deserialize;
use url::Url;

pub type Client = RpcClient<DynProvider<AnyNetwork>>;

/// One entry of the chains file
#[derive(Debug, Clone, Deserialize)]
pub struct ChainEntry {
    pub chain_id: u64,
    pub rpc_url: Url,
    #[serde(default)]
    pub indexer_url: Option<Url>,
}

impl ChainEntry {
    pub fn config(&self) -> ChainConfig {
        let config = ChainConfig::new(self.chain_id);
        match &self.indexer_url {
            Some(url) => config.with_indexer(url.clone()),
            None => config,
        }
    }
}

pub fn parse_chains(json: &str) -> Result<Vec<ChainEntry>> {
    let entries: Vec<ChainEntry> = serde_json::from_str(json)?;
    if entries.is_empty() {
        return Err(eyre!("chains file lists no chains"));
    }
    for (i, entry) in entries.iter().enumerate() {
        if entries[..i].iter().any(|other| other.chain_id == entry.chain_id) {
            return Err(eyre!("chain {} is listed twice", entry.chain_id));
        }
    }
    Ok(entries)
}

pub fn load_chains(path: &Path) -> Result<Vec<ChainEntry>> {
    let json = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read chains file {}", path.display()))?;
    parse_chains(&json).wrap_err_with(|| format!("invalid chains file {}", path.display()))
}

pub fn indexer(entries: &[ChainEntry]) -> TransactionServiceIndexer {
    let configs: Vec<ChainConfig> = entries.iter().map(ChainEntry::config).collect();
    TransactionServiceIndexer::from_configs(&configs)
}

/// Read-only clients in file order
pub fn read_only_chains(entries: &[ChainEntry]) -> Vec<ChainHandle<Client>> {
    entries
        .iter()
        .map(|entry| {
            let provider = ProviderBuilder::new()
                .network::<AnyNetwork>()
                .connect_http(entry.rpc_url.clone())
                .erased();
            ChainHandle::new(entry.config(), RpcClient::new(provider, entry.chain_id))
        })
        .collect()
}

/// Clients that sign with `signer`
pub fn wallet_chains(entries: &[ChainEntry], signer: PrivateKeySigner) -> Vec<ChainHandle<Client>> {
    let wallet = EthereumWallet::from(signer);
    entries
        .iter()
        .map(|entry| {
            let provider = ProviderBuilder::new()
                .network::<AnyNetwork>()
                .wallet(wallet.clone())
                .connect_http(entry.rpc_url.clone())
                .erased();
            ChainHandle::new(entry.config(), RpcClient::new(provider, entry.chain_id))
        })
        .collect()
}
