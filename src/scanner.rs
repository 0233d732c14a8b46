//! Multi-chain search for a Safe's creation transaction.
//!
//! Chains are visited one at a time in configuration order, and within a chain
//! the fallback log scan walks its windows one at a time. [`scan_chains`] is a
//! lazy stream: nothing is queried until it is polled, and dropping it stops
//! the scan before the next chain.

use std::pin::pin;

use alloy::primitives::{Address, TxHash};
use alloy::sol_types::SolEvent;
use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::chain::{ChainClient, ChainConfig, LogQuery, OriginalTransaction, ScanConfig};
use crate::contracts::ISafe;
use crate::encoding::decode_create_input;
use crate::error::{Error, Result};
use crate::indexer::CreationIndexer;
use crate::types::DeploymentParameters;

/// A configured chain and the client used to reach it
#[derive(Debug, Clone)]
pub struct ChainHandle<C> {
    pub config: ChainConfig,
    pub client: C,
}

impl<C: ChainClient> ChainHandle<C> {
    pub fn new(config: ChainConfig, client: C) -> Self {
        Self { config, client }
    }

    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }
}

/// What scanning one chain produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No bytecode at the target
    NoContract,
    /// Creation transaction located
    Found(TxHash),
    /// A contract exists but neither the indexer nor the logs name its creation
    Untraceable,
    /// The bytecode check itself failed
    Unreachable(String),
}

/// Per-chain item yielded by [`scan_chains`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainScan {
    pub chain_id: u64,
    pub outcome: ScanOutcome,
}

/// Where a Safe was originally created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationRecord {
    pub chain_id: u64,
    pub transaction_hash: TxHash,
}

/// A located creation transaction together with its decoded parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredSafe {
    pub chain_id: u64,
    pub transaction: OriginalTransaction,
    pub params: DeploymentParameters,
}

/// Scans `chains` in order, yielding one [`ChainScan`] per chain.
pub fn scan_chains<'a, C, I>(
    chains: &'a [ChainHandle<C>],
    indexer: &'a I,
    target: Address,
    config: ScanConfig,
) -> impl Stream<Item = ChainScan> + 'a
where
    C: ChainClient + 'a,
    I: CreationIndexer + 'a,
{
    stream::iter(chains).then(move |chain| scan_chain(chain, indexer, target, config))
}

/// Returns the first chain whose scan finds the creation transaction.
///
/// Chains after the first match are never queried.
pub async fn locate_creation_transaction<C, I>(
    chains: &[ChainHandle<C>],
    indexer: &I,
    target: Address,
    config: ScanConfig,
) -> Result<CreationRecord>
where
    C: ChainClient,
    I: CreationIndexer,
{
    let mut scans = pin!(scan_chains(chains, indexer, target, config));
    while let Some(scan) = scans.next().await {
        if let ScanOutcome::Found(transaction_hash) = scan.outcome {
            info!(chain_id = scan.chain_id, %target, tx = %transaction_hash, "found creation transaction");
            return Ok(CreationRecord {
                chain_id: scan.chain_id,
                transaction_hash,
            });
        }
    }
    debug!(%target, chains = chains.len(), "no creation transaction on any chain");
    Err(Error::NotFound(target))
}

/// Locates the creation transaction, fetches it and decodes its parameters
pub async fn recover_safe<C, I>(
    chains: &[ChainHandle<C>],
    indexer: &I,
    target: Address,
    config: ScanConfig,
) -> Result<RecoveredSafe>
where
    C: ChainClient,
    I: CreationIndexer,
{
    let record = locate_creation_transaction(chains, indexer, target, config).await?;
    let chain = chains
        .iter()
        .find(|chain| chain.chain_id() == record.chain_id)
        .ok_or(Error::UnsupportedChain(record.chain_id))?;

    let transaction = chain
        .client
        .get_transaction(record.transaction_hash)
        .await?
        .ok_or(Error::NotFound(target))?;
    let params = decode_create_input(&transaction.input)?;
    debug!(
        chain_id = record.chain_id,
        owners = params.owners.len(),
        threshold = params.threshold,
        variant = %params.variant,
        "decoded creation parameters"
    );

    Ok(RecoveredSafe {
        chain_id: record.chain_id,
        transaction,
        params,
    })
}

async fn scan_chain<C, I>(
    chain: &ChainHandle<C>,
    indexer: &I,
    target: Address,
    config: ScanConfig,
) -> ChainScan
where
    C: ChainClient,
    I: CreationIndexer,
{
    let chain_id = chain.chain_id();
    let outcome = match chain.client.get_code(target).await {
        Err(e) => {
            warn!(chain_id, error = %e, "bytecode check failed, skipping chain");
            ScanOutcome::Unreachable(e.to_string())
        }
        Ok(code) if code.is_empty() => {
            debug!(chain_id, %target, "no contract");
            ScanOutcome::NoContract
        }
        Ok(_) => match find_creation(chain, indexer, target, config).await {
            Some(hash) => ScanOutcome::Found(hash),
            None => {
                debug!(chain_id, %target, "contract exists but creation is untraceable");
                ScanOutcome::Untraceable
            }
        },
    };
    ChainScan { chain_id, outcome }
}

async fn find_creation<C, I>(
    chain: &ChainHandle<C>,
    indexer: &I,
    target: Address,
    config: ScanConfig,
) -> Option<TxHash>
where
    C: ChainClient,
    I: CreationIndexer,
{
    let chain_id = chain.chain_id();
    if indexer.supports(chain_id) {
        match indexer.creation_transaction(chain_id, target).await {
            Ok(Some(hash)) => return Some(hash),
            Ok(None) => debug!(chain_id, "indexer has no creation record"),
            Err(e) => warn!(chain_id, error = %e, "indexer lookup failed, scanning logs"),
        }
    }
    scan_creation_logs(&chain.client, target, config.log_window).await
}

/// Walks `[0, head]` in `log_window`-sized windows looking for `SafeSetup`
/// emitted by `target`.
///
/// Keeps the last match seen across all windows rather than the first.
pub async fn scan_creation_logs<C: ChainClient>(
    client: &C,
    target: Address,
    log_window: u64,
) -> Option<TxHash> {
    let chain_id = client.chain_id();
    let head = match client.block_number().await {
        Ok(head) => head,
        Err(e) => {
            warn!(chain_id, error = %e, "failed to read head, skipping log scan");
            return None;
        }
    };

    let window = log_window.max(1);
    let mut found = None;
    let mut from_block: u64 = 0;
    loop {
        let to_block = from_block.saturating_add(window - 1).min(head);
        let query = LogQuery {
            addresses: vec![target],
            topic0: ISafe::SafeSetup::SIGNATURE_HASH,
            topic1: None,
            from_block,
            to_block,
        };
        debug!(chain_id, from_block, to_block, "scanning creation logs");

        match client.get_logs(&query).await {
            Ok(logs) => {
                if let Some(log) = logs.last() {
                    found = Some(log.transaction_hash);
                }
            }
            Err(e) => warn!(chain_id, from_block, to_block, error = %e, "log window failed"),
        }

        if to_block >= head {
            break;
        }
        from_block = to_block + 1;
    }
    found
}
