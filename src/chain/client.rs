//! RPC boundary used by the scanner, feasibility checker, executor and reconciler.
//!
//! Everything above this module talks to a chain through [`ChainClient`], so the
//! multi-chain logic can be driven by any provider (or a scripted one in tests).

use std::future::Future;

use alloy::network::primitives::ReceiptResponse;
use alloy::network::{AnyNetwork, Network, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash, B256, U256};
use alloy::providers::Provider;
use alloy::rpc::types::Filter;

use crate::error::{Error, Result};

/// A call or transaction request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRequest {
    /// Sender; left to the node/wallet when `None`
    pub from: Option<Address>,
    /// Target contract
    pub to: Address,
    /// Calldata
    pub data: Bytes,
    /// Native value in wei
    pub value: U256,
}

impl CallRequest {
    /// Creates a zero-value call without an explicit sender
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            from: None,
            to,
            data: data.into(),
            value: U256::ZERO,
        }
    }

    /// Sets the sender
    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Sets the native value
    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }
}

/// Inclusive block-range log query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    /// Emitting contracts
    pub addresses: Vec<Address>,
    /// Event signature
    pub topic0: B256,
    /// First indexed argument, if constrained
    pub topic1: Option<B256>,
    pub from_block: u64,
    pub to_block: u64,
}

impl LogQuery {
    /// Returns true if `log` satisfies the address and topic constraints
    pub fn matches(&self, log: &ChainLog) -> bool {
        self.addresses.contains(&log.address)
            && log.topics.first() == Some(&self.topic0)
            && self
                .topic1
                .map_or(true, |topic| log.topics.get(1) == Some(&topic))
            && (self.from_block..=self.to_block).contains(&log.block_number)
    }
}

/// A mined log with the position data needed for de-duplication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: u64,
    pub log_index: u64,
    pub transaction_hash: TxHash,
}

/// The fields of a historical transaction needed to replay it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalTransaction {
    pub hash: TxHash,
    pub from: Address,
    /// `None` for contract-creation transactions
    pub to: Option<Address>,
    pub input: Bytes,
    pub value: U256,
}

impl OriginalTransaction {
    /// Returns the literal replay request, if the transaction had a recipient
    pub fn replay_request(&self) -> Option<CallRequest> {
        let to = self.to?;
        Some(CallRequest {
            from: Some(self.from),
            to,
            data: self.input.clone(),
            value: self.value,
        })
    }
}

/// Outcome of a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOutcome {
    pub tx_hash: TxHash,
    /// Receipt status, not just inclusion
    pub success: bool,
}

/// Asynchronous access to one chain.
///
/// Implementations never retry; callers decide whether a failure falls through
/// to another method or chain.
pub trait ChainClient: Send + Sync {
    /// The chain this client is configured for.
    fn chain_id(&self) -> u64;

    /// Asks the node which chain it serves.
    fn fetch_chain_id(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Returns the runtime bytecode at `address` (empty when there is no contract).
    fn get_code(&self, address: Address) -> impl Future<Output = Result<Bytes>> + Send;

    /// Returns the current head block number.
    fn block_number(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Fetches the logs matching `query`.
    fn get_logs(&self, query: &LogQuery) -> impl Future<Output = Result<Vec<ChainLog>>> + Send;

    /// Fetches a historical transaction.
    fn get_transaction(
        &self,
        hash: TxHash,
    ) -> impl Future<Output = Result<Option<OriginalTransaction>>> + Send;

    /// Executes a read-only call (`eth_call`) and returns the raw return data.
    fn call(&self, request: &CallRequest) -> impl Future<Output = Result<Bytes>> + Send;

    /// Estimates gas for `request`.
    fn estimate_gas(&self, request: &CallRequest) -> impl Future<Output = Result<u64>> + Send;

    /// Sends `request` through the connected wallet and waits for `confirmations`.
    fn send_transaction(
        &self,
        request: &CallRequest,
        confirmations: u64,
    ) -> impl Future<Output = Result<TxOutcome>> + Send;
}

/// [`ChainClient`] backed by an alloy provider.
///
/// Sending requires the provider to carry a wallet filler.
#[derive(Debug, Clone)]
pub struct RpcClient<P> {
    provider: P,
    chain_id: u64,
}

impl<P> RpcClient<P>
where
    P: Provider<AnyNetwork> + Clone + 'static,
{
    /// Wraps a provider for an already known chain
    pub fn new(provider: P, chain_id: u64) -> Self {
        Self { provider, chain_id }
    }

    /// Wraps a provider, asking the node for its chain ID
    pub async fn connect(provider: P) -> Result<Self> {
        let chain_id = provider
            .get_chain_id()
            .await
            .map_err(|e| Error::Provider(e.to_string()))?;
        Ok(Self::new(provider, chain_id))
    }

    /// Returns a reference to the provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn transaction_request(request: &CallRequest) -> <AnyNetwork as Network>::TransactionRequest {
        let tx = <AnyNetwork as Network>::TransactionRequest::default()
            .with_to(request.to)
            .with_value(request.value)
            .with_input(request.data.clone());
        match request.from {
            Some(from) => tx.with_from(from),
            None => tx,
        }
    }
}

impl<P> ChainClient for RpcClient<P>
where
    P: Provider<AnyNetwork> + Clone + 'static,
{
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn fetch_chain_id(&self) -> Result<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| Error::Fetch {
                what: "chain id",
                reason: e.to_string(),
            })
    }

    async fn get_code(&self, address: Address) -> Result<Bytes> {
        self.provider
            .get_code_at(address)
            .await
            .map_err(|e| Error::Fetch {
                what: "bytecode",
                reason: e.to_string(),
            })
    }

    async fn block_number(&self) -> Result<u64> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| Error::Fetch {
                what: "block number",
                reason: e.to_string(),
            })
    }

    async fn get_logs(&self, query: &LogQuery) -> Result<Vec<ChainLog>> {
        let mut filter = Filter::new()
            .address(query.addresses.clone())
            .event_signature(query.topic0)
            .from_block(query.from_block)
            .to_block(query.to_block);
        if let Some(topic1) = query.topic1 {
            filter = filter.topic1(topic1);
        }

        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(|e| Error::Fetch {
                what: "logs",
                reason: e.to_string(),
            })?;

        // Pending logs carry no position and are skipped
        Ok(logs
            .into_iter()
            .filter_map(|log| {
                Some(ChainLog {
                    address: log.inner.address,
                    topics: log.inner.data.topics().to_vec(),
                    data: log.inner.data.data.clone(),
                    block_number: log.block_number?,
                    log_index: log.log_index?,
                    transaction_hash: log.transaction_hash?,
                })
            })
            .collect())
    }

    async fn get_transaction(&self, hash: TxHash) -> Result<Option<OriginalTransaction>> {
        let tx = self
            .provider
            .get_transaction_by_hash(hash)
            .await
            .map_err(|e| Error::Fetch {
                what: "transaction",
                reason: e.to_string(),
            })?;

        Ok(tx.map(|tx| OriginalTransaction {
            hash,
            from: alloy::network::TransactionResponse::from(&tx),
            to: alloy::consensus::Transaction::to(&tx),
            input: alloy::consensus::Transaction::input(&tx).clone(),
            value: alloy::consensus::Transaction::value(&tx),
        }))
    }

    async fn call(&self, request: &CallRequest) -> Result<Bytes> {
        self.provider
            .call(Self::transaction_request(request))
            .await
            .map_err(|e| Error::SimulationReverted {
                reason: e.to_string(),
            })
    }

    async fn estimate_gas(&self, request: &CallRequest) -> Result<u64> {
        self.provider
            .estimate_gas(Self::transaction_request(request))
            .await
            .map_err(|e| Error::Provider(format!("gas estimation failed: {}", e)))
    }

    async fn send_transaction(&self, request: &CallRequest, confirmations: u64) -> Result<TxOutcome> {
        let pending_tx = self
            .provider
            .send_transaction(Self::transaction_request(request))
            .await
            .map_err(Error::from_send)?;

        let receipt = pending_tx
            .with_required_confirmations(confirmations)
            .get_receipt()
            .await
            .map_err(|e| Error::ExecutionFailed {
                reason: e.to_string(),
            })?;

        Ok(TxOutcome {
            tx_hash: receipt.transaction_hash,
            success: receipt.status(),
        })
    }
}
