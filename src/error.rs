//! Error types for safe-clone

use alloy::primitives::{Address, TxHash};
use alloy::transports::{RpcError, TransportErrorKind};
use thiserror::Error;

/// Result type alias for safe-clone operations
pub type Result<T> = std::result::Result<T, Error>;

/// EIP-1193 error code returned by wallets when the user rejects a request
pub const USER_REJECTED_CODE: i64 = 4001;

/// Errors that can occur while recovering, checking or redeploying a Safe
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to talk to the RPC provider
    #[error("Provider error: {0}")]
    Provider(String),

    /// Failed to fetch data from the blockchain
    #[error("Failed to fetch {what}: {reason}")]
    Fetch { what: &'static str, reason: String },

    /// The chain is not part of the configured chain list
    #[error("Unsupported chain ID: {0}")]
    UnsupportedChain(u64),

    /// No creation transaction was found on any configured chain
    #[error("No Safe found at {0}")]
    NotFound(Address),

    /// Creation calldata could not be split into words or parsed
    #[error("Malformed calldata: {0}")]
    MalformedCalldata(String),

    /// Deployment parameters violate an invariant (threshold, owners)
    #[error("Invalid deployment parameters: {0}")]
    InvalidParameters(String),

    /// A dry-run call reverted
    #[error("Simulation reverted: {reason}")]
    SimulationReverted { reason: String },

    /// The transaction was mined but its receipt reports failure
    #[error("Transaction {tx_hash} reverted")]
    TransactionReverted { tx_hash: TxHash },

    /// The wallet refused to sign or send
    #[error("Wallet rejected the request: {0}")]
    WalletRejected(String),

    /// The session could not be moved to the requested chain
    #[error("Failed to switch to chain {chain_id}: {reason}")]
    ChainSwitchFailed { chain_id: u64, reason: String },

    /// Deployment was requested on a chain where it is not feasible
    #[error("Safe cannot be deployed on chain {chain_id}")]
    CannotDeploy { chain_id: u64 },

    /// Transaction submission or receipt retrieval failed
    #[error("Execution failed: {reason}")]
    ExecutionFailed { reason: String },

    /// Off-chain indexer request failed
    #[error("Indexer error: {0}")]
    Indexer(String),

    /// ABI encoding/decoding error
    #[error("ABI error: {0}")]
    Abi(String),

    /// A transaction was requested from a session without a wallet account
    #[error("No wallet account connected")]
    NoAccount,
}

impl Error {
    /// Returns true for outcomes meaning "no Safe could be recovered at this address".
    ///
    /// Both a missing creation transaction and undecodable calldata end up here.
    pub fn is_unrecoverable(&self) -> bool {
        matches!(self, Error::NotFound(_) | Error::MalformedCalldata(_))
    }

    /// Maps a transaction submission error, recognising wallet rejections.
    pub fn from_send(err: RpcError<TransportErrorKind>) -> Self {
        match &err {
            RpcError::ErrorResp(payload) if payload.code == USER_REJECTED_CODE => {
                Error::WalletRejected(payload.message.to_string())
            }
            _ => Error::ExecutionFailed {
                reason: err.to_string(),
            },
        }
    }
}

impl From<RpcError<TransportErrorKind>> for Error {
    fn from(err: RpcError<TransportErrorKind>) -> Self {
        Error::Provider(err.to_string())
    }
}

impl From<alloy::contract::Error> for Error {
    fn from(err: alloy::contract::Error) -> Self {
        Error::Provider(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Indexer(err.to_string())
    }
}
