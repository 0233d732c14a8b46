//! Chain configuration and the RPC boundary

pub mod client;
pub mod config;

pub use client::{CallRequest, ChainClient, ChainLog, LogQuery, OriginalTransaction, RpcClient, TxOutcome};
pub use config::{
    chain_ids, AllowanceConfig, ChainAddresses, ChainConfig, ExecutorConfig, FeeConfig, L2Setup,
    ScanConfig, SessionConfig,
};
