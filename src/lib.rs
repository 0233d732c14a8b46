//! # safe-clone
//!
//! Recover a Safe multisig's deployment parameters from its creation
//! transaction and reproduce it at the same address on other EVM chains.
//!
//! ## Features
//!
//! - Sequential multi-chain scan for the creation transaction (bytecode check,
//!   Safe transaction service, then a windowed `SafeSetup` log scan)
//! - Byte-exact codec for `setup` / `createProxyWithNonce` calldata across the
//!   v1.3.0 and v1.4.1 layouts
//! - Per-chain feasibility check: factory dry-run first, literal replay second
//! - Deployment through a Multicall3 batch (with an optional fee transfer) or a
//!   replay of the original transaction
//! - Historical ERC-20 allowance reconciliation from paged `Approval` logs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use safe_clone::{ChainConfig, ChainHandle, RpcClient, Session, SessionConfig};
//! use safe_clone::indexer::TransactionServiceIndexer;
//!
//! let chains = vec![
//!     ChainHandle::new(ChainConfig::mainnet(), RpcClient::connect(mainnet).await?),
//!     ChainHandle::new(ChainConfig::optimism(), RpcClient::connect(optimism).await?),
//! ];
//! let indexer = TransactionServiceIndexer::from_configs(chains.iter().map(|c| &c.config));
//! let mut session = Session::connect(account, chains, indexer, SessionConfig::default());
//!
//! // Find and decode the original deployment
//! let recovered = session.recover(safe_address).await?;
//!
//! // Check a destination chain, then deploy
//! let status = session
//!     .check_chain(8453, &recovered.params, safe_address, Some(&recovered.transaction))
//!     .await?;
//! if status.can_deploy {
//!     let receipt = session
//!         .deploy(8453, safe_address, &status, &recovered.params, Some(&recovered.transaction))
//!         .await?;
//!     println!("deployed in {}", receipt.tx_hash);
//! }
//! ```
//!
//! ## Allowances
//!
//! ```rust,ignore
//! use safe_clone::allowance::{AllowanceReconciler, Erc20AllowanceReader};
//!
//! let mut reconciler = AllowanceReconciler::new(1, owner, [usdc, dai], AllowanceConfig::default());
//! reconciler.sync(&client).await?;
//! let allowances = reconciler.reconcile(&Erc20AllowanceReader::new(&client)).await;
//! for allowance in allowances.non_zero() {
//!     println!("{} may spend {} of {}", allowance.spender, allowance.value, allowance.token);
//! }
//! ```

pub mod allowance;
pub mod board;
pub mod chain;
pub mod contracts;
pub mod create2;
pub mod encoding;
pub mod error;
pub mod executor;
pub mod feasibility;
pub mod indexer;
pub mod scanner;
pub mod session;
pub mod types;

// Re-export main types at crate root
pub use allowance::{AllowanceReconciler, AllowanceSet, ReconciledAllowance};
pub use board::{DeploymentBoard, Notice, NoticeKind};
pub use chain::{
    AllowanceConfig, ChainAddresses, ChainClient, ChainConfig, ExecutorConfig, FeeConfig,
    OriginalTransaction, RpcClient, ScanConfig, SessionConfig,
};
pub use create2::compute_create2_address;
pub use encoding::{decode_create_call, encode_create_call, encode_initializer};
pub use error::{Error, Result};
pub use executor::DeploymentReceipt;
pub use feasibility::check_chain;
pub use indexer::{CreationIndexer, NoIndexer, TransactionServiceIndexer};
pub use scanner::{
    locate_creation_transaction, recover_safe, scan_chains, ChainHandle, ChainScan,
    CreationRecord, RecoveredSafe, ScanOutcome,
};
pub use session::Session;
pub use types::{ChainDeploymentStatus, DeployMethod, DeploymentParameters, ImplementationVariant};

// Re-export alloy types that are commonly used
pub use alloy::network::AnyNetwork;
pub use alloy::primitives::{Address, Bytes, TxHash, U256};
pub use alloy::providers::Provider;
