//! Chain configuration: canonical Safe addresses and per-operation settings

use alloy::primitives::{address, Address, U256};
use url::Url;

/// Contracts used by the newer v1.4.1 setup to move a Safe onto its L2 singleton
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L2Setup {
    /// SafeToL2Setup contract, delegate-called from `setup`
    pub setup_contract: Address,
    /// L2 singleton passed to `setupToL2`
    pub l2_singleton: Address,
}

/// Canonical Safe contract addresses for one implementation release.
/// These addresses are the same across all supported chains (CREATE2 deployment)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainAddresses {
    /// Singleton passed to the proxy factory
    pub safe_singleton: Address,
    /// Safe proxy factory address
    pub proxy_factory: Address,
    /// Compatibility fallback handler
    pub fallback_handler: Address,
    /// Present only for the layout that embeds a `setupToL2` call
    pub l2_setup: Option<L2Setup>,
}

impl Default for ChainAddresses {
    fn default() -> Self {
        Self::v1_4_1_l2()
    }
}

impl ChainAddresses {
    /// Safe v1.4.1 deployed through SafeToL2Setup
    pub const fn v1_4_1_l2() -> Self {
        Self {
            safe_singleton: address!("41675C099F32341bf84BFc5382aF534df5C7461a"),
            proxy_factory: address!("4e1DCf7AD4e460CfD30791CCC4F9c8a4f820ec67"),
            fallback_handler: address!("fd0732Dc9E303f09fCEf3a7388Ad10A83459Ec99"),
            l2_setup: Some(L2Setup {
                setup_contract: address!("BD89A1CE4DDe368FFAB0eC35506eEcE0b1fFdc54"),
                l2_singleton: address!("29fcB43b46531BcA003ddC8FCB67FFE91900C762"),
            }),
        }
    }

    /// SafeL2 v1.3.0
    pub const fn v1_3_0_l2() -> Self {
        Self {
            safe_singleton: address!("3E5c63644E683549055b9Be8653de26E0B4CD36E"),
            proxy_factory: address!("a6B71E26C5e0845f74c812102Ca7114b6a896AB2"),
            fallback_handler: address!("f48f2B2d2a534e402487b3ee7C18c33Aec0Fe5e4"),
            l2_setup: None,
        }
    }

    /// Safe v1.3.0 with the L1 singleton
    pub const fn v1_3_0() -> Self {
        Self {
            safe_singleton: address!("d9Db270c1B5E3Bd161E8c8503c55cEABeE709552"),
            proxy_factory: address!("a6B71E26C5e0845f74c812102Ca7114b6a896AB2"),
            fallback_handler: address!("f48f2B2d2a534e402487b3ee7C18c33Aec0Fe5e4"),
            l2_setup: None,
        }
    }
}

/// Per-chain configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    /// Chain ID
    pub chain_id: u64,
    /// Safe transaction service base URL (e.g. `https://.../api/v1`), if any
    pub indexer_url: Option<Url>,
}

impl ChainConfig {
    /// Creates a configuration without an indexer
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            indexer_url: None,
        }
    }

    /// Sets the transaction service endpoint for this chain
    pub fn with_indexer(mut self, url: Url) -> Self {
        self.indexer_url = Some(url);
        self
    }

    /// Returns configuration for Ethereum mainnet
    pub fn mainnet() -> Self {
        Self::new(chain_ids::MAINNET)
    }

    /// Returns configuration for Optimism
    pub fn optimism() -> Self {
        Self::new(chain_ids::OPTIMISM)
    }

    /// Returns configuration for Arbitrum
    pub fn arbitrum() -> Self {
        Self::new(chain_ids::ARBITRUM)
    }

    /// Returns configuration for Base
    pub fn base() -> Self {
        Self::new(chain_ids::BASE)
    }

    /// Returns configuration for Polygon
    pub fn polygon() -> Self {
        Self::new(chain_ids::POLYGON)
    }

    /// Returns configuration for Gnosis
    pub fn gnosis() -> Self {
        Self::new(chain_ids::GNOSIS)
    }
}

/// Well-known chain IDs
pub mod chain_ids {
    pub const MAINNET: u64 = 1;
    pub const OPTIMISM: u64 = 10;
    pub const BSC: u64 = 56;
    pub const GNOSIS: u64 = 100;
    pub const POLYGON: u64 = 137;
    pub const BASE: u64 = 8453;
    pub const ARBITRUM: u64 = 42161;
    pub const AVALANCHE: u64 = 43114;
    pub const SEPOLIA: u64 = 11155111;
}

/// Settings for locating creation transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Number of blocks per `eth_getLogs` window in the fallback log scan
    pub log_window: u64,
}

impl ScanConfig {
    pub const DEFAULT_LOG_WINDOW: u64 = 10_000_000;
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            log_window: Self::DEFAULT_LOG_WINDOW,
        }
    }
}

/// Optional fee bundled with factory deployments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeConfig {
    /// Receiver of the fee transfer
    pub receiver: Address,
    /// Fee in wei; zero disables the transfer
    pub amount: U256,
    /// Chains where no fee is charged
    pub exempt_chains: Vec<u64>,
}

impl FeeConfig {
    /// Returns the fee to charge on `chain_id`, if any
    pub fn fee_for(&self, chain_id: u64) -> Option<U256> {
        if self.amount.is_zero()
            || self.receiver == Address::ZERO
            || self.exempt_chains.contains(&chain_id)
        {
            return None;
        }
        Some(self.amount)
    }
}

/// Settings for submitting deployments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Confirmations to wait for before reading the receipt
    pub confirmations: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { confirmations: 1 }
    }
}

/// Settings for the allowance reconciler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllowanceConfig {
    /// Number of blocks per log page
    pub page_size: u64,
    /// First block to scan for the initial token set
    pub start_block: u64,
}

impl Default for AllowanceConfig {
    fn default() -> Self {
        Self {
            page_size: 100_000,
            start_block: 0,
        }
    }
}

/// Everything a session needs besides its chain clients
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    pub scan: ScanConfig,
    pub fees: FeeConfig,
    pub executor: ExecutorConfig,
}
