//! Per-chain deployment status

use serde::Serialize;

/// How a Safe can be reproduced on a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeployMethod {
    /// Factory `createProxyWithNonce`, batchable with a fee transfer
    Factory,
    /// Literal replay of the original transaction
    DirectReplay,
    #[default]
    None,
}

/// Transient deployment state of one chain, recomputed on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChainDeploymentStatus {
    pub chain_id: u64,
    pub is_deployed: bool,
    pub can_deploy: bool,
    pub method: DeployMethod,
    pub is_loading: bool,
}

impl ChainDeploymentStatus {
    /// Placeholder while a check is in flight
    pub fn loading(chain_id: u64) -> Self {
        Self {
            chain_id,
            is_deployed: false,
            can_deploy: false,
            method: DeployMethod::None,
            is_loading: true,
        }
    }

    /// A Safe already exists at the target address
    pub fn deployed(chain_id: u64) -> Self {
        Self {
            is_deployed: true,
            is_loading: false,
            ..Self::loading(chain_id)
        }
    }

    /// Not deployed; deployable through `method`
    pub fn deployable(chain_id: u64, method: DeployMethod) -> Self {
        Self {
            can_deploy: method != DeployMethod::None,
            method,
            is_loading: false,
            ..Self::loading(chain_id)
        }
    }

    /// Not deployed and not reproducible
    pub fn blocked(chain_id: u64) -> Self {
        Self::deployable(chain_id, DeployMethod::None)
    }
}
