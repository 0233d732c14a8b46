//! Connected wallet session: the context every operation runs in

use alloy::primitives::Address;
use futures::Stream;
use tracing::{info, warn};

use crate::board::DeploymentBoard;
use crate::chain::{ChainClient, OriginalTransaction, SessionConfig};
use crate::error::{Error, Result};
use crate::executor::{self, DeploymentReceipt};
use crate::feasibility;
use crate::indexer::{CreationIndexer, NoIndexer};
use crate::scanner::{self, ChainHandle, ChainScan, CreationRecord, RecoveredSafe};
use crate::types::{ChainDeploymentStatus, DeploymentParameters};

/// Chains, indexer, settings and the wallet account, created on connect and
/// consumed on disconnect.
///
/// The chain list order is the scan priority.
#[derive(Debug)]
pub struct Session<C, I = NoIndexer> {
    account: Option<Address>,
    chains: Vec<ChainHandle<C>>,
    indexer: I,
    config: SessionConfig,
    active_chain: Option<u64>,
}

impl<C, I> Session<C, I>
where
    C: ChainClient,
    I: CreationIndexer,
{
    /// Opens a session for `account`
    pub fn connect(
        account: Address,
        chains: Vec<ChainHandle<C>>,
        indexer: I,
        config: SessionConfig,
    ) -> Self {
        info!(%account, chains = chains.len(), "session connected");
        Self {
            account: Some(account),
            chains,
            indexer,
            config,
            active_chain: None,
        }
    }

    /// Opens a session that can scan and check but not deploy
    pub fn read_only(chains: Vec<ChainHandle<C>>, indexer: I, config: SessionConfig) -> Self {
        Self {
            account: None,
            chains,
            indexer,
            config,
            active_chain: None,
        }
    }

    /// Ends the session, releasing its clients
    pub fn disconnect(self) {
        info!(account = ?self.account, "session disconnected");
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn chains(&self) -> &[ChainHandle<C>] {
        &self.chains
    }

    pub fn chain_ids(&self) -> Vec<u64> {
        self.chains.iter().map(ChainHandle::chain_id).collect()
    }

    /// Returns the configured chain with `chain_id`
    pub fn chain(&self, chain_id: u64) -> Result<&ChainHandle<C>> {
        self.chains
            .iter()
            .find(|chain| chain.chain_id() == chain_id)
            .ok_or(Error::UnsupportedChain(chain_id))
    }

    pub fn indexer(&self) -> &I {
        &self.indexer
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Chain the session was last switched to
    pub fn active_chain(&self) -> Option<u64> {
        self.active_chain
    }

    /// Makes `chain_id` the active chain after confirming the RPC serves it
    pub async fn switch_chain(&mut self, chain_id: u64) -> Result<()> {
        if self.active_chain == Some(chain_id) {
            return Ok(());
        }
        let chain = self.chain(chain_id).map_err(|_| Error::ChainSwitchFailed {
            chain_id,
            reason: "chain is not configured".into(),
        })?;
        let reported = chain
            .client
            .fetch_chain_id()
            .await
            .map_err(|e| Error::ChainSwitchFailed {
                chain_id,
                reason: e.to_string(),
            })?;
        if reported != chain_id {
            warn!(chain_id, reported, "RPC serves a different chain");
            return Err(Error::ChainSwitchFailed {
                chain_id,
                reason: format!("RPC reports chain {}", reported),
            });
        }

        info!(chain_id, "switched chain");
        self.active_chain = Some(chain_id);
        Ok(())
    }

    /// Lazily scans every chain for `target`, see [`scanner::scan_chains`]
    pub fn scan(&self, target: Address) -> impl Stream<Item = ChainScan> + '_ {
        scanner::scan_chains(&self.chains, &self.indexer, target, self.config.scan)
    }

    pub async fn locate_creation_transaction(&self, target: Address) -> Result<CreationRecord> {
        scanner::locate_creation_transaction(&self.chains, &self.indexer, target, self.config.scan)
            .await
    }

    /// Locates and decodes the creation transaction of `target`
    pub async fn recover(&self, target: Address) -> Result<RecoveredSafe> {
        scanner::recover_safe(&self.chains, &self.indexer, target, self.config.scan).await
    }

    pub async fn check_chain(
        &self,
        chain_id: u64,
        params: &DeploymentParameters,
        target: Address,
        original: Option<&OriginalTransaction>,
    ) -> Result<ChainDeploymentStatus> {
        let chain = self.chain(chain_id)?;
        feasibility::check_chain(&chain.client, params, target, original).await
    }

    /// Creates a board covering every configured chain
    pub fn board(&self, target: Address, params: DeploymentParameters) -> DeploymentBoard {
        DeploymentBoard::new(target, params, self.chain_ids())
    }

    /// Re-checks every chain on `board`, one chain at a time.
    ///
    /// A chain whose check fails is marked not deployable and gets an error
    /// notice.
    pub async fn refresh_board(
        &self,
        board: &mut DeploymentBoard,
        original: Option<&OriginalTransaction>,
    ) {
        board.mark_loading();
        let target = board.target();
        let params = board.params().clone();
        for chain in &self.chains {
            let chain_id = chain.chain_id();
            match feasibility::check_chain(&chain.client, &params, target, original).await {
                Ok(status) => board.update(status),
                Err(e) => {
                    warn!(chain_id, error = %e, "feasibility check failed");
                    board.update(ChainDeploymentStatus::blocked(chain_id));
                    board.notify_error(chain_id, e.to_string());
                }
            }
        }
    }

    /// Deploys on `chain_id`, see [`executor::deploy`]
    pub async fn deploy(
        &mut self,
        chain_id: u64,
        target: Address,
        status: &ChainDeploymentStatus,
        params: &DeploymentParameters,
        original: Option<&OriginalTransaction>,
    ) -> Result<DeploymentReceipt> {
        executor::deploy(self, chain_id, target, status, params, original).await
    }

    /// Deploys the board's target on `chain_id` using the status the board
    /// holds for that chain.
    ///
    /// The outcome is posted to the board: the chain's status is replaced and a
    /// success or error notice is added.
    pub async fn deploy_on_board(
        &mut self,
        board: &mut DeploymentBoard,
        chain_id: u64,
        original: Option<&OriginalTransaction>,
    ) -> Result<DeploymentReceipt> {
        let status = board
            .status(chain_id)
            .copied()
            .ok_or(Error::UnsupportedChain(chain_id))?;
        let target = board.target();
        let params = board.params().clone();

        match self.deploy(chain_id, target, &status, &params, original).await {
            Ok(receipt) => {
                // a mined deployment whose re-check failed is still deployed
                let refreshed = receipt
                    .status
                    .unwrap_or_else(|| ChainDeploymentStatus::deployed(chain_id));
                board.update(refreshed);
                board.notify_success(
                    chain_id,
                    format!("Safe {} deployed in {}", target, receipt.tx_hash),
                );
                Ok(receipt)
            }
            Err(e) => {
                board.notify_error(chain_id, e.to_string());
                Err(e)
            }
        }
    }
}
