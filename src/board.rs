//! Per-target deployment board: chain statuses plus short-lived notices

use std::time::{Duration, Instant};

use alloy::primitives::Address;

use crate::types::{ChainDeploymentStatus, DeploymentParameters};

/// How long a notice stays visible
pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient success or error message for one chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub chain_id: u64,
    pub kind: NoticeKind,
    pub message: String,
    created_at: Instant,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created_at) >= NOTICE_TTL
    }
}

/// Deployment statuses of one target across the session's chains.
///
/// Statuses are recomputed, never persisted: changing the target or any
/// parameter puts every chain back into the loading state.
#[derive(Debug, Clone)]
pub struct DeploymentBoard {
    target: Address,
    params: DeploymentParameters,
    statuses: Vec<ChainDeploymentStatus>,
    notices: Vec<Notice>,
}

impl DeploymentBoard {
    /// Creates a board with every chain loading
    pub fn new(
        target: Address,
        params: DeploymentParameters,
        chain_ids: impl IntoIterator<Item = u64>,
    ) -> Self {
        Self {
            target,
            params,
            statuses: chain_ids
                .into_iter()
                .map(ChainDeploymentStatus::loading)
                .collect(),
            notices: Vec::new(),
        }
    }

    pub fn target(&self) -> Address {
        self.target
    }

    pub fn params(&self) -> &DeploymentParameters {
        &self.params
    }

    /// Statuses in chain order
    pub fn statuses(&self) -> &[ChainDeploymentStatus] {
        &self.statuses
    }

    pub fn status(&self, chain_id: u64) -> Option<&ChainDeploymentStatus> {
        self.statuses.iter().find(|status| status.chain_id == chain_id)
    }

    pub fn is_loading(&self) -> bool {
        self.statuses.iter().any(|status| status.is_loading)
    }

    pub fn mark_loading(&mut self) {
        for status in &mut self.statuses {
            *status = ChainDeploymentStatus::loading(status.chain_id);
        }
    }

    /// Replaces the status of `status.chain_id`; unknown chains are ignored
    pub fn update(&mut self, status: ChainDeploymentStatus) {
        if let Some(slot) = self
            .statuses
            .iter_mut()
            .find(|slot| slot.chain_id == status.chain_id)
        {
            *slot = status;
        }
    }

    /// Points the board at a new target. Returns true if anything changed.
    pub fn set_target(&mut self, target: Address) -> bool {
        if self.target == target {
            return false;
        }
        self.target = target;
        self.mark_loading();
        true
    }

    /// Replaces owners, threshold, salt or variant. Returns true if anything
    /// changed.
    pub fn set_params(&mut self, params: DeploymentParameters) -> bool {
        if self.params == params {
            return false;
        }
        self.params = params;
        self.mark_loading();
        true
    }

    pub fn notify_success(&mut self, chain_id: u64, message: impl Into<String>) {
        self.push_notice(chain_id, NoticeKind::Success, message.into(), Instant::now());
    }

    pub fn notify_error(&mut self, chain_id: u64, message: impl Into<String>) {
        self.push_notice(chain_id, NoticeKind::Error, message.into(), Instant::now());
    }

    fn push_notice(&mut self, chain_id: u64, kind: NoticeKind, message: String, created_at: Instant) {
        self.prune_notices(created_at);
        self.notices.push(Notice {
            chain_id,
            kind,
            message,
            created_at,
        });
    }

    /// Notices that have not expired yet
    pub fn notices(&self) -> Vec<&Notice> {
        self.notices_at(Instant::now())
    }

    pub fn notices_at(&self, now: Instant) -> Vec<&Notice> {
        self.notices
            .iter()
            .filter(|notice| !notice.is_expired(now))
            .collect()
    }

    /// Drops expired notices
    pub fn prune_notices(&mut self, now: Instant) {
        self.notices.retain(|notice| !notice.is_expired(now));
    }
}
