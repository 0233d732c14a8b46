//! Paged Approval history for one owner, reconciled against live allowances

use std::time::Duration;

use alloy::primitives::{Address, TxHash, U256};
use alloy::sol_types::SolEvent;
use serde::Serialize;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::events::{dedup_events, latest_per_key, AllowanceEvent, AllowanceKey, EventId};
use super::reader::{AllowanceReader, Erc20AllowanceReader};
use crate::chain::{AllowanceConfig, ChainClient, LogQuery};
use crate::contracts::IERC20;
use crate::error::Result;

/// An allowance whose value was re-read from the token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledAllowance {
    pub token: Address,
    pub chain_id: u64,
    pub owner: Address,
    pub spender: Address,
    /// Live `allowance(owner, spender)`
    pub value: U256,
    /// Latest Approval event for this key
    pub last_event: EventId,
    pub transaction_hash: TxHash,
}

/// Reconciled allowances, most recent approval first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AllowanceSet {
    items: Vec<ReconciledAllowance>,
}

impl AllowanceSet {
    pub fn iter(&self) -> impl Iterator<Item = &ReconciledAllowance> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Allowances that can still be spent
    pub fn non_zero(&self) -> impl Iterator<Item = &ReconciledAllowance> {
        self.iter().filter(|allowance| !allowance.value.is_zero())
    }

    pub fn by_token(&self, token: Address) -> impl Iterator<Item = &ReconciledAllowance> {
        self.iter().filter(move |allowance| allowance.token == token)
    }

    pub fn by_spender(&self, spender: Address) -> impl Iterator<Item = &ReconciledAllowance> {
        self.iter().filter(move |allowance| allowance.spender == spender)
    }

    pub fn into_vec(self) -> Vec<ReconciledAllowance> {
        self.items
    }
}

/// Outcome of one [`AllowanceReconciler::sync`] round
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub head: u64,
    pub pages: usize,
    pub failed_pages: usize,
    pub new_events: usize,
}

/// A set of tokens scanned together up to `next_block - 1`
#[derive(Debug, Clone)]
struct Cursor {
    tokens: Vec<Address>,
    next_block: u64,
}

/// Collects an owner's Approval events on one chain, page by page.
///
/// The initial tokens share one cursor. Tokens added later get their own
/// cursor, so backfilling them never rescans ranges already covered for the
/// others.
#[derive(Debug, Clone)]
pub struct AllowanceReconciler {
    chain_id: u64,
    owner: Address,
    page_size: u64,
    cursors: Vec<Cursor>,
    events: Vec<AllowanceEvent>,
}

impl AllowanceReconciler {
    pub fn new(
        chain_id: u64,
        owner: Address,
        tokens: impl IntoIterator<Item = Address>,
        config: AllowanceConfig,
    ) -> Self {
        let mut tokens: Vec<Address> = tokens.into_iter().collect();
        tokens.sort();
        tokens.dedup();
        Self {
            chain_id,
            owner,
            page_size: config.page_size.max(1),
            cursors: vec![Cursor {
                tokens,
                next_block: config.start_block,
            }],
            events: Vec::new(),
        }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Every token being tracked
    pub fn tokens(&self) -> Vec<Address> {
        self.cursors
            .iter()
            .flat_map(|cursor| cursor.tokens.iter().copied())
            .collect()
    }

    /// Latest event per `(token, owner, spender)` collected so far, oldest
    /// first
    pub fn events(&self) -> &[AllowanceEvent] {
        &self.events
    }

    /// True once every cursor has scanned through `head`
    pub fn is_caught_up(&self, head: u64) -> bool {
        self.cursors
            .iter()
            .all(|cursor| cursor.tokens.is_empty() || cursor.next_block > head)
    }

    /// Starts tracking `token` from `from_block`.
    ///
    /// Returns false if the token is already tracked.
    pub fn add_token(&mut self, token: Address, from_block: u64) -> bool {
        if self.cursors.iter().any(|cursor| cursor.tokens.contains(&token)) {
            return false;
        }
        debug!(chain_id = self.chain_id, %token, from_block, "tracking token");
        self.cursors.push(Cursor {
            tokens: vec![token],
            next_block: from_block,
        });
        true
    }

    /// Pages every cursor forward to the current head.
    ///
    /// A failed page stops its cursor for this round; it is retried from the
    /// same block on the next call.
    pub async fn sync<C: ChainClient>(&mut self, client: &C) -> Result<SyncReport> {
        let head = client.block_number().await?;
        Ok(self.sync_to(client, head).await)
    }

    async fn sync_to<C: ChainClient>(&mut self, client: &C, head: u64) -> SyncReport {
        let mut report = SyncReport {
            head,
            ..Default::default()
        };
        let mut fetched = Vec::new();

        for cursor in &mut self.cursors {
            if cursor.tokens.is_empty() {
                continue;
            }
            while cursor.next_block <= head {
                let from_block = cursor.next_block;
                let to_block = from_block.saturating_add(self.page_size - 1).min(head);
                let query = LogQuery {
                    addresses: cursor.tokens.clone(),
                    topic0: IERC20::Approval::SIGNATURE_HASH,
                    topic1: Some(self.owner.into_word()),
                    from_block,
                    to_block,
                };

                match client.get_logs(&query).await {
                    Ok(logs) => {
                        report.pages += 1;
                        debug!(chain_id = self.chain_id, from_block, to_block, logs = logs.len(), "approval page");
                        fetched.extend(
                            logs.iter()
                                .filter_map(|log| AllowanceEvent::from_log(self.chain_id, log)),
                        );
                        cursor.next_block = to_block + 1;
                    }
                    Err(e) => {
                        report.failed_pages += 1;
                        warn!(chain_id = self.chain_id, from_block, to_block, error = %e, "approval page failed, retrying next round");
                        break;
                    }
                }
            }
        }

        let fetched = dedup_events(fetched);
        report.new_events = fetched.len();
        // only the latest event per key is ever reconciled
        let mut latest = latest_per_key(std::mem::take(&mut self.events).into_iter().chain(fetched));
        latest.reverse();
        self.events = latest;
        report
    }

    /// Re-reads the latest allowance per `(token, owner, spender)` in one
    /// batch.
    ///
    /// Tokens whose `allowance` cannot be read are left out.
    pub async fn reconcile<R: AllowanceReader>(&self, reader: &R) -> AllowanceSet {
        let keys: Vec<AllowanceKey> = self.events.iter().rev().map(AllowanceEvent::key).collect();
        let values = reader.allowances(&keys).await;

        let items = self
            .events
            .iter()
            .rev()
            .zip(values)
            .filter_map(|(event, value)| match value {
                Ok(value) => Some(ReconciledAllowance {
                    token: event.token,
                    chain_id: event.chain_id,
                    owner: event.owner,
                    spender: event.spender,
                    value,
                    last_event: event.id,
                    transaction_hash: event.transaction_hash,
                }),
                Err(e) => {
                    warn!(
                        chain_id = self.chain_id,
                        token = %event.token,
                        spender = %event.spender,
                        error = %e,
                        "could not read allowance, dropping"
                    );
                    None
                }
            })
            .collect();
        AllowanceSet { items }
    }

    /// Polls the head every `interval`, re-syncing and re-reconciling when it
    /// moves or when an earlier page still has to be retried. Each new set is
    /// passed to `on_update` with the head it was synced to.
    ///
    /// Returns when `shutdown` turns true or its sender is dropped.
    pub async fn follow<C, F>(
        &mut self,
        client: &C,
        interval: Duration,
        mut shutdown: watch::Receiver<bool>,
        mut on_update: F,
    ) -> Result<()>
    where
        C: ChainClient,
        F: FnMut(u64, &AllowanceSet) + Send,
    {
        let reader = Erc20AllowanceReader::new(client);
        let mut ticker = tokio::time::interval(interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last_head = None;

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            let head = match client.block_number().await {
                Ok(head) => head,
                Err(e) => {
                    warn!(chain_id = self.chain_id, error = %e, "failed to read head");
                    continue;
                }
            };
            if last_head == Some(head) && self.is_caught_up(head) {
                continue;
            }

            let report = self.sync_to(client, head).await;
            let allowances = self.reconcile(&reader).await;
            info!(
                chain_id = self.chain_id,
                head,
                pages = report.pages,
                failed_pages = report.failed_pages,
                allowances = allowances.len(),
                "reconciled allowances"
            );
            on_update(head, &allowances);
            last_head = Some(head);
        }

        info!(chain_id = self.chain_id, "allowance follower stopped");
        Ok(())
    }
}
