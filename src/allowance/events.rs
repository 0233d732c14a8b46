//! Approval events, their identity and the latest-per-key reduction

use std::collections::{BTreeMap, HashMap};

use alloy::primitives::{Address, TxHash, B256, U256};
use alloy::sol_types::SolEvent;
use serde::Serialize;

use crate::chain::ChainLog;
use crate::contracts::IERC20;

/// Position of a log on its chain, ordered by block then log index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EventId {
    pub block_number: u64,
    pub log_index: u64,
}

/// Identifies one allowance on one chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllowanceKey {
    pub token: Address,
    pub owner: Address,
    pub spender: Address,
}

/// A decoded ERC-20 `Approval` log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowanceEvent {
    pub token: Address,
    pub chain_id: u64,
    pub owner: Address,
    pub spender: Address,
    /// Value approved by this event, not the live allowance
    pub value: U256,
    pub id: EventId,
    pub transaction_hash: TxHash,
}

impl AllowanceEvent {
    /// Decodes an `Approval(owner, spender, value)` log; `None` for anything else
    pub fn from_log(chain_id: u64, log: &ChainLog) -> Option<Self> {
        let [topic0, owner, spender] = log.topics.as_slice() else {
            return None;
        };
        if *topic0 != IERC20::Approval::SIGNATURE_HASH {
            return None;
        }
        let value = log.data.get(..32).map(U256::from_be_slice)?;

        Some(Self {
            token: log.address,
            chain_id,
            owner: topic_address(owner),
            spender: topic_address(spender),
            value,
            id: EventId {
                block_number: log.block_number,
                log_index: log.log_index,
            },
            transaction_hash: log.transaction_hash,
        })
    }

    pub fn key(&self) -> AllowanceKey {
        AllowanceKey {
            token: self.token,
            owner: self.owner,
            spender: self.spender,
        }
    }
}

fn topic_address(topic: &B256) -> Address {
    Address::from_word(*topic)
}

/// Removes repeated events (same [`EventId`]) and orders the rest by id.
///
/// Overlapping pages deliver the same log twice; applying this again is a
/// no-op.
pub fn dedup_events(events: impl IntoIterator<Item = AllowanceEvent>) -> Vec<AllowanceEvent> {
    let mut unique = BTreeMap::new();
    for event in events {
        unique.entry(event.id).or_insert(event);
    }
    unique.into_values().collect()
}

/// Keeps the event with the greatest [`EventId`] for each
/// `(token, owner, spender)`, most recent first.
pub fn latest_per_key(events: impl IntoIterator<Item = AllowanceEvent>) -> Vec<AllowanceEvent> {
    let mut latest: HashMap<AllowanceKey, AllowanceEvent> = HashMap::new();
    for event in events {
        match latest.get(&event.key()) {
            Some(current) if current.id >= event.id => {}
            _ => {
                latest.insert(event.key(), event);
            }
        }
    }
    let mut survivors: Vec<_> = latest.into_values().collect();
    survivors.sort_by(|a, b| b.id.cmp(&a.id));
    survivors
}
