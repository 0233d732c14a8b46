//! Historical ERC-20 allowance reconciliation.
//!
//! Approval logs only prove that an approval happened. The reconciler keeps the
//! latest event per `(token, owner, spender)` and re-reads the live allowance
//! for each through an [`AllowanceReader`].

pub mod events;
pub mod reader;
pub mod reconciler;

pub use events::{dedup_events, latest_per_key, AllowanceEvent, AllowanceKey, EventId};
pub use reader::{AllowanceReader, Erc20AllowanceReader};
pub use reconciler::{AllowanceReconciler, AllowanceSet, ReconciledAllowance, SyncReport};
