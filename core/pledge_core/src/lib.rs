//! # Pledge Core
//!
//! Client-side logic behind the issue funding views: everything here operates
//! on data already fetched from the remote API and performs no I/O.
//!
//! | Concern              | Entry point(s)                                   |
//! |----------------------|--------------------------------------------------|
//! | Funding totals       | [`aggregate()`], [`goal_progress`]               |
//! | Confirmation         | [`confirmation_status`]                          |
//! | Dispute eligibility  | [`classify`], [`remaining_days`], [`validate_dispute_reason`] |
//! | Fetched-data cache   | [`QueryCache`], [`QueryKey`]                     |
//! | Optimistic additions | [`PendingPledges`]                               |
//! | Display helpers      | [`money::format_cents`], [`backoffice`]          |
//!
//! ## Architecture
//!
//! Wire shapes live in [`types`]. [`aggregate`](mod@aggregate) and
//! [`dispute`] are pure functions over slices of [`Pledge`]; callers decide
//! when data is fetched and pass only settled results in. The
//! [`QueryCache`] and [`PendingPledges`] hold no global state: the owner
//! creates them and calls invalidation/reconciliation explicitly.

pub mod aggregate;
pub mod backoffice;
pub mod dispute;
pub mod money;
pub mod optimistic;
pub mod query_cache;
pub mod types;

#[cfg(test)]
mod test_disputes;
#[cfg(test)]
mod test_funding;
#[cfg(test)]
mod test_pending;
#[cfg(test)]
mod test_support;

pub use aggregate::{aggregate, confirmation_status, goal_progress, ConfirmationStatus, FundingSummary};
pub use dispute::{
    classify, remaining_days, validate_dispute_reason, DisputablePledge, DisputeBuckets,
    NO_SCHEDULED_PAYOUT,
};
pub use optimistic::PendingPledges;
pub use query_cache::{QueryCache, QueryKey};
pub use types::{
    BackofficePledge, BackofficeReward, CurrencyAmount, Funding, Issue, IssueStatus,
    ListResource, Pledge, PledgeState, RewardState,
};
