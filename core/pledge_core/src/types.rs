//! # Types
//!
//! Shared data structures mirroring the shapes returned by the remote API.
//!
//! ## Design decisions
//!
//! ### Amounts
//!
//! Every amount is a [`CurrencyAmount`] in minor units (cents). The amount is a
//! `u64`, so the non-negativity invariant holds by construction.
//!
//! ### Pledge state is server-owned
//!
//! [`PledgeState`] transitions happen on the server only:
//!
//! ```text
//! Initiated ──► Pending ──► ConfirmationPending ──► Pending ──► Paid
//!                  │                                   │
//!                  └──► Refunded                       └──► Disputed
//! ChargeDisputed (raised by the card network, any time after payment)
//! ```
//!
//! The client reads state and never writes it. Values added on the server
//! later deserialize to [`PledgeState::Unknown`] instead of failing the whole
//! payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Currency used when neither a goal nor any pledge carries one.
pub const DEFAULT_CURRENCY: &str = "usd";

/// An amount in minor currency units.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: String,
    pub amount: u64,
}

impl CurrencyAmount {
    pub fn usd(amount: u64) -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            amount,
        }
    }
}

/// Lifecycle state of a pledge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PledgeState {
    /// Payment started but not captured.
    Initiated,
    /// Issue closed; waiting for the maintainer to confirm it was solved.
    ConfirmationPending,
    /// Funds held; payout scheduled.
    Pending,
    /// Paid out to the maintainers.
    Paid,
    /// The pledger disputed the pledge.
    Disputed,
    /// A chargeback was raised with the payment provider.
    ChargeDisputed,
    /// Returned to the pledger.
    Refunded,
    /// A state this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl PledgeState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initiated => "initiated",
            Self::ConfirmationPending => "confirmation_pending",
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Disputed => "disputed",
            Self::ChargeDisputed => "charge_disputed",
            Self::Refunded => "refunded",
            Self::Unknown => "unknown",
        }
    }
}

/// Public profile of whoever made a pledge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pledger {
    pub name: String,
    pub github_username: Option<String>,
    pub avatar_url: Option<String>,
}

/// A monetary commitment towards an issue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pledge {
    pub id: String,
    pub issue_id: String,
    pub created_at: DateTime<Utc>,
    pub amount: CurrencyAmount,
    pub state: PledgeState,
    pub refunded_at: Option<DateTime<Utc>>,
    /// Disputes must be raised before this instant.
    pub scheduled_payout_at: Option<DateTime<Utc>>,
    pub pledger: Option<Pledger>,
    pub pledger_user_id: Option<String>,
    /// Free-text contact for anonymous pledges.
    pub pledger_email: Option<String>,
    pub dispute_reason: Option<String>,
    pub disputed_at: Option<DateTime<Utc>>,
    pub disputed_by_user_id: Option<String>,
    pub payment_id: Option<String>,
    #[serde(default)]
    pub authed_user_can_admin_sender: bool,
    #[serde(default)]
    pub authed_user_can_admin_received: bool,
}

impl Pledge {
    /// Name shown next to dispute notices.
    pub fn pledger_name(&self) -> Option<&str> {
        self.pledger.as_ref().map(|p| p.name.as_str())
    }
}

/// Funding record of an issue. Both fields are optional on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funding {
    pub funding_goal: Option<CurrencyAmount>,
    pub pledges_sum: Option<CurrencyAmount>,
}

impl Funding {
    /// The goal amount, only when one is actually set (`> 0`).
    pub fn goal_amount(&self) -> Option<u64> {
        self.funding_goal
            .as_ref()
            .map(|g| g.amount)
            .filter(|amount| *amount > 0)
    }
}

/// Progress of the work on an issue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueStatus {
    Triaged,
    InProgress,
    PullRequest,
    Building,
    Closed,
    /// Also the landing arm for values this client does not know.
    #[default]
    #[serde(other)]
    Backlog,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub organization: Option<Organization>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub repository: Repository,
    #[serde(default)]
    pub funding: Funding,
    #[serde(default)]
    pub progress: IssueStatus,
    #[serde(default)]
    pub pledges: Vec<Pledge>,
}

impl Issue {
    /// `org/repo#123`, or `repo#123` when the organization is unknown.
    pub fn reference(&self) -> String {
        match &self.repository.organization {
            Some(org) => format!("{}/{}#{}", org.name, self.repository.name, self.number),
            None => format!("{}#{}", self.repository.name, self.number),
        }
    }

    pub fn github_url(&self) -> Option<String> {
        self.repository.organization.as_ref().map(|org| {
            format!(
                "https://github.com/{}/{}/issues/{}",
                org.name, self.repository.name, self.number
            )
        })
    }
}

/// Pledge as listed in the back office, together with its issue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackofficePledge {
    #[serde(flatten)]
    pub pledge: Pledge,
    pub issue: Issue,
}

/// Payout state of a reward share.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RewardState {
    Pending,
    Paid,
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardUser {
    pub username: String,
    pub avatar_url: Option<String>,
}

/// One recipient's share of a pledge, as listed in the back office.
///
/// A reward goes to a user, an organization, or both. `transfer_id` is set
/// once a payout transfer exists for it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BackofficeReward {
    pub pledge: Pledge,
    pub user: Option<RewardUser>,
    pub organization: Option<Organization>,
    pub amount: CurrencyAmount,
    pub state: RewardState,
    pub paid_at: Option<DateTime<Utc>>,
    pub transfer_id: Option<String>,
    pub issue_reward_id: String,
}

/// Wrapper used by list endpoints of the remote API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListResource<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}
