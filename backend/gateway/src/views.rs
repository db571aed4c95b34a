//! Response shapes built from the core's derived state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use pledge_core::backoffice::{
    can_create_transfer, group_by_issue, pledger_display_name, reward_recipient, state_tone,
    StateTone,
};
use pledge_core::money::format_cents;
use pledge_core::{
    aggregate, classify, confirmation_status, BackofficePledge, BackofficeReward,
    ConfirmationStatus, Funding, FundingSummary, IssueStatus, Pledge, PledgeState, RewardState,
};

const TRANSFER_DASHBOARD_URL: &str = "https://dashboard.stripe.com/connect/transfers";

// ─────────────────────────────────────────────────────────
// Pledge summary
// ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DisputableView {
    pub pledge_id: String,
    pub amount: String,
    pub remaining_days: i64,
    pub deadline_label: String,
}

#[derive(Debug, Serialize)]
pub struct StatusLine {
    pub pledge_id: String,
    pub amount: String,
    pub pledger_name: Option<String>,
    pub viewer_is_sender: bool,
    pub viewer_is_receiver: bool,
}

impl StatusLine {
    fn from_pledge(pledge: &Pledge) -> Self {
        Self {
            pledge_id: pledge.id.clone(),
            amount: dollars(pledge.amount.amount),
            pledger_name: pledge.pledger_name().map(String::from),
            viewer_is_sender: pledge.authed_user_can_admin_sender,
            viewer_is_receiver: pledge.authed_user_can_admin_received,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PledgeSummaryResponse {
    pub issue_id: String,
    pub progress: IssueStatus,
    pub funding: FundingSummary,
    pub confirmation: ConfirmationStatus,
    pub can_dispute_any: bool,
    pub show_status_box: bool,
    pub show_amounts: bool,
    pub disputable: Vec<DisputableView>,
    pub pending_payout: Vec<StatusLine>,
    pub disputed: Vec<StatusLine>,
    pub remaining_days_by_pledge: HashMap<String, i64>,
    pub pledges: Vec<Pledge>,
}

impl PledgeSummaryResponse {
    pub fn build(
        issue_id: String,
        progress: IssueStatus,
        funding: &Funding,
        pledges: Vec<Pledge>,
        viewer_id: Option<&str>,
        confirm_in_flight: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let summary = aggregate(&pledges, funding, viewer_id);
        let confirmation = confirmation_status(&pledges, confirm_in_flight);
        let buckets = classify(&pledges, now);
        let disputable = buckets
            .disputable
            .iter()
            .map(|d| DisputableView {
                pledge_id: d.pledge.id.clone(),
                amount: dollars(d.pledge.amount.amount),
                remaining_days: d.remaining_days,
                deadline_label: d.deadline_label(),
            })
            .collect();
        let pending_payout = buckets
            .pending_payout
            .iter()
            .map(|p| StatusLine::from_pledge(p))
            .collect();
        let disputed = buckets
            .disputed
            .iter()
            .map(|p| StatusLine::from_pledge(p))
            .collect();
        let remaining_days_by_pledge = buckets
            .remaining_days_by_pledge
            .iter()
            .map(|(id, days)| (id.to_string(), *days))
            .collect();
        let can_dispute_any = buckets.can_dispute_any();
        let show_status_box = buckets.show_status_box();
        let show_amounts = buckets.show_amounts();

        Self {
            issue_id,
            progress,
            funding: summary,
            confirmation,
            can_dispute_any,
            show_status_box,
            show_amounts,
            disputable,
            pending_payout,
            disputed,
            remaining_days_by_pledge,
            pledges,
        }
    }
}

// ─────────────────────────────────────────────────────────
// Back office
// ─────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DisputeNote {
    pub reason: Option<String>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BackofficePledgeView {
    pub id: String,
    pub amount: String,
    pub pledger: String,
    pub avatar_url: Option<String>,
    pub state: PledgeState,
    pub tone: StateTone,
    pub payment_id: Option<String>,
    pub dispute: Option<DisputeNote>,
}

#[derive(Debug, Serialize)]
pub struct BackofficeIssueView {
    pub issue_id: String,
    pub reference: String,
    pub title: String,
    pub github_url: Option<String>,
    pub pledges: Vec<BackofficePledgeView>,
}

pub fn backoffice_listing(listing: Vec<BackofficePledge>) -> Vec<BackofficeIssueView> {
    group_by_issue(listing)
        .into_iter()
        .map(|group| BackofficeIssueView {
            issue_id: group.issue.id.clone(),
            reference: group.issue.reference(),
            title: group.issue.title.clone(),
            github_url: group.issue.github_url(),
            pledges: group.pledges.iter().map(backoffice_pledge).collect(),
        })
        .collect()
}

fn backoffice_pledge(pledge: &Pledge) -> BackofficePledgeView {
    BackofficePledgeView {
        id: pledge.id.clone(),
        amount: format!("${}", format_cents(pledge.amount.amount, true, true)),
        pledger: pledger_display_name(pledge).to_string(),
        avatar_url: pledge.pledger.as_ref().and_then(|p| p.avatar_url.clone()),
        state: pledge.state,
        tone: state_tone(pledge.state),
        payment_id: pledge.payment_id.clone(),
        dispute: pledge.disputed_at.map(|at| DisputeNote {
            reason: pledge.dispute_reason.clone(),
            at,
        }),
    }
}

#[derive(Debug, Serialize)]
pub struct BackofficeRewardView {
    pub issue_reward_id: String,
    pub pledge_id: String,
    /// Recipient share, e.g. `$90.00`.
    pub amount: String,
    pub pledge_amount: String,
    pub recipient: String,
    pub pledger: String,
    pub state: RewardState,
    pub paid_at: Option<DateTime<Utc>>,
    pub transfer_url: Option<String>,
    pub can_create_transfer: bool,
}

pub fn reward_listing(rewards: &[BackofficeReward]) -> Vec<BackofficeRewardView> {
    rewards
        .iter()
        .map(|reward| BackofficeRewardView {
            issue_reward_id: reward.issue_reward_id.clone(),
            pledge_id: reward.pledge.id.clone(),
            amount: format!("${}", format_cents(reward.amount.amount, true, true)),
            pledge_amount: format!("${}", format_cents(reward.pledge.amount.amount, true, true)),
            recipient: reward_recipient(reward),
            pledger: reward
                .pledge
                .pledger_name()
                .unwrap_or("Anonymous")
                .to_string(),
            state: reward.state,
            paid_at: reward.paid_at,
            transfer_url: reward
                .transfer_id
                .as_ref()
                .map(|id| format!("{TRANSFER_DASHBOARD_URL}/{id}")),
            can_create_transfer: can_create_transfer(reward),
        })
        .collect()
}

fn dollars(cents: u64) -> String {
    format!("${}", format_cents(cents, false, true))
}
