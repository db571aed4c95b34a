//! Funding aggregation over a set of pledges.
//!
//! Every pledge counts towards the total, whatever its state. Refunded and
//! disputed pledges are included: the figure is the gross amount pledged.

use serde::Serialize;

use crate::types::{Funding, Pledge, PledgeState, DEFAULT_CURRENCY};

/// Derived funding figures for one issue.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FundingSummary {
    pub currency: String,
    pub total: u64,
    /// Only set when a goal `> 0` exists.
    pub goal: Option<u64>,
    /// Not clamped; an over-funded issue reports more than 100.
    pub goal_progress_percent: Option<f64>,
    pub viewer_contribution: u64,
}

/// Sum pledges, compute progress towards the goal and the viewer's share.
pub fn aggregate(pledges: &[Pledge], funding: &Funding, viewer_id: Option<&str>) -> FundingSummary {
    let total = sum_amounts(pledges.iter());

    let viewer_contribution = match viewer_id {
        Some(viewer) => sum_amounts(
            pledges
                .iter()
                .filter(|p| p.pledger_user_id.as_deref() == Some(viewer)),
        ),
        None => 0,
    };

    let currency = funding
        .funding_goal
        .as_ref()
        .map(|g| g.currency.clone())
        .or_else(|| pledges.first().map(|p| p.amount.currency.clone()))
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    FundingSummary {
        currency,
        total,
        goal: funding.goal_amount(),
        goal_progress_percent: goal_progress(total, funding),
        viewer_contribution,
    }
}

/// `total / goal * 100`, or `None` when there is no positive goal.
pub fn goal_progress(total: u64, funding: &Funding) -> Option<f64> {
    funding
        .goal_amount()
        .map(|goal| (total as f64 / goal as f64) * 100.0)
}

fn sum_amounts<'a>(pledges: impl Iterator<Item = &'a Pledge>) -> u64 {
    pledges.fold(0u64, |acc, p| acc.saturating_add(p.amount.amount))
}

/// Whether the receiving side can still confirm the issue as solved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationStatus {
    /// A confirmation request is on its way.
    InFlight,
    /// At least one pledge waits for the receiver to confirm.
    AwaitingConfirmation,
    /// Nothing left to confirm and the receiver holds pending pledges.
    Confirmed,
    NotApplicable,
}

pub fn confirmation_status(pledges: &[Pledge], confirm_in_flight: bool) -> ConfirmationStatus {
    if confirm_in_flight {
        return ConfirmationStatus::InFlight;
    }

    let receiver_holds = |state: PledgeState| {
        pledges
            .iter()
            .any(|p| p.state == state && p.authed_user_can_admin_received)
    };

    if receiver_holds(PledgeState::ConfirmationPending) {
        ConfirmationStatus::AwaitingConfirmation
    } else if receiver_holds(PledgeState::Pending) {
        ConfirmationStatus::Confirmed
    } else {
        ConfirmationStatus::NotApplicable
    }
}
