//! Helpers for the back-office pledge listing.

use serde::Serialize;

use crate::types::{BackofficePledge, BackofficeReward, Issue, Pledge, PledgeState};

/// Pledges of one issue, in listing order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IssuePledges {
    pub issue: Issue,
    pub pledges: Vec<Pledge>,
}

/// Group a flat listing by issue id. Issues keep the order in which they first
/// appear; pledges keep their order within an issue.
pub fn group_by_issue(listing: Vec<BackofficePledge>) -> Vec<IssuePledges> {
    let mut groups: Vec<IssuePledges> = Vec::new();

    for BackofficePledge { pledge, issue } in listing {
        match groups.iter_mut().find(|g| g.issue.id == issue.id) {
            Some(group) => group.pledges.push(pledge),
            None => groups.push(IssuePledges {
                issue,
                pledges: vec![pledge],
            }),
        }
    }

    groups
}

/// GitHub username, then email, then `Anonymous`.
pub fn pledger_display_name(pledge: &Pledge) -> &str {
    pledge
        .pledger
        .as_ref()
        .and_then(|p| p.github_username.as_deref())
        .or(pledge.pledger_email.as_deref())
        .unwrap_or("Anonymous")
}

/// `username [user]`, `name [org]`, or both joined by a comma.
pub fn reward_recipient(reward: &BackofficeReward) -> String {
    let mut parts = Vec::new();
    if let Some(user) = &reward.user {
        parts.push(format!("{} [user]", user.username));
    }
    if let Some(org) = &reward.organization {
        parts.push(format!("{} [org]", org.name));
    }
    if parts.is_empty() {
        return "Unknown".to_string();
    }
    parts.join(", ")
}

/// A transfer can be created for a reward that has none yet.
pub fn can_create_transfer(reward: &BackofficeReward) -> bool {
    reward.transfer_id.is_none()
}

/// Colour family used to badge a pledge state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateTone {
    Danger,
    Success,
    Info,
    Neutral,
}

pub fn state_tone(state: PledgeState) -> StateTone {
    match state {
        PledgeState::Disputed | PledgeState::ChargeDisputed => StateTone::Danger,
        PledgeState::Pending => StateTone::Success,
        PledgeState::ConfirmationPending => StateTone::Info,
        PledgeState::Initiated
        | PledgeState::Paid
        | PledgeState::Refunded
        | PledgeState::Unknown => StateTone::Neutral,
    }
}
