//! Dispute eligibility of pledges relative to their scheduled payout.
//!
//! A pledge can be disputed by its sender while it is `pending` and its payout
//! date has not passed. Once the payout date is behind us the pledge is
//! reported as waiting for payout instead.
//!
//! The three buckets are not exclusive by type. With the current state set
//! they cannot overlap: `disputable` requires `pending`, `disputed` requires
//! `disputed`, and `pending_payout` requires the payout date to be past, which
//! `disputable` forbids. A `disputed` pledge whose payout date is past shows up
//! in both `disputed` and `pending_payout`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::types::{Pledge, PledgeState};

const ONE_DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Returned by [`remaining_days`] when no payout is scheduled.
pub const NO_SCHEDULED_PAYOUT: i64 = -1;

/// Whole days until the payout, rounded down. May be negative.
pub fn remaining_days(pledge: &Pledge, now: DateTime<Utc>) -> i64 {
    match pledge.scheduled_payout_at {
        Some(payout_at) => (payout_at - now).num_milliseconds().div_euclid(ONE_DAY_MS),
        None => NO_SCHEDULED_PAYOUT,
    }
}

fn is_disputable(pledge: &Pledge, days: i64) -> bool {
    pledge.authed_user_can_admin_sender
        && pledge.scheduled_payout_at.is_some()
        && pledge.state == PledgeState::Pending
        && days >= 0
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DisputablePledge<'a> {
    pub pledge: &'a Pledge,
    pub remaining_days: i64,
}

impl DisputablePledge<'_> {
    /// Text appended after the "Dispute" action.
    pub fn deadline_label(&self) -> String {
        match self.remaining_days {
            0 => "today".to_string(),
            1 => "within 1 day".to_string(),
            n => format!("within {n} days"),
        }
    }
}

/// Pledges partitioned by what the viewer can do about them.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DisputeBuckets<'a> {
    pub disputable: Vec<DisputablePledge<'a>>,
    pub pending_payout: Vec<&'a Pledge>,
    pub disputed: Vec<&'a Pledge>,
    pub remaining_days_by_pledge: HashMap<&'a str, i64>,
}

impl DisputeBuckets<'_> {
    /// Gates whether any dispute action is offered at all.
    pub fn can_dispute_any(&self) -> bool {
        !self.disputable.is_empty()
    }

    pub fn status_count(&self) -> usize {
        self.disputable.len() + self.pending_payout.len() + self.disputed.len()
    }

    pub fn show_status_box(&self) -> bool {
        self.status_count() > 0
    }

    /// Amounts are only worth showing when several lines are listed.
    pub fn show_amounts(&self) -> bool {
        self.status_count() > 1
    }
}

pub fn classify(pledges: &[Pledge], now: DateTime<Utc>) -> DisputeBuckets<'_> {
    let mut buckets = DisputeBuckets::default();

    for pledge in pledges {
        let days = remaining_days(pledge, now);
        buckets.remaining_days_by_pledge.insert(pledge.id.as_str(), days);

        if is_disputable(pledge, days) {
            buckets.disputable.push(DisputablePledge {
                pledge,
                remaining_days: days,
            });
        }

        if pledge.scheduled_payout_at.is_some() && days < 0 {
            buckets.pending_payout.push(pledge);
        }

        if pledge.state == PledgeState::Disputed {
            buckets.disputed.push(pledge);
        }
    }

    buckets
}

/// Minimum number of characters a dispute reason must exceed.
pub const MIN_REASON_LEN: usize = 4;

/// Returns the trimmed reason, or `None` when it is too short to submit.
pub fn validate_dispute_reason(reason: &str) -> Option<&str> {
    let trimmed = reason.trim();
    (trimmed.chars().count() > MIN_REASON_LEN).then_some(trimmed)
}
