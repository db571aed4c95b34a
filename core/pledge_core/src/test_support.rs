//! Builders shared by the unit tests.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::types::{
    CurrencyAmount, Funding, Issue, IssueStatus, Organization, Pledge, PledgeState, Repository,
};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 8, 1, 12, 0, 0).unwrap()
}

pub fn pledge(id: &str, amount: u64, state: PledgeState) -> Pledge {
    Pledge {
        id: id.to_string(),
        issue_id: "issue-1".to_string(),
        created_at: fixed_now() - Duration::days(10),
        amount: CurrencyAmount::usd(amount),
        state,
        refunded_at: None,
        scheduled_payout_at: None,
        pledger: None,
        pledger_user_id: None,
        pledger_email: None,
        dispute_reason: None,
        disputed_at: None,
        disputed_by_user_id: None,
        payment_id: None,
        authed_user_can_admin_sender: false,
        authed_user_can_admin_received: false,
    }
}

/// A pledge whose payout is `offset` away from [`fixed_now`].
pub fn scheduled(id: &str, amount: u64, state: PledgeState, offset: Duration) -> Pledge {
    Pledge {
        scheduled_payout_at: Some(fixed_now() + offset),
        ..pledge(id, amount, state)
    }
}

pub fn sender_owned(mut p: Pledge) -> Pledge {
    p.authed_user_can_admin_sender = true;
    p
}

pub fn receiver_owned(mut p: Pledge) -> Pledge {
    p.authed_user_can_admin_received = true;
    p
}

pub fn by_user(mut p: Pledge, user_id: &str) -> Pledge {
    p.pledger_user_id = Some(user_id.to_string());
    p
}

pub fn goal(amount: u64) -> Funding {
    Funding {
        funding_goal: Some(CurrencyAmount::usd(amount)),
        pledges_sum: None,
    }
}

pub fn issue(id: &str) -> Issue {
    Issue {
        id: id.to_string(),
        number: 7,
        title: format!("Issue {id}"),
        repository: Repository {
            name: "engine".to_string(),
            organization: Some(Organization {
                name: "acme".to_string(),
            }),
        },
        funding: Funding::default(),
        progress: IssueStatus::Backlog,
        pledges: Vec::new(),
    }
}
