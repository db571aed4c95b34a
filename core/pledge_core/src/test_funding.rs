use chrono::Duration;

use crate::aggregate::{aggregate, confirmation_status, ConfirmationStatus};
use crate::invariants::assert_all_summary_invariants;
use crate::test_support::{by_user, goal, pledge, receiver_owned, scheduled, sender_owned};
use crate::types::{CurrencyAmount, Funding, PledgeState};

#[test]
fn test_total_counts_every_state() {
    let pledges = vec![
        pledge("p1", 500, PledgeState::Pending),
        pledge("p2", 1_000, PledgeState::Refunded),
        pledge("p3", 250, PledgeState::Disputed),
        pledge("p4", 50, PledgeState::Unknown),
    ];

    let summary = aggregate(&pledges, &Funding::default(), None);
    assert_eq!(summary.total, 1_800);
    assert_all_summary_invariants(&summary, &pledges);
}

#[test]
fn test_total_is_independent_of_order() {
    let mut pledges = vec![
        pledge("p1", 300, PledgeState::Pending),
        pledge("p2", 700, PledgeState::Paid),
        pledge("p3", 11, PledgeState::Initiated),
    ];
    let forward = aggregate(&pledges, &goal(1_000), None);
    pledges.reverse();
    let backward = aggregate(&pledges, &goal(1_000), None);

    assert_eq!(forward.total, backward.total);
    assert_eq!(forward.goal_progress_percent, backward.goal_progress_percent);
}

#[test]
fn test_progress_undefined_without_positive_goal() {
    let pledges = vec![pledge("p1", 500, PledgeState::Pending)];

    let no_goal = aggregate(&pledges, &Funding::default(), None);
    assert_eq!(no_goal.goal, None);
    assert_eq!(no_goal.goal_progress_percent, None);

    let zero_goal = aggregate(&pledges, &goal(0), None);
    assert_eq!(zero_goal.goal, None);
    assert_eq!(zero_goal.goal_progress_percent, None);
    assert_all_summary_invariants(&zero_goal, &pledges);
}

#[test]
fn test_progress_is_not_clamped() {
    let pledges = vec![
        pledge("p1", 3_000, PledgeState::Pending),
        pledge("p2", 1_000, PledgeState::Pending),
    ];

    let summary = aggregate(&pledges, &goal(2_000), None);
    assert_eq!(summary.goal, Some(2_000));
    assert_eq!(summary.goal_progress_percent, Some(200.0));

    let half = aggregate(&pledges[1..], &goal(2_000), None);
    assert_eq!(half.goal_progress_percent, Some(50.0));
}

#[test]
fn test_viewer_contribution() {
    let pledges = vec![
        by_user(pledge("p1", 500, PledgeState::Pending), "alice"),
        by_user(pledge("p2", 700, PledgeState::Pending), "bob"),
        by_user(pledge("p3", 300, PledgeState::Paid), "alice"),
        pledge("p4", 900, PledgeState::Pending),
    ];

    assert_eq!(aggregate(&pledges, &goal(5_000), Some("alice")).viewer_contribution, 800);
    assert_eq!(aggregate(&pledges, &goal(5_000), Some("carol")).viewer_contribution, 0);
    assert_eq!(aggregate(&pledges, &goal(5_000), None).viewer_contribution, 0);
}

#[test]
fn test_currency_prefers_goal_then_first_pledge() {
    let mut eur = pledge("p1", 100, PledgeState::Pending);
    eur.amount = CurrencyAmount {
        currency: "eur".to_string(),
        amount: 100,
    };

    assert_eq!(aggregate(&[eur.clone()], &Funding::default(), None).currency, "eur");
    assert_eq!(aggregate(&[eur], &goal(1_000), None).currency, "usd");
    assert_eq!(aggregate(&[], &Funding::default(), None).currency, "usd");
}

#[test]
fn test_worked_example_totals() {
    let pledges = vec![
        sender_owned(scheduled("p1", 500, PledgeState::Pending, Duration::days(3))),
        pledge("p2", 1_500, PledgeState::Disputed),
    ];

    let summary = aggregate(&pledges, &goal(2_000), None);
    assert_eq!(summary.total, 2_000);
    assert_eq!(summary.goal_progress_percent, Some(100.0));
}

#[test]
fn test_confirmation_status() {
    let awaiting = vec![
        receiver_owned(pledge("p1", 100, PledgeState::ConfirmationPending)),
        receiver_owned(pledge("p2", 100, PledgeState::Pending)),
    ];
    assert_eq!(
        confirmation_status(&awaiting, false),
        ConfirmationStatus::AwaitingConfirmation
    );
    assert_eq!(confirmation_status(&awaiting, true), ConfirmationStatus::InFlight);

    let confirmed = vec![receiver_owned(pledge("p1", 100, PledgeState::Pending))];
    assert_eq!(confirmation_status(&confirmed, false), ConfirmationStatus::Confirmed);

    // Receiver rights are required for either status.
    let foreign = vec![
        pledge("p1", 100, PledgeState::ConfirmationPending),
        pledge("p2", 100, PledgeState::Pending),
    ];
    assert_eq!(
        confirmation_status(&foreign, false),
        ConfirmationStatus::NotApplicable
    );
}
