use chrono::Duration;

use crate::dispute::{classify, remaining_days, validate_dispute_reason, NO_SCHEDULED_PAYOUT};
use crate::invariants::assert_all_bucket_invariants;
use crate::test_support::{fixed_now, pledge, scheduled, sender_owned};
use crate::types::PledgeState;

fn ids<'a>(pledges: impl IntoIterator<Item = &'a crate::types::Pledge>) -> Vec<&'a str> {
    pledges.into_iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn test_remaining_days_rounds_down() {
    let now = fixed_now();
    let p = scheduled("p1", 100, PledgeState::Pending, Duration::days(3) + Duration::hours(23));
    assert_eq!(remaining_days(&p, now), 3);

    let p = scheduled("p2", 100, PledgeState::Pending, Duration::hours(5));
    assert_eq!(remaining_days(&p, now), 0);

    // One hour in the past is already day -1.
    let p = scheduled("p3", 100, PledgeState::Pending, -Duration::hours(1));
    assert_eq!(remaining_days(&p, now), -1);

    let p = scheduled("p4", 100, PledgeState::Pending, -Duration::days(2));
    assert_eq!(remaining_days(&p, now), -2);
}

#[test]
fn test_remaining_days_sentinel_without_payout() {
    let p = pledge("p1", 100, PledgeState::Pending);
    assert_eq!(remaining_days(&p, fixed_now()), NO_SCHEDULED_PAYOUT);
}

#[test]
fn test_payout_today_is_disputable() {
    let now = fixed_now();
    let pledges = vec![sender_owned(scheduled(
        "p1",
        100,
        PledgeState::Pending,
        Duration::zero(),
    ))];

    let buckets = classify(&pledges, now);
    assert_eq!(buckets.disputable.len(), 1);
    assert_eq!(buckets.disputable[0].remaining_days, 0);
    assert_eq!(buckets.disputable[0].deadline_label(), "today");
    assert!(buckets.can_dispute_any());
    assert!(buckets.pending_payout.is_empty());
    assert_all_bucket_invariants(&buckets, &pledges, now);
}

#[test]
fn test_disputable_requires_every_condition() {
    let now = fixed_now();
    let pledges = vec![
        // Not the sender.
        scheduled("p1", 100, PledgeState::Pending, Duration::days(2)),
        // Wrong state.
        sender_owned(scheduled("p2", 100, PledgeState::ConfirmationPending, Duration::days(2))),
        // No payout scheduled.
        sender_owned(pledge("p3", 100, PledgeState::Pending)),
        // Eligible.
        sender_owned(scheduled("p4", 100, PledgeState::Pending, Duration::days(2))),
    ];

    let buckets = classify(&pledges, now);
    assert_eq!(ids(buckets.disputable.iter().map(|d| d.pledge)), vec!["p4"]);
    assert_all_bucket_invariants(&buckets, &pledges, now);
}

#[test]
fn test_past_payout_is_pending_payout_only() {
    let now = fixed_now();
    let pledges = vec![
        sender_owned(scheduled("p1", 100, PledgeState::Pending, -Duration::days(1))),
        scheduled("p2", 100, PledgeState::Paid, -Duration::days(4)),
    ];

    let buckets = classify(&pledges, now);
    assert!(buckets.disputable.is_empty());
    assert!(!buckets.can_dispute_any());
    assert_eq!(ids(buckets.pending_payout.iter().copied()), vec!["p1", "p2"]);
    assert_eq!(buckets.remaining_days_by_pledge["p1"], -1);
    assert_eq!(buckets.remaining_days_by_pledge["p2"], -4);
    assert_all_bucket_invariants(&buckets, &pledges, now);
}

#[test]
fn test_disputed_regardless_of_timing() {
    let now = fixed_now();
    let pledges = vec![
        pledge("p1", 100, PledgeState::Disputed),
        scheduled("p2", 100, PledgeState::Disputed, Duration::days(5)),
        scheduled("p3", 100, PledgeState::Disputed, -Duration::days(5)),
        pledge("p4", 100, PledgeState::ChargeDisputed),
    ];

    let buckets = classify(&pledges, now);
    assert_eq!(ids(buckets.disputed.iter().copied()), vec!["p1", "p2", "p3"]);
    // A past payout date still counts towards pending payout.
    assert_eq!(ids(buckets.pending_payout.iter().copied()), vec!["p3"]);
    assert_all_bucket_invariants(&buckets, &pledges, now);
}

#[test]
fn test_unscheduled_pledges_fall_through() {
    let now = fixed_now();
    let pledges = vec![
        sender_owned(pledge("p1", 100, PledgeState::Pending)),
        pledge("p2", 100, PledgeState::Unknown),
    ];

    let buckets = classify(&pledges, now);
    assert_eq!(buckets.status_count(), 0);
    assert!(!buckets.show_status_box());
    assert_eq!(buckets.remaining_days_by_pledge["p1"], NO_SCHEDULED_PAYOUT);
    assert_all_bucket_invariants(&buckets, &pledges, now);
}

#[test]
fn test_worked_example_buckets() {
    let now = fixed_now();
    let pledges = vec![
        sender_owned(scheduled("p1", 500, PledgeState::Pending, Duration::days(3))),
        pledge("p2", 1_500, PledgeState::Disputed),
    ];

    let buckets = classify(&pledges, now);
    assert_eq!(ids(buckets.disputable.iter().map(|d| d.pledge)), vec!["p1"]);
    assert_eq!(buckets.disputable[0].remaining_days, 3);
    assert_eq!(buckets.disputable[0].deadline_label(), "within 3 days");
    assert_eq!(ids(buckets.disputed.iter().copied()), vec!["p2"]);
    assert!(buckets.pending_payout.is_empty());
    assert!(buckets.show_amounts());
}

#[test]
fn test_deadline_label_singular() {
    let now = fixed_now();
    let pledges = vec![sender_owned(scheduled(
        "p1",
        100,
        PledgeState::Pending,
        Duration::days(1),
    ))];
    let buckets = classify(&pledges, now);
    assert_eq!(buckets.disputable[0].deadline_label(), "within 1 day");
    assert!(!buckets.show_amounts());
}

#[test]
fn test_dispute_reason_validation() {
    assert_eq!(validate_dispute_reason("  not fixed  "), Some("not fixed"));
    assert_eq!(validate_dispute_reason("nope"), None);
    assert_eq!(validate_dispute_reason("  abcd   "), None);
    assert_eq!(validate_dispute_reason("abcde"), Some("abcde"));
}
