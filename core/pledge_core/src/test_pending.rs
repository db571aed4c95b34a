use crate::aggregate::aggregate;
use crate::optimistic::PendingPledges;
use crate::test_support::{goal, pledge};
use crate::types::PledgeState;

#[test]
fn test_pending_addition_is_appended() {
    let fetched = vec![pledge("p1", 500, PledgeState::Pending)];
    let mut pending = PendingPledges::new();
    pending.add(pledge("p2", 250, PledgeState::Initiated));

    let merged = pending.merge(&fetched);
    assert_eq!(
        merged.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
        vec!["p1", "p2"]
    );
    assert_eq!(aggregate(&merged, &goal(1_000), None).total, 750);
}

#[test]
fn test_merge_deduplicates_by_id() {
    let fetched = vec![pledge("p1", 500, PledgeState::Pending)];
    let mut pending = PendingPledges::new();
    // The server already returned it, with an updated state.
    pending.add(pledge("p1", 500, PledgeState::Initiated));

    let merged = pending.merge(&fetched);
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].state, PledgeState::Pending);
}

#[test]
fn test_re_adding_replaces() {
    let mut pending = PendingPledges::new();
    pending.add(pledge("p1", 100, PledgeState::Initiated));
    pending.add(pledge("p1", 100, PledgeState::Pending));

    assert_eq!(pending.len(), 1);
    assert_eq!(pending.merge(&[])[0].state, PledgeState::Pending);
}

#[test]
fn test_reconcile_drops_what_the_server_returned() {
    let mut pending = PendingPledges::new();
    pending.add(pledge("p1", 100, PledgeState::Initiated));

    let fetched = vec![pledge("p1", 100, PledgeState::Pending)];
    assert_eq!(pending.reconcile(&fetched), 1);
    assert!(pending.is_empty());
    assert!(pending.merge(&[]).is_empty());
}

#[test]
fn test_reconcile_keeps_additions_the_server_has_not_seen() {
    let mut pending = PendingPledges::new();
    pending.add(pledge("p1", 100, PledgeState::Initiated));
    // Recorded while the fetch below was already in flight.
    pending.add(pledge("p2", 300, PledgeState::Initiated));

    let fetched = vec![pledge("p1", 100, PledgeState::Pending)];
    assert_eq!(pending.reconcile(&fetched), 1);
    assert_eq!(pending.len(), 1);

    let merged = pending.merge(&fetched);
    assert_eq!(
        merged.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
        vec!["p1", "p2"]
    );
    assert_eq!(pending.reconcile(&[]), 0);
}

#[test]
fn test_fetched_collection_is_untouched() {
    let fetched = vec![pledge("p1", 500, PledgeState::Pending)];
    let mut pending = PendingPledges::new();
    pending.add(pledge("p2", 250, PledgeState::Initiated));

    let _ = pending.merge(&fetched);
    assert_eq!(fetched.len(), 1);
}
