//! Cache-through reads and post-mutation invalidation.
//!
//! Reads consult the [`QueryCache`](pledge_core::QueryCache) first and only
//! hit the API on a miss. Mutating handlers call [`invalidate_after_pledge_change`]
//! so the next read refetches instead of patching cached data.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use pledge_core::{BackofficePledge, BackofficeReward, Issue, Pledge, QueryKey};
use tracing::debug;

use crate::api::AppState;
use crate::errors::Result;

pub const ISSUE: &str = "issue";
pub const PLEDGES: &str = "pledges";
pub const BACKOFFICE_PLEDGES: &str = "backoffice_pledges";
pub const BACKOFFICE_REWARDS: &str = "backoffice_rewards";

/// Pending additions belong to one issue as seen by one viewer.
pub type PendingKey = (String, String);

fn pending_key(issue_id: &str, auth: Option<&str>) -> PendingKey {
    (issue_id.to_string(), viewer_scope(auth))
}

/// Capability flags differ per viewer, so every key carries a digest of the
/// forwarded credentials.
pub fn viewer_scope(auth: Option<&str>) -> String {
    match auth {
        Some(value) => {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            format!("{:016x}", hasher.finish())
        }
        None => "anonymous".to_string(),
    }
}

pub async fn issue(state: &AppState, issue_id: &str, auth: Option<&str>) -> Result<Issue> {
    let key = QueryKey::new(ISSUE).param(issue_id).param(viewer_scope(auth));
    if let Some(hit) = state.issues.lock().await.get(&key) {
        return Ok(hit);
    }

    let fetched = state.client.get_issue(issue_id, auth).await?;
    state.issues.lock().await.insert(key, fetched.clone());
    Ok(fetched)
}

/// Pledges of an issue with the viewer's pending local additions merged in.
///
/// A successful refetch drops the additions it now returns.
pub async fn pledges_with_pending(
    state: &AppState,
    issue_id: &str,
    auth: Option<&str>,
) -> Result<Vec<Pledge>> {
    let key = QueryKey::new(PLEDGES).param(issue_id).param(viewer_scope(auth));
    let scope = pending_key(issue_id, auth);
    let cached = state.pledges.lock().await.get(&key);

    let fetched = match cached {
        Some(hit) => hit,
        None => {
            let fetched = state.client.list_pledges(issue_id, auth).await?;
            state.pledges.lock().await.insert(key, fetched.clone());
            let mut pending = state.pending.lock().await;
            if let Some(additions) = pending.get_mut(&scope) {
                additions.reconcile(&fetched);
                if additions.is_empty() {
                    pending.remove(&scope);
                }
            }
            fetched
        }
    };

    let pending = state.pending.lock().await;
    Ok(match pending.get(&scope) {
        Some(additions) => additions.merge(&fetched),
        None => fetched,
    })
}

/// Record a just-created pledge for this viewer until a refetch returns it.
pub async fn record_pending(
    state: &AppState,
    issue_id: &str,
    auth: Option<&str>,
    pledge: Pledge,
) -> usize {
    let mut pending = state.pending.lock().await;
    let additions = pending.entry(pending_key(issue_id, auth)).or_default();
    additions.add(pledge);
    additions.len()
}

pub async fn backoffice_pledges(state: &AppState, auth: Option<&str>) -> Result<Vec<BackofficePledge>> {
    let key = QueryKey::new(BACKOFFICE_PLEDGES).param(viewer_scope(auth));
    if let Some(hit) = state.backoffice.lock().await.get(&key) {
        return Ok(hit);
    }

    let fetched = state.client.backoffice_pledges(auth).await?;
    state.backoffice.lock().await.insert(key, fetched.clone());
    Ok(fetched)
}

pub async fn backoffice_rewards(
    state: &AppState,
    issue_id: &str,
    auth: Option<&str>,
) -> Result<Vec<BackofficeReward>> {
    let key = QueryKey::new(BACKOFFICE_REWARDS)
        .param(issue_id)
        .param(viewer_scope(auth));
    if let Some(hit) = state.rewards.lock().await.get(&key) {
        return Ok(hit);
    }

    let fetched = state.client.backoffice_rewards(issue_id, auth).await?;
    state.rewards.lock().await.insert(key, fetched.clone());
    Ok(fetched)
}

/// Pledge state or funding changed upstream: drop everything derived from it.
pub async fn invalidate_after_pledge_change(state: &AppState) {
    let pledges = state.pledges.lock().await.invalidate(PLEDGES);
    let backoffice = state.backoffice.lock().await.invalidate(BACKOFFICE_PLEDGES);
    let rewards = state.rewards.lock().await.invalidate(BACKOFFICE_REWARDS);
    let issues = state.issues.lock().await.invalidate(ISSUE);
    debug!(
        "Invalidated {pledges} pledge, {backoffice} back-office, {rewards} reward and {issues} issue queries"
    );
}
