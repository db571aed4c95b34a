//! Axum REST API handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use pledge_core::{
    validate_dispute_reason, BackofficePledge, BackofficeReward, Funding, Issue, IssueStatus,
    PendingPledges, Pledge, QueryCache,
};

use crate::badge::{render_badge, PLACEHOLDER_SVG};
use crate::client::ApiClient;
use crate::config::Config;
use crate::errors::{GatewayError, Result};
use crate::queries::{self, PendingKey};
use crate::views::{
    backoffice_listing, reward_listing, BackofficeIssueView, BackofficeRewardView,
    PledgeSummaryResponse,
};

const ACTION_FAILED: &str = "Something went wrong. Please try again.";
const DISPUTE_RECEIVED: &str = "Thanks, we'll review your dispute soon.";

pub struct AppState {
    pub client: ApiClient,
    pub config: Config,
    pub issues: Mutex<QueryCache<Issue>>,
    pub pledges: Mutex<QueryCache<Vec<Pledge>>>,
    pub backoffice: Mutex<QueryCache<Vec<BackofficePledge>>>,
    pub rewards: Mutex<QueryCache<Vec<BackofficeReward>>>,
    /// Optimistic additions, keyed by issue id and viewer scope.
    pub pending: Mutex<HashMap<PendingKey, PendingPledges>>,
}

impl AppState {
    pub fn new(client: ApiClient, config: Config) -> Self {
        let ttl = config.cache_ttl();
        Self {
            client,
            config,
            issues: Mutex::new(QueryCache::new(ttl)),
            pledges: Mutex::new(QueryCache::new(ttl)),
            backoffice: Mutex::new(QueryCache::new(ttl)),
            rewards: Mutex::new(QueryCache::new(ttl)),
            pending: Mutex::new(HashMap::new()),
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/embed/fund-our-backlog.svg", get(fund_our_backlog_badge))
        .route("/issues/:issue_id/pledges/summary", get(pledge_summary))
        .route("/issues/:issue_id/pledges/pending", post(record_pending_pledge))
        .route("/pledges/:pledge_id/dispute", post(dispute_pledge))
        .route("/backoffice/pledges", get(backoffice_pledges))
        .route("/backoffice/issues/:issue_id", get(backoffice_issue))
        .route("/backoffice/rewards", get(backoffice_rewards))
        .route(
            "/backoffice/pledges/:pledge_id/mark_disputed",
            post(backoffice_mark_disputed),
        )
        .route(
            "/backoffice/pledges/:pledge_id/mark_pending",
            post(backoffice_mark_pending),
        )
        .route("/backoffice/transfers", post(backoffice_create_transfer))
        .route("/invites/claim", post(claim_invite))
        .route("/terms/accept", post(accept_terms))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Request / response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct BadgeQuery {
    pub org: Option<String>,
    pub repo: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub viewer: Option<String>,
    #[serde(default)]
    pub confirming: bool,
}

#[derive(Debug, Deserialize)]
pub struct RewardsQuery {
    pub issue_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DisputeRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub pledge_id: String,
    pub issue_reward_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ClaimInviteRequest {
    pub code: String,
}

/// Outcome of a mutating action, shown inline next to the action.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

#[derive(Serialize)]
pub struct PendingResponse {
    pub issue_id: String,
    pub pending: usize,
}

#[derive(Serialize)]
pub struct BackofficeResponse {
    pub count: usize,
    pub issues: Vec<BackofficeIssueView>,
}

#[derive(Serialize)]
pub struct BackofficeIssueDetail {
    pub issue_id: String,
    pub reference: String,
    pub title: String,
    pub github_url: Option<String>,
    pub progress: IssueStatus,
    pub funding: Funding,
}

#[derive(Serialize)]
pub struct RewardsResponse {
    pub issue_id: String,
    pub count: usize,
    pub rewards: Vec<BackofficeRewardView>,
}

fn auth_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /embed/fund-our-backlog.svg?org=<org>&repo=<repo>`
///
/// Never fails towards the image consumer: any error is logged and answered
/// with a 1×1 placeholder.
pub async fn fund_our_backlog_badge(
    State(state): State<Arc<AppState>>,
    Query(params): Query<BadgeQuery>,
) -> Response {
    let Some(org) = params.org.filter(|o| !o.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "No org provided").into_response();
    };
    let repo = params.repo.filter(|r| !r.is_empty());

    let rendered = match state.client.search_badged_issues(&org, repo.as_deref()).await {
        Ok(issues) => render_badge(&issues, state.config.badge_max_issues),
        Err(e) => Err(e),
    };

    match rendered {
        Ok(svg) => svg_response(StatusCode::OK, svg),
        Err(e) => {
            error!("Badge for {org} failed: {e}");
            svg_response(StatusCode::BAD_REQUEST, PLACEHOLDER_SVG.to_string())
        }
    }
}

fn svg_response(status: StatusCode, body: String) -> Response {
    (
        status,
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

/// `GET /issues/:issue_id/pledges/summary`
///
/// Funding totals, confirmation state and dispute buckets for one issue.
pub async fn pledge_summary(
    State(state): State<Arc<AppState>>,
    Path(issue_id): Path<String>,
    Query(params): Query<SummaryQuery>,
    headers: HeaderMap,
) -> Result<Json<PledgeSummaryResponse>> {
    let auth = auth_header(&headers);
    let issue = queries::issue(&state, &issue_id, auth).await?;
    let pledges = queries::pledges_with_pending(&state, &issue_id, auth).await?;

    Ok(Json(PledgeSummaryResponse::build(
        issue_id,
        issue.progress,
        &issue.funding,
        pledges,
        params.viewer.as_deref(),
        params.confirming,
        chrono::Utc::now(),
    )))
}

/// `POST /issues/:issue_id/pledges/pending`
///
/// Record a pledge that was just created so it shows up before the next
/// refetch returns it.
pub async fn record_pending_pledge(
    State(state): State<Arc<AppState>>,
    Path(issue_id): Path<String>,
    headers: HeaderMap,
    Json(pledge): Json<Pledge>,
) -> Result<impl IntoResponse> {
    if pledge.issue_id != issue_id {
        return Err(GatewayError::InvalidRequest(format!(
            "pledge {} belongs to issue {}, not {issue_id}",
            pledge.id, pledge.issue_id
        )));
    }

    info!("Recording pending pledge {} on issue {issue_id}", pledge.id);
    let pending =
        queries::record_pending(&state, &issue_id, auth_header(&headers), pledge).await;
    Ok((
        StatusCode::ACCEPTED,
        Json(PendingResponse { issue_id, pending }),
    ))
}

/// `POST /pledges/:pledge_id/dispute`
pub async fn dispute_pledge(
    State(state): State<Arc<AppState>>,
    Path(pledge_id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<DisputeRequest>,
) -> Result<Response> {
    let reason = validate_dispute_reason(&body.reason).ok_or_else(|| {
        GatewayError::InvalidRequest("dispute reason must be longer than 4 characters".to_string())
    })?;

    let outcome = state
        .client
        .dispute_pledge(&pledge_id, reason, auth_header(&headers))
        .await;
    let what = format!("dispute of {pledge_id}");
    Ok(finish_action(&state, outcome, DISPUTE_RECEIVED, &what).await)
}

/// `GET /backoffice/pledges`
pub async fn backoffice_pledges(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BackofficeResponse>> {
    let listing = queries::backoffice_pledges(&state, auth_header(&headers)).await?;
    let issues = backoffice_listing(listing);
    Ok(Json(BackofficeResponse {
        count: issues.len(),
        issues,
    }))
}

/// `GET /backoffice/issues/:issue_id`
pub async fn backoffice_issue(
    State(state): State<Arc<AppState>>,
    Path(issue_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<BackofficeIssueDetail>> {
    let issue = queries::issue(&state, &issue_id, auth_header(&headers)).await?;
    Ok(Json(BackofficeIssueDetail {
        issue_id: issue.id.clone(),
        reference: issue.reference(),
        title: issue.title.clone(),
        github_url: issue.github_url(),
        progress: issue.progress,
        funding: issue.funding,
    }))
}

/// `GET /backoffice/rewards?issue_id=<id>`
///
/// Reward shares of the issue's pledges, with transfer state.
pub async fn backoffice_rewards(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RewardsQuery>,
    headers: HeaderMap,
) -> Result<Json<RewardsResponse>> {
    if params.issue_id.is_empty() {
        return Err(GatewayError::InvalidRequest("issue_id is required".to_string()));
    }
    let rewards =
        queries::backoffice_rewards(&state, &params.issue_id, auth_header(&headers)).await?;
    let rewards = reward_listing(&rewards);
    Ok(Json(RewardsResponse {
        issue_id: params.issue_id,
        count: rewards.len(),
        rewards,
    }))
}

/// `POST /backoffice/pledges/:pledge_id/mark_disputed`
pub async fn backoffice_mark_disputed(
    State(state): State<Arc<AppState>>,
    Path(pledge_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let outcome = state
        .client
        .mark_disputed(&pledge_id, auth_header(&headers))
        .await;
    let what = format!("mark_disputed {pledge_id}");
    finish_action(&state, outcome, "Pledge marked as disputed", &what).await
}

/// `POST /backoffice/pledges/:pledge_id/mark_pending`
pub async fn backoffice_mark_pending(
    State(state): State<Arc<AppState>>,
    Path(pledge_id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let outcome = state
        .client
        .mark_pending(&pledge_id, auth_header(&headers))
        .await;
    let what = format!("mark_pending {pledge_id}");
    finish_action(&state, outcome, "Pledge marked as pending", &what).await
}

/// `POST /backoffice/transfers`
pub async fn backoffice_create_transfer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<TransferRequest>,
) -> Response {
    let outcome = state
        .client
        .create_transfer(&body.pledge_id, &body.issue_reward_id, auth_header(&headers))
        .await;
    let what = format!(
        "transfer of {} for reward {}",
        body.pledge_id, body.issue_reward_id
    );
    finish_action(&state, outcome, "Transfer created", &what).await
}

/// `POST /invites/claim`
pub async fn claim_invite(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<ClaimInviteRequest>,
) -> Response {
    match state.client.claim_invite(&body.code, auth_header(&headers)).await {
        Ok(result) => action_ok("Invite code accepted", Some(result)),
        Err(e) => action_failed("invite claim", &e),
    }
}

/// `POST /terms/accept`
pub async fn accept_terms(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match state.client.accept_terms(auth_header(&headers)).await {
        Ok(result) => action_ok("Terms of service accepted", Some(result)),
        Err(e) => action_failed("terms acceptance", &e),
    }
}

/// Pledge-changing actions invalidate cached pledge data on success.
async fn finish_action(
    state: &AppState,
    outcome: Result<Value>,
    success: &str,
    what: &str,
) -> Response {
    match outcome {
        Ok(result) => {
            queries::invalidate_after_pledge_change(state).await;
            info!("{what} succeeded");
            action_ok(success, Some(result))
        }
        Err(e) => action_failed(what, &e),
    }
}

fn action_ok(message: &str, result: Option<Value>) -> Response {
    (
        StatusCode::OK,
        Json(ActionResponse {
            ok: true,
            message: message.to_string(),
            result: result.filter(|v| !v.is_null()),
        }),
    )
        .into_response()
}

fn action_failed(what: &str, e: &GatewayError) -> Response {
    error!("{what} failed: {e}");
    (
        StatusCode::BAD_GATEWAY,
        Json(ActionResponse {
            ok: false,
            message: ACTION_FAILED.to_string(),
            result: None,
        }),
    )
        .into_response()
}

// ─────────────────────────────────────────────────────────
// Handler tests against a fake upstream
// ─────────────────────────────────────────────────────────
