//! Client for the pledge REST API.
//!
//! ## Resilience
//!
//! * Reads are retried a fixed number of times ([`Config::fetch_retries`])
//!   with a doubling back-off on transport errors, `429` and `5xx`, up to
//!   [`MAX_BACKOFF`] between attempts.
//! * Other `4xx` responses are hard failures and are not retried.
//! * Mutations are sent once. The caller reports failure to the user, who
//!   may resubmit.

use std::time::Duration;

use reqwest::{header::AUTHORIZATION, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};

use pledge_core::{BackofficePledge, BackofficeReward, Issue, ListResource, Pledge};

use crate::config::Config;
use crate::errors::{GatewayError, Result};

const ISSUE_SEARCH_SORT: &str = "funding_goal_desc_and_most_positive_reactions";
const MAX_BACKOFF: Duration = Duration::from_secs(60);

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    retries: u32,
    backoff: Duration,
}

impl ApiClient {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            base_url: config.api_url.clone(),
            retries: config.fetch_retries,
            backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    // ─────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────

    /// Badged, funding-seeking issues of an organization, best funded first.
    pub async fn search_badged_issues(&self, org: &str, repo: Option<&str>) -> Result<Vec<Issue>> {
        let mut query = vec![
            ("platform", "github"),
            ("organization_name", org),
            ("sort", ISSUE_SEARCH_SORT),
            ("have_badge", "true"),
        ];
        if let Some(repo) = repo {
            query.push(("repository_name", repo));
        }

        let list: ListResource<Issue> = self.get_json("/api/v1/issues/search", &query, None).await?;
        Ok(list.items)
    }

    pub async fn get_issue(&self, issue_id: &str, auth: Option<&str>) -> Result<Issue> {
        self.get_json(&format!("/api/v1/issues/{issue_id}"), &[], auth)
            .await
    }

    pub async fn list_pledges(&self, issue_id: &str, auth: Option<&str>) -> Result<Vec<Pledge>> {
        let list: ListResource<Pledge> = self
            .get_json("/api/v1/pledges/search", &[("issue_id", issue_id)], auth)
            .await?;
        Ok(list.items)
    }

    pub async fn backoffice_pledges(&self, auth: Option<&str>) -> Result<Vec<BackofficePledge>> {
        self.get_json("/api/v1/backoffice/pledges", &[], auth).await
    }

    /// Reward shares of every pledge on an issue.
    pub async fn backoffice_rewards(
        &self,
        issue_id: &str,
        auth: Option<&str>,
    ) -> Result<Vec<BackofficeReward>> {
        let list: ListResource<BackofficeReward> = self
            .get_json(
                "/api/v1/backoffice/rewards/by_issue",
                &[("issue_id", issue_id)],
                auth,
            )
            .await?;
        Ok(list.items)
    }

    // ─────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────

    pub async fn dispute_pledge(&self, pledge_id: &str, reason: &str, auth: Option<&str>) -> Result<Value> {
        let path = format!("/api/v1/pledges/{pledge_id}/dispute");
        let request = self.http.post(self.url(&path)).query(&[("reason", reason)]);
        self.send_once(request, &path, auth).await
    }

    pub async fn mark_disputed(&self, pledge_id: &str, auth: Option<&str>) -> Result<Value> {
        let path = format!("/api/v1/backoffice/pledges/mark_disputed/{pledge_id}");
        self.send_once(self.http.post(self.url(&path)), &path, auth)
            .await
    }

    pub async fn mark_pending(&self, pledge_id: &str, auth: Option<&str>) -> Result<Value> {
        let path = format!("/api/v1/backoffice/pledges/mark_pending/{pledge_id}");
        self.send_once(self.http.post(self.url(&path)), &path, auth)
            .await
    }

    pub async fn create_transfer(
        &self,
        pledge_id: &str,
        issue_reward_id: &str,
        auth: Option<&str>,
    ) -> Result<Value> {
        let path = "/api/v1/backoffice/pledges/create_transfer";
        let request = self.http.post(self.url(path)).json(&json!({
            "pledge_id": pledge_id,
            "issue_reward_id": issue_reward_id,
        }));
        self.send_once(request, path, auth).await
    }

    pub async fn claim_invite(&self, code: &str, auth: Option<&str>) -> Result<Value> {
        let path = "/api/v1/invites/claim_code";
        let request = self.http.post(self.url(path)).json(&json!({ "code": code }));
        self.send_once(request, path, auth).await
    }

    pub async fn accept_terms(&self, auth: Option<&str>) -> Result<Value> {
        let path = "/api/v1/users/me";
        let request = self
            .http
            .put(self.url(path))
            .json(&json!({ "accepted_terms_of_service": true }));
        self.send_once(request, path, auth).await
    }

    // ─────────────────────────────────────────────────────────
    // Transport
    // ─────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        auth: Option<&str>,
    ) -> Result<T> {
        let mut backoff = self.backoff.min(MAX_BACKOFF);
        let mut attempt = 0u32;

        loop {
            let request = with_auth(self.http.get(self.url(path)).query(query), auth);

            let failure = match request.send().await {
                Ok(resp) if resp.status().is_success() => {
                    debug!("GET {path} → {}", resp.status());
                    return Ok(resp.json().await?);
                }
                Ok(resp) if is_retryable(resp.status()) => GatewayError::Upstream {
                    status: resp.status().as_u16(),
                    path: path.to_string(),
                },
                Ok(resp) => {
                    return Err(GatewayError::Upstream {
                        status: resp.status().as_u16(),
                        path: path.to_string(),
                    })
                }
                Err(e) => GatewayError::Http(e),
            };

            if attempt >= self.retries {
                return Err(failure);
            }
            attempt += 1;
            warn!("GET {path} failed (attempt {attempt}, retrying in {backoff:?}): {failure}");
            tokio::time::sleep(backoff).await;
            backoff = next_backoff(backoff);
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        path: &str,
        auth: Option<&str>,
    ) -> Result<T> {
        let resp = with_auth(request, auth).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::Upstream {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body = resp.bytes().await?;
        if body.is_empty() {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&body)?)
    }
}

fn with_auth(request: RequestBuilder, auth: Option<&str>) -> RequestBuilder {
    match auth {
        Some(value) => request.header(AUTHORIZATION, value),
        None => request,
    }
}

fn next_backoff(current: Duration) -> Duration {
    current.saturating_mul(2).min(MAX_BACKOFF)
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
