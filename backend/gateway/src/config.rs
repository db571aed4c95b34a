//! Application configuration loaded from environment variables.

use std::time::Duration;

use crate::errors::{GatewayError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the pledge REST API (e.g. https://api.example.com)
    pub api_url: String,
    /// Port for the gateway HTTP server
    pub api_port: u16,
    /// How long (in seconds) a fetched collection is served from cache
    pub cache_ttl_secs: u64,
    /// Extra attempts for idempotent upstream reads
    pub fetch_retries: u32,
    /// First back-off delay between read attempts, doubled on each retry
    pub retry_backoff_ms: u64,
    /// Upstream request timeout
    pub request_timeout_secs: u64,
    /// Issue rows drawn on the badge
    pub badge_max_issues: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            api_url: env_var("API_URL")
                .map_err(|_| {
                    GatewayError::Config("API_URL environment variable is required".to_string())
                })?
                .trim_end_matches('/')
                .to_string(),
            api_port: parse_or("API_PORT", "3000")?,
            cache_ttl_secs: parse_or("CACHE_TTL_SECS", "30")?,
            fetch_retries: parse_or("FETCH_RETRIES", "3")?,
            retry_backoff_ms: parse_or("RETRY_BACKOFF_MS", "500")?,
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", "30")?,
            badge_max_issues: parse_or("BADGE_MAX_ISSUES", "3")?,
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| GatewayError::Config(format!("Missing env var: {key}")))
}

fn parse_or<T: std::str::FromStr>(key: &str, default: &str) -> Result<T> {
    env_var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| GatewayError::Config(format!("Invalid {key}")))
}
