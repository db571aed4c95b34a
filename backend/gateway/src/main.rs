//! Pledge gateway entry point.
//!
//! Sits between the web client and the pledge REST API: derives funding
//! summaries and dispute buckets, caches reads, invalidates them after
//! pledge-changing actions, and serves the embeddable "fund our backlog"
//! SVG badge.

mod api;
mod badge;
mod client;
mod config;
mod errors;
mod queries;
mod views;

use std::sync::Arc;

use reqwest::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::AppState;
use client::ApiClient;
use config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    let http = Client::builder()
        .timeout(config.request_timeout())
        .build()?;
    let client = ApiClient::new(http, &config);

    info!(
        "Forwarding to {} (cache ttl {}s, {} read retries)",
        config.api_url, config.cache_ttl_secs, config.fetch_retries
    );

    let addr = format!("0.0.0.0:{}", config.api_port);
    let app = api::router(Arc::new(AppState::new(client, config)));

    info!("Gateway listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
