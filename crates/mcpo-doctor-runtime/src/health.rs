//! HTTP probes against the gateway's documentation endpoint.
//!
//! MCPO serves its aggregated OpenAPI UI at `/docs` once every configured
//! server has been mounted, so a 2xx there means the gateway is ready.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

/// Readiness endpoint of the gateway.
pub const DOCS_PATH: &str = "/docs";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(2);
const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of waiting for a freshly spawned gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// The process exited before it answered.
    Exited(ExitStatus),
    TimedOut,
}

/// Client used for every gateway request.
pub fn http_client() -> reqwest::Result<Client> {
    Client::builder().timeout(REQUEST_TIMEOUT).build()
}

pub fn docs_url(base_url: &str) -> String {
    format!("{base_url}{DOCS_PATH}")
}

/// Attach the gateway API key, if one is configured.
pub fn authorized(request: RequestBuilder, api_key: Option<&str>) -> RequestBuilder {
    match api_key {
        Some(key) => request.bearer_auth(key),
        None => request,
    }
}

/// Single `GET /docs`; returns the response status.
pub async fn probe_docs(
    client: &Client,
    base_url: &str,
    api_key: Option<&str>,
) -> reqwest::Result<StatusCode> {
    let response = authorized(client.get(docs_url(base_url)), api_key)
        .send()
        .await?;
    Ok(response.status())
}

/// Poll `GET /docs` once per second until it answers 2xx.
///
/// `exited` is checked before every attempt so a gateway that crashes on
/// startup is reported right away instead of after the full timeout.
pub async fn wait_until_ready<F>(
    client: &Client,
    base_url: &str,
    api_key: Option<&str>,
    limit: Duration,
    mut exited: F,
) -> io::Result<Readiness>
where
    F: FnMut() -> io::Result<Option<ExitStatus>>,
{
    let url = docs_url(base_url);
    info!(%url, ?limit, "Waiting for MCPO server to be ready");
    let deadline = Instant::now() + limit;

    loop {
        if let Some(status) = exited()? {
            return Ok(Readiness::Exited(status));
        }

        match probe_docs(client, base_url, api_key).await {
            Ok(status) if status.is_success() => {
                info!(%url, "MCPO server is ready");
                return Ok(Readiness::Ready);
            }
            Ok(status) => debug!(%status, "Docs endpoint not ready, retrying..."),
            Err(e) => debug!(error = %e, "Docs endpoint unreachable, retrying..."),
        }

        if Instant::now() >= deadline {
            return Ok(Readiness::TimedOut);
        }
        sleep(READY_POLL_INTERVAL).await;
    }
}
