//! Tool listing through the gateway.
//!
//! MCPO mounts every MCP server under `/<server>` and publishes one OpenAPI
//! document per server. Each tool is one path in that document.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde_json::Value;

use crate::health::authorized;

pub fn openapi_url(base_url: &str, server: &str) -> String {
    format!("{base_url}/{server}/openapi.json")
}

/// Tool names of one OpenAPI document, in document order.
pub fn tool_names(document: &Value) -> Vec<String> {
    document
        .get("paths")
        .and_then(Value::as_object)
        .map(|paths| {
            paths
                .keys()
                .map(|path| path.trim_start_matches('/').to_string())
                .filter(|name| !name.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Fetch and parse the tool names one server exposes.
pub async fn fetch_server_tools(
    client: &Client,
    base_url: &str,
    server: &str,
    api_key: Option<&str>,
) -> Result<Vec<String>> {
    let url = openapi_url(base_url, server);
    let response = authorized(client.get(&url), api_key)
        .send()
        .await
        .with_context(|| format!("GET {url} failed"))?;

    let status = response.status();
    if !status.is_success() {
        bail!("GET {url} returned {status}");
    }

    let document: Value = response
        .json()
        .await
        .with_context(|| format!("{url} is not valid JSON"))?;
    Ok(tool_names(&document))
}
