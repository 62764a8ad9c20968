//! HTTP API Client
//!
//! Functions for communicating with the train counter REST API.

use gloo_net::http::Request;
use serde::de::DeserializeOwned;

use railcount::{DailySummaryPoint, DataEnvelope, RecentTrainPoint};

/// Used when the page has no usable origin (e.g. opened from disk)
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

const API_BASE_KEY: &str = "railcount_api_url";

/// API base URL: the `railcount_api_url` local-storage override, else the
/// page's own origin
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(window) => window,
        None => return DEFAULT_API_BASE.to_string(),
    };

    let stored = window
        .local_storage()
        .ok()
        .flatten()
        .and_then(|storage| storage.get_item(API_BASE_KEY).ok().flatten());

    let url = stored
        .or_else(|| window.location().origin().ok())
        .filter(|url| url.starts_with("http"))
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// WebSocket URL for `path` on the same host as `base`
pub fn ws_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let ws_base = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else {
        format!("ws://{}", base.trim_start_matches("http://"))
    };
    format!("{}/{}", ws_base, path.trim_start_matches('/'))
}

// ============ API Functions ============

/// Fetch `GET /api/summary/daily`
pub async fn fetch_daily_summary() -> Result<Vec<DailySummaryPoint>, String> {
    get_data("/api/summary/daily").await
}

/// Fetch `GET /api/trains/recent`
pub async fn fetch_recent_trains() -> Result<Vec<RecentTrainPoint>, String> {
    get_data("/api/trains/recent").await
}

async fn get_data<T: DeserializeOwned>(path: &str) -> Result<Vec<T>, String> {
    let api_base = api_base();

    let response = Request::get(&format!("{}{}", api_base, path))
        .send()
        .await
        .map_err(|e| format!("Network error: {}", e))?;

    if !response.ok() {
        return Err(format!("{} returned HTTP {}", path, response.status()));
    }

    let envelope: DataEnvelope<T> = response
        .json()
        .await
        .map_err(|e| format!("Parse error: {}", e))?;

    Ok(envelope.data)
}
