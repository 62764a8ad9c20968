//! Train Counter API
//!
//! Client side of the train counter server's REST endpoints.
//!
//! # Endpoints
//!
//! - `GET /api/summary/daily` - Trains and cars per day, split EB/WB
//! - `GET /api/trains/recent` - The most recent train passes
//! - `GET /api/engines/by_direction` - Engine sightings per direction
//!
//! The live event stream (`GET /ws`) is handled by [`crate::stream`]; its URL
//! is derived from the same base URL with [`ws_url`].

mod client;

pub use client::SummaryClient;

use crate::error::{DashboardError, DashboardResult};

pub const DAILY_SUMMARY_PATH: &str = "/api/summary/daily";
pub const RECENT_TRAINS_PATH: &str = "/api/trains/recent";
pub const ENGINES_BY_DIRECTION_PATH: &str = "/api/engines/by_direction";

/// Validate an http(s) base URL and strip any trailing slash
pub fn normalize_base_url(url: &str) -> DashboardResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let host = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));

    match host {
        Some(host) if !host.is_empty() => Ok(trimmed.to_string()),
        _ => Err(DashboardError::InvalidUrl(url.to_string())),
    }
}

/// WebSocket URL for `path` on the same host as `base_url`.
///
/// `http` becomes `ws` and `https` becomes `wss`.
pub fn ws_url(base_url: &str, path: &str) -> DashboardResult<String> {
    let base = normalize_base_url(base_url)?;
    let ws_base = match base.strip_prefix("https://") {
        Some(rest) => format!("wss://{}", rest),
        None => format!("ws://{}", base.trim_start_matches("http://")),
    };

    Ok(format!("{}/{}", ws_base, path.trim_start_matches('/')))
}
