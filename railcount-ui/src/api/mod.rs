//! HTTP API
//!
//! Summary endpoints of the train counter, fetched with gloo-net.

mod client;

pub use client::{api_base, fetch_daily_summary, fetch_recent_trains, ws_url};
