//! Watch Session
//!
//! Starts the live stream and the summary load side by side. The stream task
//! is spawned first, so frames are consumed and published while a slow
//! summary endpoint is still answering (or timing out).

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::api::SummaryClient;
use crate::config::Config;
use crate::error::DashboardResult;
use crate::live::LiveDashboard;
use crate::stream::{LiveSnapshot, StreamListener};
use crate::summary::{SummaryCharts, SummaryLoader};

/// Background tasks behind one `watch` run
pub struct WatchSession {
    /// Snapshot after every frame and status change
    pub updates: watch::Receiver<LiveSnapshot>,
    /// Resolves once the stream ends for good
    pub stream: JoinHandle<DashboardResult<LiveDashboard>>,
    /// Resolves once both summary charts are loaded or failed
    pub summary: Option<JoinHandle<SummaryCharts>>,
}

impl WatchSession {
    /// Spawn the stream listener, then (optionally) the summary load.
    ///
    /// `snapshot_log_lines` bounds the log entries copied into each snapshot.
    pub fn start(
        config: &Config,
        snapshot_log_lines: usize,
        load_summary: bool,
    ) -> DashboardResult<Self> {
        let (listener, updates) = StreamListener::from_config(config)?;
        let listener = listener.with_snapshot_log_lines(snapshot_log_lines);

        // Build the client up front so a bad URL fails before anything runs
        let loader = if load_summary {
            Some(SummaryLoader::new(SummaryClient::new(&config.server)?))
        } else {
            None
        };

        tracing::info!(url = %listener.url(), "Following event stream");
        let stream = tokio::spawn(listener.run());

        let summary = loader.map(|loader| {
            tracing::info!("Loading summary charts");
            tokio::spawn(async move { loader.load().await })
        });

        Ok(Self {
            updates,
            stream,
            summary,
        })
    }
}
