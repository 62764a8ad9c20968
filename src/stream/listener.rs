//! Stream Listener
//!
//! Owns the WebSocket connection to `/ws`, feeds every text frame through the
//! [`LiveDashboard`] pipeline and publishes a [`LiveSnapshot`] after each one.

use futures_util::{Stream, StreamExt};
use serde::Serialize;
use tokio::sync::watch;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use uuid::Uuid;

use super::status::{ConnectionStatus, ReconnectPolicy};
use crate::api::ws_url;
use crate::config::Config;
use crate::error::{DashboardError, DashboardResult};
use crate::event_log::LogEntry;
use crate::live::{FrameOutcome, LiveDashboard};
use crate::session::LiveView;

/// Log entries carried by each snapshot unless configured otherwise
pub const DEFAULT_SNAPSHOT_LOG_LINES: usize = 20;

/// Everything a renderer needs, published after every frame and status change
#[derive(Debug, Clone, Serialize)]
pub struct LiveSnapshot {
    pub view: LiveView,
    /// The newest log entries, newest first; never more than the listener's
    /// snapshot window
    pub log: Vec<LogEntry>,
    pub status: ConnectionStatus,
    pub active_train: Option<String>,
}

impl Default for LiveSnapshot {
    fn default() -> Self {
        Self {
            view: LiveView::default(),
            log: Vec::new(),
            status: ConnectionStatus::Connecting,
            active_train: None,
        }
    }
}

/// Client side of the live event stream
pub struct StreamListener {
    url: String,
    policy: ReconnectPolicy,
    dashboard: LiveDashboard,
    status: ConnectionStatus,
    snapshot_log_lines: usize,
    updates: watch::Sender<LiveSnapshot>,
}

impl StreamListener {
    pub fn new(
        url: impl Into<String>,
        policy: ReconnectPolicy,
        log_capacity: usize,
    ) -> (Self, watch::Receiver<LiveSnapshot>) {
        let (updates, receiver) = watch::channel(LiveSnapshot::default());
        let listener = Self {
            url: url.into(),
            policy,
            dashboard: LiveDashboard::new(log_capacity),
            status: ConnectionStatus::Connecting,
            snapshot_log_lines: DEFAULT_SNAPSHOT_LOG_LINES,
            updates,
        };
        (listener, receiver)
    }

    /// Build a listener for the configured server and stream path
    pub fn from_config(config: &Config) -> DashboardResult<(Self, watch::Receiver<LiveSnapshot>)> {
        let url = ws_url(&config.server.base_url, &config.stream.path)?;
        Ok(Self::new(
            url,
            ReconnectPolicy::from(&config.stream),
            config.log_panel.capacity,
        ))
    }

    /// Cap the log entries copied into each published snapshot.
    ///
    /// The dashboard's own log still keeps `log_capacity` entries; this only
    /// bounds the per-frame copy handed to renderers.
    pub fn with_snapshot_log_lines(mut self, lines: usize) -> Self {
        self.snapshot_log_lines = lines;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn dashboard(&self) -> &LiveDashboard {
        &self.dashboard
    }

    /// Connect and consume the stream until it ends for good.
    ///
    /// With reconnects disabled this returns the dashboard after the first
    /// connection closes, or the connect error. Otherwise it keeps
    /// reconnecting with backoff and only returns once the attempt limit is
    /// hit. The attempt counter resets after every successful connect.
    pub async fn run(mut self) -> DashboardResult<LiveDashboard> {
        let mut attempts: u32 = 0;

        loop {
            self.set_status(ConnectionStatus::Connecting);

            match connect_async(self.url.as_str()).await {
                Ok((socket, _response)) => {
                    attempts = 0;
                    let connection_id = Uuid::new_v4().to_string();
                    tracing::info!(url = %self.url, connection_id = %connection_id, "Stream connected");
                    self.set_status(ConnectionStatus::Connected { connection_id });

                    let reason = self.consume(socket).await;
                    tracing::info!(reason = %reason, "Stream closed");
                    self.set_status(ConnectionStatus::Disconnected { reason });
                }
                Err(e) => {
                    tracing::warn!(url = %self.url, error = %e, "Stream connect failed");
                    self.set_status(ConnectionStatus::Disconnected {
                        reason: e.to_string(),
                    });
                    if !self.policy.enabled {
                        return Err(e.into());
                    }
                }
            }

            if !self.policy.enabled {
                return Ok(self.dashboard);
            }

            if !self.policy.allows(attempts) {
                tracing::error!(attempts, "Giving up on the event stream");
                return Err(DashboardError::ReconnectExhausted { attempts });
            }

            let delay = self.policy.delay_for(attempts);
            attempts += 1;
            self.set_status(ConnectionStatus::Reconnecting {
                attempt: attempts,
                delay_ms: delay.as_millis() as u64,
            });
            tracing::info!(attempt = attempts, delay_ms = delay.as_millis() as u64, "Reconnecting");
            tokio::time::sleep(delay).await;
        }
    }

    /// Read frames until the stream closes, fails or runs dry.
    ///
    /// Returns the reason the stream stopped.
    pub async fn consume<S>(&mut self, mut stream: S) -> String
    where
        S: Stream<Item = Result<Message, WsError>> + Unpin,
    {
        while let Some(message) = stream.next().await {
            match message {
                Ok(Message::Text(text)) => self.handle_text(&text),
                Ok(Message::Binary(data)) => {
                    tracing::warn!(bytes = data.len(), "Dropping binary frame");
                    self.dashboard.reject_frame();
                    self.publish();
                }
                Ok(Message::Close(frame)) => {
                    return frame
                        .map(|f| f.reason.to_string())
                        .filter(|reason| !reason.is_empty())
                        .unwrap_or_else(|| "closed by server".to_string());
                }
                Ok(_) => {}
                Err(e) => return e.to_string(),
            }
        }

        "stream ended".to_string()
    }

    fn handle_text(&mut self, text: &str) {
        match self.dashboard.handle_frame(text) {
            Ok(FrameOutcome::Dispatched { kind, outcome }) => {
                tracing::debug!(kind, outcome = ?outcome, "Frame handled");
            }
            Ok(FrameOutcome::Undecodable) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Dropping malformed frame");
            }
        }
        self.publish();
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        self.status = status;
        self.publish();
    }

    fn publish(&self) {
        self.updates.send_replace(self.snapshot());
    }

    /// Current view, log and connection state
    pub fn snapshot(&self) -> LiveSnapshot {
        LiveSnapshot {
            view: self.dashboard.view().clone(),
            log: self
                .dashboard
                .log()
                .iter()
                .take(self.snapshot_log_lines)
                .cloned()
                .collect(),
            status: self.status.clone(),
            active_train: self
                .dashboard
                .session()
                .active_train_id()
                .map(String::from),
        }
    }
}
