//! # Railcount
//!
//! Dashboard client for a trackside train counter: summary charts from the
//! counter's REST API and a live session tracker fed by its event stream.
//!
//! ## Features
//!
//! - **Summary charts**: Daily trains/cars per direction and cars per recent train
//! - **Live session**: Active train, direction, speed, totals and engine numbers
//! - **Event log**: Every stream frame, pretty-printed, newest first
//! - **Reconnects**: Exponential backoff when the stream drops
//!
//! ## Modules
//!
//! - [`models`]: Wire types for the REST payloads and stream events
//! - [`charts`]: Chart descriptions derived from summary rows
//! - [`session`]: The live session state machine
//! - [`live`]: Frame pipeline (parse, log, decode, dispatch)
//! - [`api`]: REST client for the summary endpoints (native)
//! - [`stream`]: WebSocket listener with reconnect (native)
//! - [`watcher`]: Stream and summary load started side by side (native)
//!
//! Everything outside the `native` feature builds for `wasm32` and is shared
//! with the browser dashboard.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use railcount::{Config, StreamListener, SummaryClient, SummaryLoader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!
//!     let loader = SummaryLoader::new(SummaryClient::new(&config.server)?);
//!     let charts = loader.load().await;
//!     if let Ok(daily) = &charts.daily {
//!         println!("{} days of history", daily.rows.len());
//!     }
//!
//!     let (listener, mut updates) = StreamListener::from_config(&config)?;
//!     tokio::spawn(listener.run());
//!
//!     while updates.changed().await.is_ok() {
//!         println!("active train: {}", updates.borrow().view.active_train);
//!     }
//!     Ok(())
//! }
//! ```

pub mod charts;
pub mod error;
pub mod event_log;
pub mod live;
pub mod models;
pub mod session;

#[cfg(feature = "native")]
pub mod api;
#[cfg(feature = "native")]
pub mod config;
#[cfg(feature = "native")]
pub mod stream;
#[cfg(feature = "native")]
pub mod summary;
#[cfg(feature = "native")]
pub mod terminal;
#[cfg(feature = "native")]
pub mod watcher;

// Re-export top-level types for convenience
pub use charts::{daily_chart, recent_trains_chart, BarChart, Dataset, Fill};
pub use error::{DashboardError, DashboardResult};
pub use event_log::{EventLog, LogEntry};
pub use live::{FrameOutcome, LiveDashboard};
pub use models::{
    DailySummaryPoint, DataEnvelope, EngineDirectionCount, RecentTrainPoint, StreamEvent, Totals,
};
pub use session::{dispatch, DispatchOutcome, LiveView, SessionState, PLACEHOLDER};

#[cfg(feature = "native")]
pub use api::SummaryClient;
#[cfg(feature = "native")]
pub use config::{Config, ConfigError, LogPanelConfig, LoggingConfig, ServerConfig, StreamConfig};
#[cfg(feature = "native")]
pub use stream::{
    ConnectionStatus, LiveSnapshot, ReconnectPolicy, StreamListener, DEFAULT_SNAPSHOT_LOG_LINES,
};
#[cfg(feature = "native")]
pub use summary::{LoadedChart, SummaryCharts, SummaryLoader};
#[cfg(feature = "native")]
pub use watcher::WatchSession;
