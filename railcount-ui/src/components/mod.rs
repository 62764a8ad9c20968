//! UI Components
//!
//! Leptos components for the dashboard.

pub mod chart;
pub mod event_log;
pub mod live_panel;
pub mod toast;

pub use chart::BarChartCanvas;
pub use event_log::EventLog;
pub use live_panel::LivePanel;
pub use toast::Toast;
