//! Global Application State
//!
//! Reactive state management using Leptos signals.

use leptos::*;

use railcount::{BarChart, FrameOutcome, LiveDashboard};

/// Event log entries kept in the page
pub const LOG_CAPACITY: usize = 200;

/// One chart's load state
#[derive(Clone, Debug, PartialEq)]
pub enum ChartSlot {
    Loading,
    Ready(BarChart),
    Unavailable(String),
}

impl ChartSlot {
    pub fn from_result(result: Result<BarChart, String>) -> Self {
        match result {
            Ok(chart) => ChartSlot::Ready(chart),
            Err(e) => ChartSlot::Unavailable(e),
        }
    }

    pub fn chart(&self) -> Option<&BarChart> {
        match self {
            ChartSlot::Ready(chart) => Some(chart),
            _ => None,
        }
    }
}

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Session, live fields and event log
    pub live: RwSignal<LiveDashboard>,
    /// Daily trains/cars chart
    pub daily_chart: RwSignal<ChartSlot>,
    /// Cars-per-train chart
    pub recent_chart: RwSignal<ChartSlot>,
    /// WebSocket connection status
    pub ws_connected: RwSignal<bool>,
    /// Last frame timestamp
    pub last_frame: RwSignal<Option<i64>>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        live: create_rw_signal(LiveDashboard::new(LOG_CAPACITY)),
        daily_chart: create_rw_signal(ChartSlot::Loading),
        recent_chart: create_rw_signal(ChartSlot::Loading),
        ws_connected: create_rw_signal(false),
        last_frame: create_rw_signal(None),
        error: create_rw_signal(None),
    };

    provide_context(state);
}

impl GlobalState {
    /// Run one text frame through the live pipeline
    pub fn handle_frame(&self, text: &str) {
        let mut result = None;
        self.live.update(|dashboard| {
            result = Some(dashboard.handle_frame(text));
        });

        match result {
            Some(Ok(FrameOutcome::Undecodable)) => {
                web_sys::console::warn_1(&"Frame does not match a known event shape".into());
            }
            Some(Err(e)) => {
                web_sys::console::warn_1(&format!("Dropping malformed frame: {}", e).into());
            }
            _ => {}
        }
        self.last_frame.set(Some(chrono::Utc::now().timestamp_millis()));
    }

    /// Count a frame the pipeline cannot take (binary payloads)
    pub fn reject_frame(&self) {
        self.live.update(|dashboard| dashboard.reject_frame());
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }

    /// Clear error message
    pub fn clear_error(&self) {
        self.error.set(None);
    }
}
