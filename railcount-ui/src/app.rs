//! App Root Component
//!
//! Dashboard layout, global providers and startup loading.

use leptos::*;

use railcount::{daily_chart, recent_trains_chart};

use crate::api;
use crate::components::{BarChartCanvas, EventLog, LivePanel, Toast};
use crate::state::global::{provide_global_state, ChartSlot, GlobalState};
use crate::state::websocket::init_websocket;

/// Root application component
#[component]
pub fn App() -> impl IntoView {
    // Provide global state to all components
    provide_global_state();
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    // Summaries load independently; one failing leaves the other chart
    spawn_local(async move {
        let result = api::fetch_daily_summary().await.map(|rows| daily_chart(&rows));
        if let Err(e) = &result {
            web_sys::console::error_1(&format!("Failed to fetch daily summary: {}", e).into());
            state.show_error(&format!("Daily summary unavailable: {}", e));
        }
        state.daily_chart.set(ChartSlot::from_result(result));
    });
    spawn_local(async move {
        let result = api::fetch_recent_trains()
            .await
            .map(|rows| recent_trains_chart(&rows));
        if let Err(e) = &result {
            web_sys::console::error_1(&format!("Failed to fetch recent trains: {}", e).into());
            state.show_error(&format!("Recent trains unavailable: {}", e));
        }
        state.recent_chart.set(ChartSlot::from_result(result));
    });

    // Follow the event stream
    let client = init_websocket(state, &api::api_base());
    on_cleanup(move || client.close());

    view! {
        <div class="min-h-screen bg-gray-900 text-white flex flex-col">
            <header class="bg-gray-800 border-b border-gray-700 py-4 px-4">
                <div class="container mx-auto">
                    <h1 class="text-2xl font-bold">"Railcount"</h1>
                </div>
            </header>

            <main class="flex-1 container mx-auto px-4 py-8 pb-24 space-y-8">
                <LivePanel />
                <div class="grid md:grid-cols-2 gap-8">
                    <BarChartCanvas id="dailyChart" title="Daily trains and cars" slot=state.daily_chart />
                    <BarChartCanvas id="cptChart" title="Cars per recent train" slot=state.recent_chart />
                </div>
                <EventLog />
            </main>

            // Footer with connection status
            <Footer />

            // Toast notifications
            <Toast />
        </div>
    }
}

/// Footer component showing connection status
#[component]
fn Footer() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    view! {
        <footer class="fixed bottom-0 left-0 right-0 bg-gray-800 border-t border-gray-700 py-3 px-4">
            <div class="container mx-auto flex items-center justify-between text-sm">
                <div class="flex items-center space-x-2">
                    {move || {
                        if state.ws_connected.get() {
                            view! {
                                <span class="flex items-center space-x-1 text-green-400">
                                    <span class="w-2 h-2 bg-green-400 rounded-full pulse" />
                                    <span>"Connected"</span>
                                </span>
                            }.into_view()
                        } else {
                            view! {
                                <span class="flex items-center space-x-1 text-red-400">
                                    <span class="w-2 h-2 bg-red-400 rounded-full" />
                                    <span>"Disconnected"</span>
                                </span>
                            }.into_view()
                        }
                    }}
                </div>

                // Last frame time
                <div class="text-gray-400">
                    {move || {
                        state.last_frame.get()
                            .and_then(chrono::DateTime::from_timestamp_millis)
                            .map(|dt| format!("Last frame: {}", dt.format("%H:%M:%S")))
                            .unwrap_or_else(|| "Waiting for frames".to_string())
                    }}
                </div>
            </div>
        </footer>
    }
}
