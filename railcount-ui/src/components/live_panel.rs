//! Live Panel Component
//!
//! The train passing right now: id, direction, speed, totals and engines.

use leptos::*;

use crate::state::global::GlobalState;

/// Live session fields, each bound to its DOM id
#[component]
pub fn LivePanel() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let view_signal = create_memo(move |_| state.live.with(|live| live.view().clone()));

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <h2 class="text-xl font-semibold mb-4">"Live"</h2>
            <dl class="grid grid-cols-2 md:grid-cols-3 gap-4">
                <Field label="Active train" id="activeTrain" value=Signal::derive(move || view_signal.get().active_train) />
                <Field label="Direction" id="direction" value=Signal::derive(move || view_signal.get().direction) />
                <Field label="Speed (mph)" id="speed" value=Signal::derive(move || view_signal.get().speed) />
                <Field label="Locomotives" id="loc" value=Signal::derive(move || view_signal.get().locomotives.to_string()) />
                <Field label="Railcars" id="cars" value=Signal::derive(move || view_signal.get().railcars.to_string()) />
                <Field label="Engines" id="engines" value=Signal::derive(move || view_signal.get().engines) />
            </dl>
            <p class="text-xs text-gray-500 mt-4">
                {move || {
                    let view = view_signal.get();
                    format!("{} frames, {} dropped", view.frames_received, view.dropped_frames)
                }}
            </p>
        </section>
    }
}

#[component]
fn Field(label: &'static str, id: &'static str, value: Signal<String>) -> impl IntoView {
    view! {
        <div>
            <dt class="text-sm text-gray-400">{label}</dt>
            <dd id=id class="text-2xl font-bold">{move || value.get()}</dd>
        </div>
    }
}
