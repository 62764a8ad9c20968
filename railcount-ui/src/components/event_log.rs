//! Event Log Component

use leptos::*;

use crate::state::global::GlobalState;

/// Every stream frame, pretty-printed, newest first
#[component]
pub fn EventLog() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");
    let text = create_memo(move |_| state.live.with(|live| live.log().render()));

    view! {
        <section class="bg-gray-800 rounded-xl p-6">
            <div class="flex items-center justify-between mb-4">
                <h2 class="text-xl font-semibold">"Event log"</h2>
                <span class="text-xs text-gray-500">
                    {move || state.live.with(|live| {
                        let log = live.log();
                        if log.evicted() > 0 {
                            format!("{} shown, {} older dropped", log.len(), log.evicted())
                        } else {
                            format!("{} entries", log.len())
                        }
                    })}
                </span>
            </div>
            <pre id="log" class="text-xs text-gray-300 max-h-96 overflow-y-auto whitespace-pre-wrap">
                {move || text.get()}
            </pre>
        </section>
    }
}
