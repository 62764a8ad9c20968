//! Railcount Dashboard
//!
//! Browser dashboard for the trackside train counter, built with Leptos (WASM).
//!
//! # Features
//!
//! - Daily trains/cars chart and cars-per-train chart
//! - Live panel for the train passing right now
//! - Event log of every stream frame
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. It is served by the counter itself, fetches the summaries
//! over HTTP and follows `/ws` on the same origin. Decoding, charts and the
//! session state machine come from the `railcount` crate.

use leptos::*;

mod api;
mod app;
mod components;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
