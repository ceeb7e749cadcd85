//! Labscope Front-end
//!
//! Image annotation chat and dataset browser built with Leptos (WASM).
//!
//! # Features
//!
//! - Pannable, zoomable tissue image with rectangle/polygon/circle/marker tools
//! - Chat about drawn regions with the lab's vision model
//! - Filterable dataset table fed by the published dataset sheet
//!
//! # Architecture
//!
//! This is a client-side rendered (CSR) Leptos application that compiles to
//! WebAssembly. All geometry, filtering and chat logic lives in the
//! `labscope` crate; this crate owns the DOM, timers and browser fetches.

use leptos::*;

mod api;
mod app;
mod components;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    // Mount the app to the document body
    mount_to_body(|| view! { <app::App /> });
}
