//! Resume Portal frontend
//!
//! Client-side rendered (CSR) Leptos application compiled to WebAssembly.
//! It renders the application root from the `resume-portal` crate: the
//! shared query client, tooltip and toast contexts, global animations and
//! the routed page.
//!
//! Startup failures (invalid configuration, bad route table, query client
//! construction) are logged and nothing is mounted.

use leptos::*;
use resume_portal::AppRoot;
use std::rc::Rc;

use app::App;

mod api;
mod app;
mod components;
mod hooks;
mod pages;
mod state;

fn main() {
    // Set up panic hook for better error messages in WASM
    console_error_panic_hook::set_once();

    let config = state::load_config();
    let root = match AppRoot::new(config) {
        Ok(root) => Rc::new(root),
        Err(e) => {
            web_sys::console::error_1(&format!("Startup failed: {}", e).into());
            return;
        }
    };

    mount_to_body(move || view! { <App root=root /> });
}
