//! # claim-gate
//!
//! Leptos + WASM authentication and authorization gate for a single-page
//! application. Decides, before every navigation, whether the current user may
//! view a route based on their identity-provider session and a server-issued
//! elevation claim.
//!
//! This crate contains the route table and navigation guard, the reactive
//! authorization state, the outbound request authenticator, and the Leptos
//! shell (pages and guarded route components) that wires them together.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod routing;
pub mod state;

/// Browser entry point.
///
/// Installs logging, binds the identity SDK, starts the session listener and
/// mounts the app once the first session event has been applied.
#[cfg(feature = "csr")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Errors only when a logger is already installed, which keeps that one.
    console_log::init_with_level(log::Level::Info).ok();

    wasm_bindgen_futures::spawn_local(app::boot());
}
