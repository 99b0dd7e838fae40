//! Shared client-side state.
//!
//! DESIGN
//! ======
//! Only authorization state is shared process-wide. It is written by the
//! session listener alone and mirrored into a Leptos signal for the UI.

pub mod auth;
