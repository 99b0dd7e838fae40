//! Fallback for paths with no route.

use leptos::prelude::*;

use crate::components::guarded::GuardedLink;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found-page">
            <h1>"Page not found."</h1>
            <GuardedLink href="/">"Back to home"</GuardedLink>
        </div>
    }
}
