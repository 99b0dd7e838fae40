//! Shown when a signed-in user lacks the privilege a route requires.

use leptos::prelude::*;

use crate::components::guarded::GuardedLink;

#[component]
pub fn ForbiddenPage() -> impl IntoView {
    view! {
        <div class="forbidden-page">
            <h1>"Access denied"</h1>
            <p>"Your account does not have permission to view that page."</p>
            <GuardedLink href="/">"Back to home"</GuardedLink>
        </div>
    }
}
