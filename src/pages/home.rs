//! Public landing page.

use leptos::prelude::*;

use crate::state::auth::AuthState;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = expect_context::<ReadSignal<AuthState>>();

    view! {
        <div class="home-page">
            <h1>"Welcome"</h1>
            <Show
                when=move || auth.with(AuthState::is_signed_in)
                fallback=|| view! { <p>"Sign in to see your profile."</p> }
            >
                <p>"You are signed in."</p>
            </Show>
        </div>
    }
}
