//! Top bar with navigation links and the signed-in user.
//!
//! Link visibility follows the reactive authorization state; whether a
//! navigation is allowed is still decided by the guard.

use leptos::prelude::*;

use crate::app::NavigatorHandle;
use crate::components::guarded::GuardedLink;
use crate::state::auth::AuthState;

#[component]
pub fn Header() -> impl IntoView {
    let auth = expect_context::<ReadSignal<AuthState>>();
    let navigator = expect_context::<NavigatorHandle>();
    let login_path = navigator.with_value(|n| n.table().login().path.clone());

    let user_label = move || {
        auth.with(|s| {
            s.session
                .as_ref()
                .map(|session| session.display_name.clone().or_else(|| session.email.clone()).unwrap_or_else(|| session.uid.clone()))
        })
    };

    view! {
        <header class="app-header">
            <GuardedLink href="/" class="app-header__brand">
                "Claim Gate"
            </GuardedLink>
            <nav class="app-header__nav">
                <Show when=move || auth.with(AuthState::is_signed_in)>
                    <GuardedLink href="/profile">"Profile"</GuardedLink>
                </Show>
                <Show when=move || auth.with(AuthState::is_elevated)>
                    <GuardedLink href="/admin-users">"Users"</GuardedLink>
                </Show>
            </nav>
            <span class="app-header__spacer"></span>
            {move || match user_label() {
                Some(name) => {
                    view! {
                        <span class="app-header__user">{name}</span>
                        <SignOutButton/>
                    }
                        .into_any()
                }
                None => view! { <GuardedLink href=login_path.clone()>"Sign in"</GuardedLink> }.into_any(),
            }}
        </header>
    }
}

/// Revokes refresh tokens and signs out of the identity provider.
#[component]
fn SignOutButton() -> impl IntoView {
    #[cfg(feature = "csr")]
    let api = expect_context::<StoredValue<crate::net::api::ApiClient, LocalStorage>>();

    let on_click = move |_| {
        #[cfg(feature = "csr")]
        {
            let api = api.get_value();
            leptos::task::spawn_local(async move {
                crate::app::sign_out(&api).await;
            });
        }
    };

    view! {
        <button class="btn btn--ghost" on:click=on_click>
            "Sign out"
        </button>
    }
}
