//! Login page: starts the identity provider's sign-in flow.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::state::auth::AuthState;

/// Login page. Leaves for `/` as soon as a session is present.
#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<ReadSignal<AuthState>>();
    let navigate = use_navigate();
    let error = RwSignal::new(None::<String>);

    Effect::new(move || {
        if auth.with(AuthState::is_signed_in) {
            navigate("/", NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let on_sign_in = move |_| {
        error.set(None);
        #[cfg(feature = "csr")]
        {
            leptos::task::spawn_local(async move {
                if let Err(e) = crate::net::browser_identity::BrowserIdentity.sign_in().await {
                    log::warn!("sign-in failed: {e}");
                    error.set(Some(e.to_string()));
                }
            });
        }
    };

    view! {
        <div class="login-page">
            <h1>"Sign in"</h1>
            <button class="login-button" on:click=on_sign_in>
                "Continue"
            </button>
            {move || error.get().map(|msg| view! { <p class="login-page__error">{msg}</p> })}
        </div>
    }
}
