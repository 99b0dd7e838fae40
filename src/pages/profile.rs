//! Signed-in user's own profile.

use leptos::prelude::*;

use crate::components::guarded::redirect_on_unauthenticated;
#[cfg(not(feature = "csr"))]
use crate::net::api::{ApiError, UserProfile};
use crate::state::auth::AuthState;

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = expect_context::<ReadSignal<AuthState>>();
    #[cfg(feature = "csr")]
    let api = expect_context::<StoredValue<crate::net::api::ApiClient, LocalStorage>>();

    let profile = LocalResource::new(move || {
        #[cfg(feature = "csr")]
        let api = api.get_value();
        async move {
            #[cfg(feature = "csr")]
            {
                api.fetch_me().await
            }
            #[cfg(not(feature = "csr"))]
            {
                Err::<UserProfile, ApiError>(ApiError::Transport("profile is only available in the browser".to_owned()))
            }
        }
    });
    redirect_on_unauthenticated(profile);

    let email = move || auth.with(|s| s.session.as_ref().and_then(|u| u.email.clone()).unwrap_or_default());

    view! {
        <div class="profile-page">
            <h1>"Profile"</h1>
            <p class="profile-page__email">{email}</p>
            <Show when=move || auth.with(AuthState::is_elevated)>
                <span class="badge badge--admin">"Administrator"</span>
            </Show>
            <Suspense fallback=move || view! { <p>"Loading profile..."</p> }>
                {move || {
                    profile
                        .get()
                        .map(|result| match result {
                            Ok(p) => {
                                view! {
                                    <dl class="profile-page__details">
                                        <dt>"Birthday"</dt>
                                        <dd>{p.birthday.unwrap_or_else(|| "-".to_owned())}</dd>
                                        <dt>"Gender"</dt>
                                        <dd>{p.gender.unwrap_or_else(|| "-".to_owned())}</dd>
                                    </dl>
                                }
                                    .into_any()
                            }
                            Err(e) => view! { <p class="profile-page__error">{e.to_string()}</p> }.into_any(),
                        })
                }}
            </Suspense>
        </div>
    }
}
