//! Root application component, context providers, and browser boot sequence.

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::components::Router;

use crate::components::guarded::RouteOutlet;
use crate::components::header::Header;
use crate::routing::navigator::Navigator;
use crate::state::auth::{AuthReader, AuthState};

/// Navigator handle shared through context.
pub type NavigatorHandle = StoredValue<Navigator, LocalStorage>;

/// Root application component.
///
/// Mirrors the authorization state into a read-only signal and provides it,
/// together with the navigator, to every child component.
#[component]
pub fn App(navigator: Navigator, auth: AuthReader) -> impl IntoView {
    provide_meta_context();

    let (state, set_state) = signal(auth.snapshot());
    let mut updates = auth;
    leptos::task::spawn_local(async move {
        while updates.changed().await {
            set_state.set(updates.snapshot());
        }
    });

    provide_context::<ReadSignal<AuthState>>(state);
    provide_context::<NavigatorHandle>(StoredValue::new_local(navigator));

    view! {
        <Title text="Claim Gate"/>

        <Router>
            <Header/>
            <main class="app__main">
                <RouteOutlet/>
            </main>
        </Router>
    }
}

#[cfg(feature = "csr")]
pub use browser::{boot, sign_out};

#[cfg(feature = "csr")]
mod browser {
    use std::rc::Rc;

    use leptos::prelude::*;

    use super::App;
    use crate::config::GateConfig;
    use crate::net::api::ApiClient;
    use crate::net::browser_identity::BrowserIdentity;
    use crate::routing::guard::NavigationGuard;
    use crate::routing::navigator::Navigator;
    use crate::routing::table::RouteTable;
    use crate::state::auth::{SessionListener, auth_channel, readiness};

    /// Wire the identity binding, guard, and listener, then mount the app
    /// once the restored session (or its absence) has been applied.
    pub async fn boot() {
        let config = match GateConfig::from_build_env() {
            Ok(config) => config,
            Err(e) => {
                log::error!("invalid gate configuration: {e}");
                return;
            }
        };
        let table = match RouteTable::standard(&config) {
            Ok(table) => Rc::new(table),
            Err(e) => {
                log::error!("invalid route table: {e}");
                return;
            }
        };

        let identity = Rc::new(BrowserIdentity);
        let guard = NavigationGuard::new(Rc::clone(&identity), Rc::clone(&identity), &table, config.elevation_claim.as_str());
        let initial_path = web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_owned());
        let navigator = Navigator::new(Rc::new(guard), table, &initial_path);

        let (writer, reader) = auth_channel();
        let listener = SessionListener::new(Rc::clone(&identity), Rc::clone(&identity), writer, config.elevation_claim.as_str());
        let (signal, ready) = readiness();
        wasm_bindgen_futures::spawn_local(listener.run(signal));

        ready.wait().await;
        log::info!("session restored, mounting");

        let api = ApiClient::new(config, identity);
        leptos::mount::mount_to_body(move || {
            provide_context(StoredValue::new_local(api));
            view! { <App navigator=navigator auth=reader/> }
        });
    }

    /// Revoke refresh tokens server-side, then sign out of the provider.
    ///
    /// Revocation is best effort; the provider sign-out always runs. The
    /// resulting session event clears the authorization state.
    pub async fn sign_out(api: &ApiClient) {
        if let Err(e) = api.revoke_refresh_token().await {
            log::warn!("refresh token revocation failed: {e}");
        }
        if let Err(e) = BrowserIdentity.sign_out().await {
            log::error!("sign-out failed: {e}");
        }
    }
}
