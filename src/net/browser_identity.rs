//! Browser binding to the identity provider SDK.
//!
//! The SDK is reached through `js/identity.js`, which exchanges JSON strings
//! only. Decoding lives outside the `csr` gate so it is testable natively.

#[cfg(test)]
#[path = "browser_identity_test.rs"]
mod browser_identity_test;

use serde::Deserialize;

use super::types::{Session, TokenError, TokenResult};

#[derive(Deserialize)]
struct ProviderError {
    code: String,
    message: String,
}

/// Decode a session handed over by the bridge; `null`/garbage mean signed out.
pub(crate) fn decode_session(raw: Option<&str>) -> Option<Session> {
    let raw = raw?;
    match serde_json::from_str::<Session>(raw) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("ignoring undecodable session from identity provider: {e}");
            None
        }
    }
}

pub(crate) fn decode_token(raw: &str) -> Result<TokenResult, TokenError> {
    serde_json::from_str(raw).map_err(|e| TokenError::Provider {
        code: "decode".to_owned(),
        message: e.to_string(),
    })
}

pub(crate) fn decode_error(raw: Option<&str>) -> TokenError {
    match raw.and_then(|r| serde_json::from_str::<ProviderError>(r).ok()) {
        Some(err) => TokenError::from_provider_code(&err.code, &err.message),
        None => TokenError::Network(raw.unwrap_or("unknown identity provider failure").to_owned()),
    }
}

#[cfg(feature = "csr")]
pub use browser::BrowserIdentity;

#[cfg(feature = "csr")]
mod browser {
    use futures::StreamExt;
    use futures::channel::mpsc;
    use futures::stream::LocalBoxStream;
    use wasm_bindgen::prelude::*;

    use super::{decode_error, decode_session, decode_token};
    use crate::net::identity::{SessionSource, TokenAuthority};
    use crate::net::types::{Session, TokenError, TokenResult};

    #[wasm_bindgen(module = "/js/identity.js")]
    extern "C" {
        #[wasm_bindgen(js_name = currentUser, catch)]
        fn current_user() -> Result<Option<String>, JsValue>;

        #[wasm_bindgen(js_name = onAuthStateChanged, catch)]
        fn on_auth_state_changed(callback: &Closure<dyn FnMut(Option<String>)>) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(js_name = getIdTokenResult, catch)]
        async fn get_id_token_result(uid: &str, force: bool) -> Result<JsValue, JsValue>;

        #[wasm_bindgen(js_name = signIn, catch)]
        async fn sign_in() -> Result<JsValue, JsValue>;

        #[wasm_bindgen(js_name = signOut, catch)]
        async fn sign_out() -> Result<JsValue, JsValue>;
    }

    /// Identity provider reached through the JS bridge.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct BrowserIdentity;

    impl BrowserIdentity {
        /// Run the host page's sign-in flow; the change stream reports the
        /// resulting session.
        ///
        /// # Errors
        ///
        /// Returns the provider's error if sign-in failed or was cancelled.
        pub async fn sign_in(&self) -> Result<(), TokenError> {
            sign_in().await.map(|_| ()).map_err(|e| decode_error(e.as_string().as_deref()))
        }

        /// Sign out of the identity provider; the change stream reports it.
        ///
        /// # Errors
        ///
        /// Returns the provider's error if sign-out was rejected.
        pub async fn sign_out(&self) -> Result<(), TokenError> {
            sign_out().await.map(|_| ()).map_err(|e| decode_error(e.as_string().as_deref()))
        }
    }

    impl SessionSource for BrowserIdentity {
        fn current_session(&self) -> Option<Session> {
            match current_user() {
                Ok(raw) => decode_session(raw.as_deref()),
                Err(e) => {
                    log::warn!("identity provider unavailable: {}", decode_error(e.as_string().as_deref()));
                    None
                }
            }
        }

        fn changes(&self) -> LocalBoxStream<'static, Option<Session>> {
            let (tx, rx) = mpsc::unbounded();
            let fallback = tx.clone();
            let callback = Closure::<dyn FnMut(Option<String>)>::new(move |raw: Option<String>| {
                let _ = tx.unbounded_send(decode_session(raw.as_deref()));
            });
            if let Err(e) = on_auth_state_changed(&callback) {
                log::error!("could not subscribe to session changes: {}", decode_error(e.as_string().as_deref()));
                // Boot signed out rather than waiting forever for a first event.
                let _ = fallback.unbounded_send(None);
            }
            // The subscription lives for the rest of the page.
            callback.forget();
            rx.boxed_local()
        }
    }

    impl TokenAuthority for BrowserIdentity {
        async fn fetch_token(&self, session: &Session, force: bool) -> Result<TokenResult, TokenError> {
            let raw = get_id_token_result(&session.uid, force)
                .await
                .map_err(|e| decode_error(e.as_string().as_deref()))?;
            let raw = raw
                .as_string()
                .ok_or_else(|| TokenError::Provider { code: "decode".to_owned(), message: "non-string token result".to_owned() })?;
            decode_token(&raw)
        }
    }
}
