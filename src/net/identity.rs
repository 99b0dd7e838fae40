//! Seams to the identity provider.
//!
//! DESIGN
//! ======
//! The identity SDK is a black box exposing three things: the current
//! session, a stream of session changes, and a token fetch with an optional
//! cache bypass. Everything else in the crate is written against these
//! traits so it runs the same against the browser binding and test fakes.
//!
//! All futures are `!Send`: the client runs on a single-threaded event loop.

use std::rc::Rc;

use futures::stream::LocalBoxStream;

use super::types::{Session, TokenError, TokenResult};

/// Supplies the current identity session and notifies on change.
pub trait SessionSource {
    /// The session as the provider currently knows it.
    fn current_session(&self) -> Option<Session>;

    /// Stream of session changes in the order they happened.
    ///
    /// The first item is the session restored from persisted storage (or
    /// `None`), delivered once the provider finishes its startup check.
    fn changes(&self) -> LocalBoxStream<'static, Option<Session>>;
}

/// Issues signed tokens for a session.
#[allow(async_fn_in_trait)]
pub trait TokenAuthority {
    /// Fetch a token for `session`.
    ///
    /// With `force`, any local cache is bypassed and the token reflects the
    /// latest server-side claims.
    async fn fetch_token(&self, session: &Session, force: bool) -> Result<TokenResult, TokenError>;
}

impl<T: SessionSource> SessionSource for Rc<T> {
    fn current_session(&self) -> Option<Session> {
        (**self).current_session()
    }

    fn changes(&self) -> LocalBoxStream<'static, Option<Session>> {
        (**self).changes()
    }
}

impl<T: TokenAuthority> TokenAuthority for Rc<T> {
    async fn fetch_token(&self, session: &Session, force: bool) -> Result<TokenResult, TokenError> {
        (**self).fetch_token(session, force).await
    }
}
