//! Navigation guard: the single allow/redirect/block decision point.
//!
//! ARCHITECTURE
//! ============
//! The guard re-derives authorization from the session source and a forced
//! token fetch on every navigation. It never reads the reactive
//! [`AuthState`](crate::state::auth::AuthState): that cell is refreshed
//! asynchronously and may lag behind a navigation that races ahead of it.
//!
//! POLICY
//! ======
//! Sign-in is checked before elevation; an elevated route implies sign-in. A
//! missing session redirects to login without a fetch. A failed fetch sends
//! sign-in routes to login, but blocks elevated routes in place: failure does
//! not prove the user lacks the claim, and redirecting to the forbidden page
//! on a transient error would bounce the user between pages.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use super::table::{RouteDescriptor, RouteTable};
use crate::net::identity::{SessionSource, TokenAuthority};
use crate::net::types::{Session, TokenError, TokenResult};

/// Re-evaluations allowed when the session changes under an in-flight fetch.
pub const MAX_ATTEMPTS: usize = 3;

/// Outcome of a single navigation attempt. Never cached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed,
    Redirect(String),
    /// Deny and stay on the current route.
    Block,
}

/// Object-safe view of a guard, for callers that must not be generic.
pub trait Gate {
    fn check<'a>(&'a self, to: &'a RouteDescriptor) -> LocalBoxFuture<'a, NavigationDecision>;
}

pub struct NavigationGuard<S, T> {
    source: S,
    authority: T,
    login_path: String,
    forbidden_path: String,
    elevation_claim: String,
}

impl<S: SessionSource, T: TokenAuthority> NavigationGuard<S, T> {
    pub fn new(source: S, authority: T, table: &RouteTable, elevation_claim: impl Into<String>) -> Self {
        Self {
            source,
            authority,
            login_path: table.login().path.clone(),
            forbidden_path: table.forbidden().path.clone(),
            elevation_claim: elevation_claim.into(),
        }
    }

    /// Decide whether navigation to `to` may proceed.
    pub async fn decide(&self, to: &RouteDescriptor) -> NavigationDecision {
        let requirements = to.requirements;
        if requirements.is_public() {
            return NavigationDecision::Proceed;
        }

        for attempt in 1..=MAX_ATTEMPTS {
            let Some(session) = self.source.current_session() else {
                log::debug!("{}: no session, redirecting to {}", to.path, self.login_path);
                return NavigationDecision::Redirect(self.login_path.clone());
            };

            let fetched = self.authority.fetch_token(&session, true).await;

            if !self.is_current(&session) {
                log::debug!("{}: session changed during claim fetch (attempt {attempt}), re-evaluating", to.path);
                continue;
            }
            return self.judge(to, &session, fetched);
        }

        log::warn!("{}: session kept changing during claim fetch, blocking", to.path);
        NavigationDecision::Block
    }

    fn is_current(&self, session: &Session) -> bool {
        self.source.current_session().is_some_and(|s| s.same_user(session))
    }

    fn judge(
        &self,
        to: &RouteDescriptor,
        session: &Session,
        fetched: Result<TokenResult, TokenError>,
    ) -> NavigationDecision {
        let elevated_route = to.requirements.requires_elevated_privilege();
        let token = match fetched {
            Ok(token) => token,
            Err(e) if elevated_route => {
                log::warn!("{}: claim fetch failed for {}, blocking: {e}", to.path, session.uid);
                return NavigationDecision::Block;
            }
            Err(e) => {
                log::warn!("{}: claim fetch failed for {}, redirecting to login: {e}", to.path, session.uid);
                return NavigationDecision::Redirect(self.login_path.clone());
            }
        };

        if elevated_route && !token.claims.is_true(&self.elevation_claim) {
            log::info!(
                "{}: {} lacks {}, redirecting to {}",
                to.path,
                session.uid,
                self.elevation_claim,
                self.forbidden_path
            );
            return NavigationDecision::Redirect(self.forbidden_path.clone());
        }
        NavigationDecision::Proceed
    }
}

impl<S: SessionSource, T: TokenAuthority> Gate for NavigationGuard<S, T> {
    fn check<'a>(&'a self, to: &'a RouteDescriptor) -> LocalBoxFuture<'a, NavigationDecision> {
        self.decide(to).boxed_local()
    }
}
