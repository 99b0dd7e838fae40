//! Reactive authorization state.
//!
//! ARCHITECTURE
//! ============
//! One cell, one writer. [`AuthWriter`] owns the sending half of a `watch`
//! channel and is held only by the [`SessionListener`], which applies session
//! change events one at a time in delivery order. Everyone else holds an
//! [`AuthReader`] and sees pure projections of the latest [`AuthState`].
//!
//! The state is a best-effort cache for the UI. Access decisions go through
//! the navigation guard, which re-verifies against the identity provider.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use futures::FutureExt;
use futures::StreamExt;
use futures::channel::oneshot;
use futures::future::Shared;
use tokio::sync::watch;

use crate::net::identity::{SessionSource, TokenAuthority};
use crate::net::types::Session;

/// Current session and whether it holds the elevation claim.
///
/// `elevated` is true only if the last successful forced fetch for this
/// session carried the claim.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub session: Option<Session>,
    pub elevated: bool,
}

impl AuthState {
    pub fn is_signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_elevated(&self) -> bool {
        self.elevated
    }
}

/// Sole writer of the authorization state. Deliberately not `Clone`.
pub struct AuthWriter {
    tx: watch::Sender<AuthState>,
}

/// Read-only handle to the authorization state.
#[derive(Clone, Debug)]
pub struct AuthReader {
    rx: watch::Receiver<AuthState>,
}

/// Create the authorization cell, starting signed out.
pub fn auth_channel() -> (AuthWriter, AuthReader) {
    let (tx, rx) = watch::channel(AuthState::default());
    (AuthWriter { tx }, AuthReader { rx })
}

impl AuthWriter {
    fn publish(&self, state: AuthState) {
        self.tx.send_replace(state);
    }

    fn snapshot(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    pub fn reader(&self) -> AuthReader {
        AuthReader { rx: self.tx.subscribe() }
    }
}

impl AuthReader {
    pub fn snapshot(&self) -> AuthState {
        self.rx.borrow().clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.rx.borrow().session.clone()
    }

    pub fn is_signed_in(&self) -> bool {
        self.rx.borrow().is_signed_in()
    }

    pub fn is_elevated(&self) -> bool {
        self.rx.borrow().is_elevated()
    }

    /// Wait for the next published state. Returns `false` once the writer is
    /// gone and no further updates can arrive.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }
}

/// Fires once the first session event has been fully applied.
pub struct ReadySignal {
    tx: Option<oneshot::Sender<()>>,
}

/// One-shot barrier the app awaits before its first render.
#[derive(Clone)]
pub struct Readiness {
    rx: Shared<oneshot::Receiver<()>>,
}

pub fn readiness() -> (ReadySignal, Readiness) {
    let (tx, rx) = oneshot::channel();
    (ReadySignal { tx: Some(tx) }, Readiness { rx: rx.shared() })
}

impl ReadySignal {
    pub fn fire(&mut self) {
        if let Some(tx) = self.tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        self.rx.clone().now_or_never().is_some()
    }

    /// Resolve after the first session event, or when the listener is gone
    /// without ever delivering one.
    pub async fn wait(&self) {
        let _ = self.rx.clone().await;
    }
}

/// Applies session-change events to the authorization state.
pub struct SessionListener<S, T> {
    source: S,
    authority: T,
    writer: AuthWriter,
    elevation_claim: String,
}

impl<S: SessionSource, T: TokenAuthority> SessionListener<S, T> {
    pub fn new(source: S, authority: T, writer: AuthWriter, elevation_claim: impl Into<String>) -> Self {
        Self { source, authority, writer, elevation_claim: elevation_claim.into() }
    }

    pub fn reader(&self) -> AuthReader {
        self.writer.reader()
    }

    /// Apply one session event.
    ///
    /// Signed out clears elevation immediately. Signed in stores the session
    /// and refreshes elevation with a forced claim fetch; a failed fetch is
    /// logged and leaves elevation off. A result that arrives after the
    /// provider has moved to another session is discarded.
    pub async fn apply(&self, session: Option<Session>) {
        let Some(session) = session else {
            self.writer.publish(AuthState::default());
            return;
        };

        let previous = self.writer.snapshot();
        let carried = previous.elevated && previous.session.as_ref().is_some_and(|s| s.same_user(&session));
        self.writer.publish(AuthState { session: Some(session.clone()), elevated: carried });

        let elevated = match self.authority.fetch_token(&session, true).await {
            Ok(token) => token.claims.is_true(&self.elevation_claim),
            Err(e) => {
                log::warn!("could not refresh claims for {}: {e}", session.uid);
                false
            }
        };

        let current = self.source.current_session().is_some_and(|s| s.same_user(&session));
        if !current {
            log::debug!("discarding claim result for {}: session changed during fetch", session.uid);
            self.writer.publish(AuthState { session: Some(session), elevated: false });
            return;
        }
        self.writer.publish(AuthState { session: Some(session), elevated });
    }

    /// Consume the source's change stream until it ends, firing `ready` after
    /// the first event has been applied.
    pub async fn run(self, mut ready: ReadySignal) {
        let mut changes = self.source.changes();
        while let Some(session) = changes.next().await {
            self.apply(session).await;
            ready.fire();
        }
        ready.fire();
    }
}
