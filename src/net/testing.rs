//! In-memory identity provider used by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use futures::StreamExt;
use futures::channel::{mpsc, oneshot};
use futures::stream::LocalBoxStream;

use super::identity::{SessionSource, TokenAuthority};
use super::types::{ClaimSet, Session, TokenError, TokenResult};

pub(crate) const TOKEN_TTL_MS: u64 = 3_600_000;

pub(crate) fn session(uid: &str) -> Session {
    Session { uid: uid.to_owned(), email: Some(format!("{uid}@example.test")), display_name: None }
}

pub(crate) fn claims(value: serde_json::Value) -> ClaimSet {
    serde_json::from_value(value).expect("claims must be an object")
}

pub(crate) fn token(value: &str, claims: ClaimSet, issued_at_ms: u64) -> TokenResult {
    TokenResult { token: value.to_owned(), claims, issued_at_ms, expires_at_ms: issued_at_ms + TOKEN_TTL_MS }
}

type FetchHook = Box<dyn FnOnce()>;

/// Scriptable session source and token authority.
#[derive(Default)]
pub(crate) struct FakeIdentity {
    session: RefCell<Option<Session>>,
    claims: RefCell<HashMap<String, Result<serde_json::Value, TokenError>>>,
    listeners: RefCell<Vec<mpsc::UnboundedSender<Option<Session>>>>,
    during_fetch: RefCell<Vec<FetchHook>>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
    pub forced_fetches: Cell<usize>,
    pub cached_fetches: Cell<usize>,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the current session and notify every subscriber.
    pub fn set_session(&self, session: Option<Session>) {
        self.session.replace(session.clone());
        self.listeners
            .borrow_mut()
            .retain(|tx| tx.unbounded_send(session.clone()).is_ok());
    }

    /// Change the current session without notifying subscribers.
    pub fn set_session_silently(&self, session: Option<Session>) {
        self.session.replace(session);
    }

    /// End every change stream handed out so far.
    pub fn close_changes(&self) {
        self.listeners.borrow_mut().clear();
    }

    pub fn set_claims(&self, uid: &str, claims: serde_json::Value) {
        self.claims.borrow_mut().insert(uid.to_owned(), Ok(claims));
    }

    pub fn fail_fetch(&self, uid: &str, err: TokenError) {
        self.claims.borrow_mut().insert(uid.to_owned(), Err(err));
    }

    /// Run `hook` once, at the start of the next fetch.
    pub fn on_next_fetch(&self, hook: impl FnOnce() + 'static) {
        self.during_fetch.borrow_mut().push(Box::new(hook));
    }

    /// Hold the next fetch until the returned sender fires.
    pub fn pause_next_fetch(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gate.replace(Some(rx));
        tx
    }

    pub fn total_fetches(&self) -> usize {
        self.forced_fetches.get() + self.cached_fetches.get()
    }
}

impl SessionSource for FakeIdentity {
    fn current_session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    fn changes(&self) -> LocalBoxStream<'static, Option<Session>> {
        let (tx, rx) = mpsc::unbounded();
        let _ = tx.unbounded_send(self.current_session());
        self.listeners.borrow_mut().push(tx);
        rx.boxed_local()
    }
}

impl TokenAuthority for FakeIdentity {
    async fn fetch_token(&self, session: &Session, force: bool) -> Result<TokenResult, TokenError> {
        let counter = if force { &self.forced_fetches } else { &self.cached_fetches };
        counter.set(counter.get() + 1);

        let hook = {
            let mut hooks = self.during_fetch.borrow_mut();
            if hooks.is_empty() { None } else { Some(hooks.remove(0)) }
        };
        if let Some(hook) = hook {
            hook();
        }

        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let outcome = self
            .claims
            .borrow()
            .get(&session.uid)
            .cloned()
            .unwrap_or_else(|| Ok(serde_json::json!({})));
        let value = outcome?;
        let n = self.total_fetches();
        Ok(token(&format!("token-{}-{n}", session.uid), claims(value), 0))
    }
}
