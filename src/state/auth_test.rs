use super::*;
use crate::config::GateConfig;
use crate::net::testing::{FakeIdentity, session};
use crate::net::types::TokenError;
use crate::routing::guard::{NavigationDecision, NavigationGuard};
use crate::routing::table::RouteTable;
use std::rc::Rc;

type TestListener = SessionListener<Rc<FakeIdentity>, Rc<FakeIdentity>>;

fn setup() -> (Rc<FakeIdentity>, TestListener) {
    let identity = Rc::new(FakeIdentity::new());
    let (writer, _reader) = auth_channel();
    let listener = SessionListener::new(Rc::clone(&identity), Rc::clone(&identity), writer, "is_admin");
    (identity, listener)
}

// =============================================================
// AuthState defaults
// =============================================================

#[test]
fn auth_state_default_signed_out() {
    let state = AuthState::default();
    assert!(state.session.is_none());
    assert!(!state.is_signed_in());
    assert!(!state.is_elevated());
}

#[test]
fn auth_channel_starts_signed_out() {
    let (_writer, reader) = auth_channel();
    assert_eq!(reader.snapshot(), AuthState::default());
}

// =============================================================
// apply
// =============================================================

#[tokio::test]
async fn sign_in_with_admin_claim_sets_elevated() {
    let (identity, listener) = setup();
    let reader = listener.reader();
    identity.set_session(Some(session("alice")));
    identity.set_claims("alice", serde_json::json!({"is_admin": true}));

    listener.apply(Some(session("alice"))).await;

    assert!(reader.is_signed_in());
    assert!(reader.is_elevated());
    assert_eq!(reader.session().map(|s| s.uid), Some("alice".to_owned()));
    assert_eq!(identity.forced_fetches.get(), 1);
    assert_eq!(identity.cached_fetches.get(), 0);
}

#[tokio::test]
async fn sign_in_without_claim_is_not_elevated() {
    let (identity, listener) = setup();
    let reader = listener.reader();
    identity.set_session(Some(session("alice")));
    identity.set_claims("alice", serde_json::json!({"is_admin": false}));

    listener.apply(Some(session("alice"))).await;

    assert!(reader.is_signed_in());
    assert!(!reader.is_elevated());
}

#[tokio::test]
async fn fetch_failure_is_swallowed_and_clears_elevation() {
    let (identity, listener) = setup();
    let reader = listener.reader();
    identity.set_session(Some(session("alice")));
    identity.set_claims("alice", serde_json::json!({"is_admin": true}));
    listener.apply(Some(session("alice"))).await;
    assert!(reader.is_elevated());

    identity.fail_fetch("alice", TokenError::Revoked);
    listener.apply(Some(session("alice"))).await;

    assert!(reader.is_signed_in());
    assert!(!reader.is_elevated());
}

#[tokio::test]
async fn sign_out_clears_elevation_without_fetch() {
    let (identity, listener) = setup();
    let reader = listener.reader();
    identity.set_session(Some(session("alice")));
    identity.set_claims("alice", serde_json::json!({"is_admin": true}));
    listener.apply(Some(session("alice"))).await;

    identity.set_session(None);
    listener.apply(None).await;

    assert_eq!(reader.snapshot(), AuthState::default());
    assert_eq!(identity.forced_fetches.get(), 1);
}

#[tokio::test]
async fn new_user_is_not_elevated_while_claims_load() {
    let (identity, listener) = setup();
    let reader = listener.reader();
    identity.set_session(Some(session("alice")));
    identity.set_claims("alice", serde_json::json!({"is_admin": true}));
    listener.apply(Some(session("alice"))).await;

    identity.set_session(Some(session("bob")));
    identity.set_claims("bob", serde_json::json!({"is_admin": true}));
    let release = identity.pause_next_fetch();

    let check = reader.clone();
    tokio::join!(listener.apply(Some(session("bob"))), async move {
        let state = check.snapshot();
        assert_eq!(state.session.map(|s| s.uid), Some("bob".to_owned()));
        assert!(!state.elevated);
        let _ = release.send(());
    });

    assert!(reader.is_elevated());
}

#[tokio::test]
async fn same_user_keeps_elevation_while_claims_refresh() {
    let (identity, listener) = setup();
    let reader = listener.reader();
    identity.set_session(Some(session("alice")));
    identity.set_claims("alice", serde_json::json!({"is_admin": true}));
    listener.apply(Some(session("alice"))).await;

    let release = identity.pause_next_fetch();
    let check = reader.clone();
    tokio::join!(listener.apply(Some(session("alice"))), async move {
        assert!(check.is_elevated());
        let _ = release.send(());
    });

    assert!(reader.is_elevated());
}

#[tokio::test]
async fn late_claim_result_for_replaced_session_is_discarded() {
    let (identity, listener) = setup();
    let reader = listener.reader();
    identity.set_session(Some(session("alice")));
    identity.set_claims("alice", serde_json::json!({"is_admin": true}));

    let id = Rc::clone(&identity);
    identity.on_next_fetch(move || id.set_session_silently(None));
    listener.apply(Some(session("alice"))).await;

    assert!(!reader.is_elevated());
}

#[tokio::test]
async fn reader_observes_changes_until_writer_is_dropped() {
    let (identity, listener) = setup();
    let mut reader = listener.reader();
    identity.set_session(Some(session("alice")));

    listener.apply(Some(session("alice"))).await;
    assert!(reader.changed().await);

    drop(listener);
    assert!(!reader.changed().await);
}

// =============================================================
// run + readiness
// =============================================================

#[tokio::test]
async fn run_applies_events_in_order_and_signals_readiness() {
    let (identity, listener) = setup();
    let reader = listener.reader();
    identity.set_claims("alice", serde_json::json!({"is_admin": false}));
    identity.set_claims("bob", serde_json::json!({"is_admin": true}));
    let (signal, ready) = readiness();
    assert!(!ready.is_ready());

    let driver = {
        let identity = Rc::clone(&identity);
        let reader = reader.clone();
        let ready = ready.clone();
        async move {
            ready.wait().await;
            assert!(!reader.is_signed_in());
            identity.set_session(Some(session("alice")));
            identity.set_session(Some(session("bob")));
            identity.close_changes();
        }
    };
    tokio::join!(listener.run(signal), driver);

    assert!(ready.is_ready());
    let state = reader.snapshot();
    assert_eq!(state.session.map(|s| s.uid), Some("bob".to_owned()));
    assert!(state.elevated);
    assert_eq!(identity.forced_fetches.get(), 2);
}

#[tokio::test]
async fn restored_session_is_applied_before_readiness() {
    let (identity, listener) = setup();
    let reader = listener.reader();
    identity.set_session(Some(session("alice")));
    identity.set_claims("alice", serde_json::json!({"is_admin": true}));
    let (signal, ready) = readiness();

    let driver = {
        let identity = Rc::clone(&identity);
        let reader = reader.clone();
        let ready = ready.clone();
        async move {
            ready.wait().await;
            assert!(reader.is_elevated());
            identity.close_changes();
        }
    };
    tokio::join!(listener.run(signal), driver);
}

#[tokio::test]
async fn readiness_resolves_when_signal_is_dropped() {
    let (signal, ready) = readiness();
    drop(signal);
    ready.wait().await;
    assert!(ready.is_ready());
}

// =============================================================
// Guard independence
// =============================================================

#[tokio::test]
async fn guard_does_not_trust_stale_elevated_state() {
    let (identity, listener) = setup();
    let reader = listener.reader();
    let table = RouteTable::standard(&GateConfig::default()).unwrap();
    let guard = NavigationGuard::new(Rc::clone(&identity), Rc::clone(&identity), &table, "is_admin");

    identity.set_session(Some(session("alice")));
    identity.set_claims("alice", serde_json::json!({"is_admin": true}));
    listener.apply(Some(session("alice"))).await;
    assert!(reader.is_elevated());

    // Claim revoked server-side; no session event has refreshed the cell yet.
    identity.set_claims("alice", serde_json::json!({"is_admin": false}));
    let admin = table.lookup("/admin-users").unwrap();

    assert!(reader.is_elevated());
    assert_eq!(guard.decide(admin).await, NavigationDecision::Redirect("/forbidden".to_owned()));
}
