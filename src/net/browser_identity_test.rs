use super::*;

#[test]
fn decode_session_reads_bridge_json() {
    let session = decode_session(Some(r#"{"uid":"u-1","email":"a@example.test","display_name":null}"#))
        .expect("session");
    assert_eq!(session.uid, "u-1");
    assert_eq!(session.email.as_deref(), Some("a@example.test"));
    assert!(session.display_name.is_none());
}

#[test]
fn decode_session_treats_null_and_garbage_as_signed_out() {
    assert!(decode_session(None).is_none());
    assert!(decode_session(Some("not json")).is_none());
}

#[test]
fn decode_token_reads_claims_and_window() {
    let raw = r#"{"token":"jwt","claims":{"is_admin":true,"sub":"u-1"},"issued_at_ms":1000,"expires_at_ms":3601000}"#;
    let token = decode_token(raw).expect("token");
    assert_eq!(token.token, "jwt");
    assert!(token.claims.is_true("is_admin"));
    assert_eq!(token.expires_at_ms - token.issued_at_ms, 3_600_000);
}

#[test]
fn decode_token_rejects_missing_expiry() {
    let raw = r#"{"token":"jwt","claims":{},"issued_at_ms":1000,"expires_at_ms":null}"#;
    assert!(matches!(decode_token(raw), Err(TokenError::Provider { .. })));
}

#[test]
fn decode_error_maps_provider_codes() {
    let raw = r#"{"code":"auth/network-request-failed","message":"offline"}"#;
    assert_eq!(decode_error(Some(raw)), TokenError::Network("offline".to_owned()));

    let raw = r#"{"code":"auth/user-mismatch","message":"session is no longer current"}"#;
    assert!(matches!(decode_error(Some(raw)), TokenError::Provider { code, .. } if code == "auth/user-mismatch"));
}

#[test]
fn decode_error_without_envelope_is_network() {
    assert_eq!(decode_error(Some("boom")), TokenError::Network("boom".to_owned()));
    assert!(matches!(decode_error(None), TokenError::Network(_)));
}
