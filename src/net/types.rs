//! Identity and token types shared by the guard, state, and API layers.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

/// Identity-provider session for a signed-in user.
///
/// Owned by the session source; the application only clones and reads it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Stable unique user identifier.
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl Session {
    #[must_use]
    pub fn same_user(&self, other: &Session) -> bool {
        self.uid == other.uid
    }
}

/// Decoded claim set carried by a signed token.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(pub serde_json::Map<String, serde_json::Value>);

impl ClaimSet {
    /// Whether `claim` is present with the JSON value `true`.
    ///
    /// Missing or non-boolean values count as `false`.
    #[must_use]
    pub fn is_true(&self, claim: &str) -> bool {
        matches!(self.0.get(claim), Some(serde_json::Value::Bool(true)))
    }
}

/// A bearer token plus the claims decoded from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenResult {
    pub token: String,
    pub claims: ClaimSet,
    /// Milliseconds since the Unix epoch.
    pub issued_at_ms: u64,
    /// Milliseconds since the Unix epoch.
    pub expires_at_ms: u64,
}

impl TokenResult {
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Failure to obtain a token from the token authority.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("network error: {0}")]
    Network(String),

    #[error("session has been revoked")]
    Revoked,

    #[error("user account is disabled")]
    UserDisabled,

    #[error("refresh credential has expired")]
    Expired,

    #[error("identity provider error {code}: {message}")]
    Provider { code: String, message: String },
}

impl TokenError {
    /// Map an identity-provider error code onto the error taxonomy.
    #[must_use]
    pub fn from_provider_code(code: &str, message: &str) -> Self {
        match code {
            "auth/network-request-failed" => Self::Network(message.to_owned()),
            "auth/user-token-expired" | "auth/id-token-revoked" => Self::Revoked,
            "auth/user-disabled" => Self::UserDisabled,
            "auth/id-token-expired" => Self::Expired,
            _ => Self::Provider { code: code.to_owned(), message: message.to_owned() },
        }
    }
}
