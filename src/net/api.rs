//! REST API helpers for communicating with the backend.
//!
//! Every outgoing call passes through [`RequestAuthenticator`], which attaches
//! `Authorization: Bearer <token>` when a session is present. Client-side
//! (csr): real HTTP calls via `gloo-net`. Native builds only carry the
//! authenticator and error types.
//!
//! ERROR HANDLING
//! ==============
//! A token fetch failure never fails the request: it goes out without a
//! credential and the backend rejects it. Backend rejections arrive as the
//! `{"error": {"code", "message"}}` envelope and surface as [`ApiError`].

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use serde::{Deserialize, Serialize};

use super::identity::{SessionSource, TokenAuthority};

pub const AUTHORIZATION: &str = "Authorization";

/// Outgoing request that can carry a header.
pub trait AuthorizeRequest: Sized {
    /// Set `name` to `value`, replacing any previous value.
    #[must_use]
    fn with_header(self, name: &str, value: &str) -> Self;
}

/// Attaches the current session's bearer token to outgoing requests.
pub struct RequestAuthenticator<S, T> {
    source: S,
    authority: T,
}

impl<S: SessionSource, T: TokenAuthority> RequestAuthenticator<S, T> {
    pub fn new(source: S, authority: T) -> Self {
        Self { source, authority }
    }

    /// `Authorization` header value for the current session, if any.
    pub async fn bearer(&self) -> Option<String> {
        let session = self.source.current_session()?;
        match self.authority.fetch_token(&session, false).await {
            Ok(token) => Some(token.bearer_header()),
            Err(e) => {
                log::warn!("could not get token for {}; sending request without credentials: {e}", session.uid);
                None
            }
        }
    }

    /// Attach credentials to `request`; unchanged when signed out or when the
    /// token fetch fails.
    pub async fn authorize<R: AuthorizeRequest>(&self, request: R) -> R {
        match self.bearer().await {
            Some(value) => request.with_header(AUTHORIZATION, &value),
            None => request,
        }
    }
}

/// Backend error envelope body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The backend answered with its error envelope.
    #[error("{status} {}: {}", .body.code, .body.message)]
    Rejected { status: u16, body: ErrorBody },

    /// Non-success status without a parsable envelope.
    #[error("unexpected status {0}")]
    Status(u16),

    /// A success response whose body did not decode.
    #[error("response parse failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// Classify a non-success response from its status and raw body.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => Self::Rejected { status, body: envelope.error },
            Err(_) => Self::Status(status),
        }
    }

    /// Whether the backend refused the caller's credentials.
    #[must_use]
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::Rejected { status: 401, .. } | Self::Status(401))
    }
}

/// A user row from `/api/v1/admin/users`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub disabled: bool,
}

/// The caller's profile from `/api/v1/users/me`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub uid: String,
    pub birthday: Option<String>,
    pub gender: Option<String>,
}

#[cfg(feature = "csr")]
pub use client::ApiClient;

#[cfg(feature = "csr")]
mod client {
    use std::rc::Rc;

    use gloo_net::http::{Request, RequestBuilder, Response};
    use serde::de::DeserializeOwned;

    use super::{AdminUser, ApiError, AuthorizeRequest, RequestAuthenticator, UserProfile};
    use crate::config::GateConfig;
    use crate::net::browser_identity::BrowserIdentity;

    impl AuthorizeRequest for RequestBuilder {
        fn with_header(self, name: &str, value: &str) -> Self {
            self.header(name, value)
        }
    }

    /// Authenticated HTTP client bound to the configured API base URL.
    #[derive(Clone)]
    pub struct ApiClient {
        config: Rc<GateConfig>,
        auth: Rc<RequestAuthenticator<Rc<BrowserIdentity>, Rc<BrowserIdentity>>>,
    }

    impl ApiClient {
        /// Tokens come straight from the identity SDK, which keeps its own
        /// cache in step with the forced fetches made by the guard.
        pub fn new(config: GateConfig, identity: Rc<BrowserIdentity>) -> Self {
            Self {
                config: Rc::new(config),
                auth: Rc::new(RequestAuthenticator::new(Rc::clone(&identity), identity)),
            }
        }

        async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
            let request = self.auth.authorize(builder).await;
            let resp = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
            if resp.ok() {
                return Ok(resp);
            }
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            Err(ApiError::from_response(status, &body))
        }

        async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
            let resp = self.send(Request::get(&self.config.api_url(path))).await?;
            resp.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
        }

        /// `GET /api/v1/users/me`.
        pub async fn fetch_me(&self) -> Result<UserProfile, ApiError> {
            self.get_json("/api/v1/users/me").await
        }

        /// `GET /api/v1/admin/users`.
        pub async fn fetch_admin_users(&self) -> Result<Vec<AdminUser>, ApiError> {
            self.get_json("/api/v1/admin/users").await
        }

        /// `DELETE /api/v1/admin/users/{uid}`.
        pub async fn delete_admin_user(&self, uid: &str) -> Result<(), ApiError> {
            self.send(Request::delete(&self.config.api_url(&format!("/api/v1/admin/users/{uid}"))))
                .await
                .map(|_| ())
        }

        /// `POST /api/v1/auth/revoke-refresh-token`.
        pub async fn revoke_refresh_token(&self) -> Result<(), ApiError> {
            self.send(Request::post(&self.config.api_url("/api/v1/auth/revoke-refresh-token")))
                .await
                .map(|_| ())
        }
    }
}
