//! Bearer token authentication extractors.
//!
//! This module provides Axum extractors for validating Bearer tokens
//! and extracting authentication context from requests.
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get};
//! use gptea_auth::middleware::{AuthState, BearerAuth};
//!
//! async fn protected_handler(BearerAuth(auth): BearerAuth) -> String {
//!     format!("Hello, {}!", auth.subject())
//! }
//!
//! let app = Router::new()
//!     .route("/protected", get(protected_handler))
//!     .with_state(auth_state);
//! ```

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::error::AuthError;
use crate::token::Authenticator;

use super::types::AuthContext;

/// Header carrying the refresh token on the rotation endpoint.
pub const REFRESH_TOKEN_HEADER: &str = "x-refresh-token";

// =============================================================================
// Auth State
// =============================================================================

/// State required for bearer token authentication.
///
/// This struct should be included in your application state and made
/// available to the `BearerAuth` extractor via `FromRef`.
///
/// # Example
///
/// ```ignore
/// #[derive(Clone)]
/// struct AppState {
///     auth: AuthState,
///     // ... other state
/// }
///
/// impl FromRef<AppState> for AuthState {
///     fn from_ref(state: &AppState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthState {
    /// Authenticator used to verify access tokens.
    pub authenticator: Arc<Authenticator>,
}

impl AuthState {
    /// Creates a new auth state.
    pub fn new(authenticator: Arc<Authenticator>) -> Self {
        Self { authenticator }
    }
}

/// Reads the token from an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AuthError::invalid_request("Missing Authorization header"))?
        .to_str()
        .map_err(|_| AuthError::invalid_request("Authorization header is not valid ASCII"))?;

    header
        .strip_prefix("Bearer ")
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::invalid_request("Authorization header must be 'Bearer <token>'"))
}

// =============================================================================
// Bearer Auth Extractor
// =============================================================================

/// Axum extractor that validates the bearer access token.
///
/// This extractor:
/// 1. Extracts the `Authorization: Bearer <token>` header
/// 2. Strictly verifies the access token (signature, algorithm, expiry)
/// 3. Exposes the subject as [`AuthContext`]
///
/// # Errors
///
/// Rejects with `InvalidRequest` (400) if the header is missing or is not a
/// bearer credential, and with `Unauthorized` (401) if verification fails.
/// The verification failure cause is logged, not returned.
pub struct BearerAuth(pub AuthContext);

impl<S> FromRequestParts<S> for BearerAuth
where
    S: Send + Sync,
    AuthState: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let token = bearer_token(parts)?;

        let access = auth_state.authenticator.verify_access(token).map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            AuthError::unauthorized("invalid access token")
        })?;

        Ok(Self(AuthContext::from(access)))
    }
}

// =============================================================================
// Refresh Credentials Extractor
// =============================================================================

/// Axum extractor collecting the token pair presented for rotation.
///
/// Reads the access token from `Authorization: Bearer <token>` and the
/// refresh token from `X-Refresh-Token`. No verification happens here; the
/// session service parses the access token without its expiry check and the
/// refresh token strictly.
#[derive(Clone)]
pub struct RefreshCredentials {
    /// Signed access token text (possibly expired).
    pub access_token: String,
    /// Signed refresh token text.
    pub refresh_token: String,
}

impl std::fmt::Debug for RefreshCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCredentials")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

impl<S> FromRequestParts<S> for RefreshCredentials
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let access_token = bearer_token(parts)?.to_string();

        let refresh_token = parts
            .headers
            .get(REFRESH_TOKEN_HEADER)
            .and_then(|h| h.to_str().ok())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AuthError::invalid_request("Missing X-Refresh-Token header"))?
            .to_string();

        Ok(Self {
            access_token,
            refresh_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        routing::get,
    };
    use time::OffsetDateTime;
    use tower::ServiceExt;

    use super::*;
    use crate::config::TokenConfig;

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(
            Authenticator::from_config(&TokenConfig {
                access_token_lifetime: Duration::from_secs(300),
                refresh_token_lifetime: Duration::from_secs(600),
                access_token_secret: "access-secret".to_string(),
                refresh_token_secret: "refresh-secret".to_string(),
            })
            .unwrap(),
        )
    }

    async fn whoami(BearerAuth(auth): BearerAuth) -> String {
        auth.user_id
    }

    async fn pair(credentials: RefreshCredentials) -> String {
        format!("{}|{}", credentials.access_token, credentials.refresh_token)
    }

    fn app(authenticator: Arc<Authenticator>) -> Router {
        Router::new()
            .route("/me", get(whoami))
            .route("/pair", get(pair))
            .with_state(AuthState::new(authenticator))
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_with(uri: &str, headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_bearer_exposes_subject() {
        let auth = authenticator();
        let session = auth.issue_session("user-1").unwrap();
        let header = format!("Bearer {}", session.access.signed());

        let (status, body) = call(app(auth), get_with("/me", &[("authorization", header.as_str())])).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user-1");
    }

    #[tokio::test]
    async fn test_missing_header_is_bad_request() {
        let (status, body) = call(app(authenticator()), get_with("/me", &[])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("invalid_request"));
    }

    #[tokio::test]
    async fn test_wrong_scheme_is_bad_request() {
        let (status, _) = call(
            app(authenticator()),
            get_with("/me", &[("authorization", "Basic dXNlcjpwYXNz")]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            app(authenticator()),
            get_with("/me", &[("authorization", "Bearer ")]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_token_is_unauthorized() {
        let (status, body) = call(
            app(authenticator()),
            get_with("/me", &[("authorization", "Bearer not.a.token")]),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("invalid or expired token"));
    }

    #[tokio::test]
    async fn test_expired_token_is_unauthorized() {
        let auth = authenticator();
        let issued_at = OffsetDateTime::now_utc() - time::Duration::seconds(400);
        let session = auth.issue_session_at("user-1", issued_at).unwrap();
        let header = format!("Bearer {}", session.access.signed());

        let (status, _) = call(app(auth), get_with("/me", &[("authorization", header.as_str())])).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_token_is_not_an_access_token() {
        let auth = authenticator();
        let session = auth.issue_session("user-1").unwrap();
        let header = format!("Bearer {}", session.refresh.signed());

        let (status, _) = call(app(auth), get_with("/me", &[("authorization", header.as_str())])).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_refresh_credentials_collects_both_headers() {
        let (status, body) = call(
            app(authenticator()),
            get_with(
                "/pair",
                &[("authorization", "Bearer aaa"), ("x-refresh-token", "bbb")],
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "aaa|bbb");
    }

    #[tokio::test]
    async fn test_refresh_credentials_requires_refresh_header() {
        let (status, body) = call(
            app(authenticator()),
            get_with("/pair", &[("authorization", "Bearer aaa")]),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("X-Refresh-Token"));
    }

    #[test]
    fn test_refresh_credentials_debug_redacts() {
        let credentials = RefreshCredentials {
            access_token: "secret-access".to_string(),
            refresh_token: "secret-refresh".to_string(),
        };
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
    }
}
