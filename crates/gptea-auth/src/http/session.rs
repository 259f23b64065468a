//! Session endpoint handlers.
//!
//! # Usage
//!
//! ```ignore
//! use axum::{Router, routing::{delete, post}};
//! use gptea_auth::http::{
//!     SessionState, logout_handler, refresh_handler, register_handler, sign_in_handler,
//! };
//!
//! let app = Router::new()
//!     .route("/auth/cred/register", post(register_handler))
//!     .route("/auth/cred/sign-in", post(sign_in_handler))
//!     .route("/auth/token/refresh", post(refresh_handler))
//!     .route("/auth/cred/logout", delete(logout_handler))
//!     .with_state(SessionState::new(session_service));
//! ```

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::middleware::{AuthState, BearerAuth, RefreshCredentials};
use crate::session::SessionService;
use crate::types::TokenPair;

// =============================================================================
// State Types
// =============================================================================

/// State required for the session endpoints.
#[derive(Clone)]
pub struct SessionState {
    /// Session service driving the protocol.
    pub service: SessionService,
}

impl SessionState {
    /// Creates a new session state.
    pub fn new(service: SessionService) -> Self {
        Self { service }
    }
}

impl FromRef<SessionState> for AuthState {
    fn from_ref(state: &SessionState) -> Self {
        AuthState::new(state.service.authenticator().clone())
    }
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Body of the register and sign-in requests.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequest {
    /// Provider name (`naver` or `kakao`).
    pub cred: String,
    /// Bearer token issued by the provider.
    pub access_token: String,
}

impl std::fmt::Debug for CredentialRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRequest")
            .field("cred", &self.cred)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Token pair returned by sign-in and refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Signed access token.
    pub access_token: String,
    /// Signed refresh token.
    pub refresh_token: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            access_token: pair.access.signed().to_string(),
            refresh_token: pair.refresh.signed().to_string(),
        }
    }
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome.
    pub message: String,
}

fn credential_body(
    payload: Result<Json<CredentialRequest>, JsonRejection>,
) -> Result<CredentialRequest, AuthError> {
    payload
        .map(|Json(body)| body)
        .map_err(|e| AuthError::invalid_request(e.body_text()))
}

// =============================================================================
// Handlers
// =============================================================================

/// Registers a user for a provider credential.
///
/// Responds `201 Created` with `{"message": "registered"}`.
pub async fn register_handler(
    State(state): State<SessionState>,
    payload: Result<Json<CredentialRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AuthError> {
    let request = credential_body(payload)?;
    state
        .service
        .register(&request.cred, &request.access_token)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "registered".to_string(),
        }),
    ))
}

/// Signs in with a provider credential and returns a new token pair.
pub async fn sign_in_handler(
    State(state): State<SessionState>,
    payload: Result<Json<CredentialRequest>, JsonRejection>,
) -> Result<Json<TokenResponse>, AuthError> {
    let request = credential_body(payload)?;
    let pair = state
        .service
        .sign_in(&request.cred, &request.access_token)
        .await?;

    Ok(Json(pair.into()))
}

/// Rotates the presented pair (`Authorization: Bearer` + `X-Refresh-Token`).
pub async fn refresh_handler(
    State(state): State<SessionState>,
    credentials: RefreshCredentials,
) -> Result<Json<TokenResponse>, AuthError> {
    let pair = state
        .service
        .refresh(&credentials.access_token, &credentials.refresh_token)
        .await?;

    Ok(Json(pair.into()))
}

/// Ends the caller's session. Responds `204 No Content`.
pub async fn logout_handler(
    State(state): State<SessionState>,
    BearerAuth(auth): BearerAuth,
) -> Result<StatusCode, AuthError> {
    state.service.logout(auth.subject()).await?;
    Ok(StatusCode::NO_CONTENT)
}
