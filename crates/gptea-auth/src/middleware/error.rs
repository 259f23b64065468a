//! Error response handling for authentication middleware.
//!
//! This module implements `IntoResponse` for `AuthError`. Every token
//! failure produces the same 401 body so responses do not reveal whether a
//! token was expired, forged, or revoked.

use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;
use crate::federation::CredentialError;

/// Message returned for every rejected token.
const UNAUTHORIZED_MESSAGE: &str = "invalid or expired token";

// =============================================================================
// IntoResponse Implementation
// =============================================================================

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = error_details(&self);
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(error = %self, category = %self.category(), "Auth request failed");
        } else {
            tracing::debug!(error = %self, category = %self.category(), "Auth request rejected");
        }

        let mut headers = HeaderMap::new();
        if status == StatusCode::UNAUTHORIZED {
            headers.insert(
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static("Bearer realm=\"gptea\", error=\"invalid_token\""),
            );
        }

        (status, headers, Json(error_body(code, &message))).into_response()
    }
}

/// Extracts the HTTP status and client-facing message from an `AuthError`.
fn error_details(error: &AuthError) -> (StatusCode, String) {
    if error.is_token_error() {
        return (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE.to_string());
    }

    match error {
        AuthError::Credential(e) => match e {
            CredentialError::ProviderUnreachable { provider, .. } => (
                StatusCode::BAD_GATEWAY,
                format!("{provider} is unavailable"),
            ),
            CredentialError::UnknownProvider(_)
            | CredentialError::ProviderRejected { .. }
            | CredentialError::ProfileIncomplete { .. } => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
        },
        AuthError::InvalidRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
        AuthError::UserNotFound { .. } => (StatusCode::NOT_FOUND, error.to_string()),
        AuthError::Conflict { message } => (StatusCode::CONFLICT, message.clone()),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal server error".to_string(),
        ),
    }
}

/// Builds the JSON error body `{"error": code, "message": message}`.
#[must_use]
pub fn error_body(code: &str, message: &str) -> serde_json::Value {
    json!({
        "error": code,
        "message": message,
    })
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;
    use crate::token::codec::CodecError;

    async fn render(error: AuthError) -> (StatusCode, HeaderMap, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_token_errors_share_one_response() {
        let mut bodies = Vec::new();
        for error in [
            AuthError::from(CodecError::Expired),
            AuthError::from(CodecError::InvalidSignature),
            AuthError::from(CodecError::malformed("bad base64")),
            AuthError::from(CodecError::invalid_signature_method("RS256")),
            AuthError::TokenPairMismatch,
            AuthError::TokenRevoked,
            AuthError::unauthorized("no session"),
        ] {
            let (status, headers, body) = render(error).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert!(headers.contains_key(header::WWW_AUTHENTICATE));
            bodies.push(body);
        }

        assert!(bodies.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(bodies[0]["error"], "unauthorized");
        assert_eq!(bodies[0]["message"], UNAUTHORIZED_MESSAGE);
    }

    #[tokio::test]
    async fn test_invalid_request_is_bad_request() {
        let (status, headers, body) =
            render(AuthError::invalid_request("Missing Authorization header")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!headers.contains_key(header::WWW_AUTHENTICATE));
        assert_eq!(body["error"], "invalid_request");
        assert_eq!(body["message"], "Missing Authorization header");
    }

    #[tokio::test]
    async fn test_credential_errors() {
        let (status, _, body) = render(CredentialError::unknown_provider("foo").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "unknown_provider");

        let (status, _, body) = render(CredentialError::provider_rejected("naver", 401).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_credential");

        let (status, _, body) =
            render(CredentialError::provider_unreachable("kakao", "connect refused").into()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "provider_unreachable");
        assert_eq!(body["message"], "kakao is unavailable");
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let (status, _, body) = render(AuthError::storage("connection reset by peer")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "server_error");
        assert_eq!(body["message"], "internal server error");

        let (status, _, _) = render(CodecError::signing_failure("boom").into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_user_errors() {
        let (status, _, body) = render(AuthError::user_not_found("naver")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "user_not_found");

        let (status, _, body) = render(AuthError::conflict("already registered")).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");
    }
}
