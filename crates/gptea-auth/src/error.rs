//! Authentication and authorization error types.
//!
//! This module defines the crate-level error returned by the authenticator,
//! the session service and the HTTP layer. Token and credential failures are
//! kept as their typed module errors so callers can still tell them apart;
//! the HTTP layer collapses them before anything reaches a client.

use std::fmt;

use crate::federation::CredentialError;
use crate::token::codec::CodecError;

/// Errors that can occur during authentication and authorization operations.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Issuing or parsing a token failed.
    #[error(transparent)]
    Token(#[from] CodecError),

    /// Verifying a third-party credential failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The refresh token was not issued alongside the presented access token.
    #[error("Token pair mismatch")]
    TokenPairMismatch,

    /// The refresh token is no longer the user's current session.
    #[error("Token revoked")]
    TokenRevoked,

    /// The request lacks valid authentication credentials.
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Description of why the request is unauthorized.
        message: String,
    },

    /// The request is malformed (missing headers, bad prefix, bad body).
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// Description of why the request is invalid.
        message: String,
    },

    /// No user is registered for the presented credential.
    #[error("User not found for {provider} credential")]
    UserNotFound {
        /// The credential provider name.
        provider: String,
    },

    /// The resource already exists.
    #[error("Conflict: {message}")]
    Conflict {
        /// Description of the conflict.
        message: String,
    },

    /// An error occurred while storing or retrieving auth data.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the storage error.
        message: String,
    },

    /// The auth configuration is invalid.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error.
        message: String,
    },
}

impl AuthError {
    /// Creates a new `Unauthorized` error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidRequest` error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Creates a new `UserNotFound` error.
    #[must_use]
    pub fn user_not_found(provider: impl Into<String>) -> Self {
        Self::UserNotFound {
            provider: provider.into(),
        }
    }

    /// Creates a new `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a new `Storage` error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a new `Configuration` error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a client error (4xx category).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Token(e) => e.is_validation_error(),
            Self::Credential(e) => !e.is_external_error(),
            Self::TokenPairMismatch
            | Self::TokenRevoked
            | Self::Unauthorized { .. }
            | Self::InvalidRequest { .. }
            | Self::UserNotFound { .. }
            | Self::Conflict { .. } => true,
            Self::Storage { .. } | Self::Configuration { .. } => false,
        }
    }

    /// Returns `true` if this is a server error (5xx category).
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        !self.is_client_error()
    }

    /// Returns `true` if this error concerns a presented token.
    ///
    /// These are the failures the HTTP layer reports as a single
    /// `unauthorized` outcome.
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        match self {
            Self::Token(e) => e.is_validation_error(),
            Self::TokenPairMismatch | Self::TokenRevoked | Self::Unauthorized { .. } => true,
            _ => false,
        }
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Token(e) if e.is_issuance_error() => ErrorCategory::Internal,
            Self::Token(_) => ErrorCategory::Token,
            Self::Credential(_) => ErrorCategory::Federation,
            Self::TokenPairMismatch => ErrorCategory::Token,
            Self::TokenRevoked => ErrorCategory::Token,
            Self::Unauthorized { .. } => ErrorCategory::Authentication,
            Self::InvalidRequest { .. } => ErrorCategory::Validation,
            Self::UserNotFound { .. } => ErrorCategory::Authentication,
            Self::Conflict { .. } => ErrorCategory::Validation,
            Self::Storage { .. } => ErrorCategory::Infrastructure,
            Self::Configuration { .. } => ErrorCategory::Configuration,
        }
    }

    /// Returns the machine-readable error code exposed in HTTP bodies.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        if self.is_token_error() {
            return "unauthorized";
        }
        match self {
            Self::Credential(e) => e.error_code(),
            Self::InvalidRequest { .. } => "invalid_request",
            Self::UserNotFound { .. } => "user_not_found",
            Self::Conflict { .. } => "conflict",
            _ => "server_error",
        }
    }
}

/// Categories of authentication/authorization errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Authentication-related errors (identity verification).
    Authentication,
    /// Token-related errors (validation, expiration, rotation).
    Token,
    /// Request validation errors.
    Validation,
    /// Infrastructure/storage errors.
    Infrastructure,
    /// Configuration errors.
    Configuration,
    /// Internal server errors.
    Internal,
    /// Identity provider federation errors.
    Federation,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Token => write!(f, "token"),
            Self::Validation => write!(f, "validation"),
            Self::Infrastructure => write!(f, "infrastructure"),
            Self::Configuration => write!(f, "configuration"),
            Self::Internal => write!(f, "internal"),
            Self::Federation => write!(f, "federation"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::unauthorized("missing token");
        assert_eq!(err.to_string(), "Unauthorized: missing token");

        let err = AuthError::TokenPairMismatch;
        assert_eq!(err.to_string(), "Token pair mismatch");

        let err = AuthError::from(CodecError::Expired);
        assert_eq!(err.to_string(), "Token expired");

        let err = AuthError::from(CredentialError::unknown_provider("foo"));
        assert_eq!(err.to_string(), "Unknown credential provider: foo");

        let err = AuthError::user_not_found("naver");
        assert_eq!(err.to_string(), "User not found for naver credential");
    }

    #[test]
    fn test_error_predicates() {
        let err = AuthError::from(CodecError::InvalidSignature);
        assert!(err.is_client_error());
        assert!(err.is_token_error());

        let err = AuthError::from(CodecError::signing_failure("boom"));
        assert!(err.is_server_error());
        assert!(!err.is_token_error());

        let err = AuthError::TokenRevoked;
        assert!(err.is_client_error());
        assert!(err.is_token_error());

        let err = AuthError::invalid_request("no bearer prefix");
        assert!(err.is_client_error());
        assert!(!err.is_token_error());

        let err = AuthError::storage("database down");
        assert!(!err.is_client_error());
        assert!(err.is_server_error());

        let err = AuthError::from(CredentialError::provider_unreachable("naver", "timeout"));
        assert!(err.is_server_error());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::from(CodecError::Expired).category(),
            ErrorCategory::Token
        );
        assert_eq!(
            AuthError::from(CodecError::randomness_failure("x")).category(),
            ErrorCategory::Internal
        );
        assert_eq!(AuthError::TokenPairMismatch.category(), ErrorCategory::Token);
        assert_eq!(
            AuthError::from(CredentialError::unknown_provider("foo")).category(),
            ErrorCategory::Federation
        );
        assert_eq!(
            AuthError::storage("x").category(),
            ErrorCategory::Infrastructure
        );
        assert_eq!(
            AuthError::configuration("x").category(),
            ErrorCategory::Configuration
        );
    }

    #[test]
    fn test_error_code_collapses_token_failures() {
        for err in [
            AuthError::from(CodecError::Expired),
            AuthError::from(CodecError::InvalidSignature),
            AuthError::from(CodecError::malformed("x")),
            AuthError::from(CodecError::invalid_signature_method("RS256")),
            AuthError::TokenPairMismatch,
            AuthError::TokenRevoked,
        ] {
            assert_eq!(err.error_code(), "unauthorized", "{err:?}");
        }

        assert_eq!(
            AuthError::invalid_request("x").error_code(),
            "invalid_request"
        );
        assert_eq!(AuthError::storage("x").error_code(), "server_error");
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Authentication.to_string(), "authentication");
        assert_eq!(ErrorCategory::Token.to_string(), "token");
        assert_eq!(ErrorCategory::Federation.to_string(), "federation");
    }
}
