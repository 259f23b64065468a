//! # gptea-auth
//!
//! Authentication core for the gptea chat backend.
//!
//! This crate provides:
//! - Issuance, verification and rotation of HMAC-signed access/refresh token pairs
//! - Credential verification against external identity providers (Naver, Kakao)
//! - A single-session-per-user session protocol on top of pluggable storage
//! - Axum extractors and handlers for the session endpoints
//!
//! ## Overview
//!
//! A user signs in with a token issued by an identity provider. Once the
//! provider vouches for it, the user receives an access token for protected
//! requests and a refresh token bound to it. The refresh token can be traded
//! exactly once for a new pair; the server keeps only the id of the current
//! refresh token per user.
//!
//! ## Modules
//!
//! - [`config`] - Token and federation configuration
//! - [`token`] - Token codec and the [`Authenticator`](token::Authenticator)
//! - [`federation`] - External identity provider integration
//! - [`storage`] - Storage traits for sessions and users
//! - [`session`] - Session lifecycle (register, sign-in, refresh, logout)
//! - [`middleware`] - HTTP extractors for authentication
//! - [`http`] - Axum HTTP handlers for the session endpoints

pub mod config;
pub mod error;
pub mod federation;
pub mod http;
pub mod middleware;
pub mod session;
pub mod storage;
pub mod token;
pub mod types;

pub use config::{AuthConfig, ConfigError, FederationConfig, MAX_TOKEN_LIFETIME, TokenConfig};
pub use error::{AuthError, ErrorCategory};
pub use federation::{
    CredentialError, CredentialProvider, CredentialVerifier, CredentialVerifiers, VerifyResult,
};
pub use http::{
    CredentialRequest, MessageResponse, SessionState, TokenResponse, logout_handler,
    refresh_handler, register_handler, sign_in_handler,
};
pub use middleware::{AuthContext, AuthState, BearerAuth, RefreshCredentials};
pub use session::SessionService;
pub use storage::{InMemorySessionStore, InMemoryUserDirectory, SessionStore, UserDirectory};
pub use token::{Authenticator, CodecError, TokenCodec, TokenKind};
pub use types::{AccessToken, RefreshToken, TokenPair};

/// Type alias for authentication results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use gptea_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::config::{AuthConfig, ConfigError, FederationConfig, TokenConfig};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::federation::{
        CredentialError, CredentialProvider, CredentialVerifier, CredentialVerifiers,
        VerifyResult,
    };
    pub use crate::http::{
        SessionState, TokenResponse, logout_handler, refresh_handler, register_handler,
        sign_in_handler,
    };
    pub use crate::middleware::{AuthContext, AuthState, BearerAuth, RefreshCredentials};
    pub use crate::session::SessionService;
    pub use crate::storage::{SessionStore, UserDirectory};
    pub use crate::token::{Authenticator, CodecError, TokenCodec};
    pub use crate::types::{AccessToken, RefreshToken, TokenPair};
}
