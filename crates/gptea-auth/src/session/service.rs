//! Session service.
//!
//! # Usage
//!
//! ```ignore
//! use gptea_auth::session::SessionService;
//!
//! let service = SessionService::new(verifiers, authenticator, sessions, users);
//!
//! let user_id = service.register("naver", provider_token).await?;
//! let pair = service.sign_in("naver", provider_token).await?;
//! let rotated = service
//!     .refresh(pair.access.signed(), pair.refresh.signed())
//!     .await?;
//! service.logout(&user_id).await?;
//! ```

use std::sync::Arc;

use uuid::Uuid;

use crate::AuthResult;
use crate::error::AuthError;
use crate::federation::CredentialVerifiers;
use crate::storage::{SessionStore, UserDirectory};
use crate::token::Authenticator;
use crate::types::TokenPair;

/// Drives the session protocol on top of the authenticator and stores.
///
/// Each user has at most one session: signing in or refreshing replaces the
/// stored refresh token id, which invalidates every older refresh token.
#[derive(Clone)]
pub struct SessionService {
    verifiers: CredentialVerifiers,
    authenticator: Arc<Authenticator>,
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserDirectory>,
}

impl SessionService {
    /// Creates a new session service.
    pub fn new(
        verifiers: CredentialVerifiers,
        authenticator: Arc<Authenticator>,
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            verifiers,
            authenticator,
            sessions,
            users,
        }
    }

    /// Returns the authenticator.
    #[must_use]
    pub fn authenticator(&self) -> &Arc<Authenticator> {
        &self.authenticator
    }

    /// Registers a new user for a provider credential.
    ///
    /// # Errors
    ///
    /// Returns a `Credential` error if verification fails, and `Conflict` if
    /// the credential already belongs to a user.
    pub async fn register(&self, provider: &str, credential_token: &str) -> AuthResult<String> {
        let identity = self.verifiers.verify(provider, credential_token).await?;

        if self
            .users
            .find_user_id(identity.provider, &identity.external_id)
            .await?
            .is_some()
        {
            return Err(AuthError::conflict(format!(
                "{} credential already registered",
                identity.provider
            )));
        }

        let user_id = Uuid::new_v4().to_string();
        self.users
            .register(&user_id, identity.provider, &identity.external_id)
            .await?;

        tracing::info!(user_id = %user_id, provider = %identity.provider, "Registered user");
        Ok(user_id)
    }

    /// Signs in with a provider credential and starts a new session.
    ///
    /// Any previous session of the user is replaced.
    ///
    /// # Errors
    ///
    /// Returns a `Credential` error if verification fails, `UserNotFound` if
    /// no user owns the credential, or a token/storage error.
    pub async fn sign_in(&self, provider: &str, credential_token: &str) -> AuthResult<TokenPair> {
        let identity = self.verifiers.verify(provider, credential_token).await?;

        let user_id = self
            .users
            .find_user_id(identity.provider, &identity.external_id)
            .await?
            .ok_or_else(|| AuthError::user_not_found(identity.provider.as_str()))?;

        let pair = self.authenticator.issue_session(&user_id)?;
        self.sessions.upsert(&user_id, &pair.refresh.id).await?;

        tracing::info!(user_id = %user_id, provider = %identity.provider, "Signed in");
        Ok(pair)
    }

    /// Rotates a presented token pair.
    ///
    /// The access token may be expired; the refresh token must be valid,
    /// bound to the access token, and still the user's current one.
    ///
    /// # Errors
    ///
    /// Returns a `Token` error if either token fails to parse,
    /// `TokenRevoked` if the refresh token was superseded or logged out,
    /// `TokenPairMismatch` if the tokens were not issued together, or a
    /// storage error.
    pub async fn refresh(&self, access_token: &str, refresh_token: &str) -> AuthResult<TokenPair> {
        let access = self.authenticator.verify_access_for_refresh(access_token)?;
        let refresh = self.authenticator.verify_refresh(refresh_token)?;

        if !self.sessions.exists(&access.subject, &refresh.id).await? {
            tracing::warn!(
                user_id = %access.subject,
                refresh_token_id = %refresh.id,
                "Refresh token is not the current session"
            );
            return Err(AuthError::TokenRevoked);
        }

        let pair = self.authenticator.rotate(&access, &refresh)?;
        self.sessions.upsert(pair.subject(), &pair.refresh.id).await?;

        tracing::info!(user_id = %pair.subject(), "Refreshed session");
        Ok(pair)
    }

    /// Ends the user's session.
    ///
    /// Idempotent: a user without a stored session is already signed out.
    ///
    /// # Errors
    ///
    /// Returns a storage error.
    pub async fn logout(&self, user_id: &str) -> AuthResult<()> {
        if self.sessions.delete(user_id).await? {
            tracing::info!(user_id = %user_id, "Signed out");
        } else {
            tracing::debug!(user_id = %user_id, "Logout without an active session");
        }
        Ok(())
    }
}
