//! Session issuance and token pair rotation.
//!
//! The [`Authenticator`] composes the [`TokenCodec`] into the two operations
//! the rest of the crate needs: issuing a fresh pair for a subject and
//! rotating a presented pair into a new one. It performs no storage I/O;
//! checking that a refresh token is still the user's current one is the
//! session service's job.
//!
//! # Usage
//!
//! ```ignore
//! use gptea_auth::token::Authenticator;
//!
//! let authenticator = Authenticator::from_config(&config.tokens)?;
//!
//! let pair = authenticator.issue_session("user-1")?;
//!
//! let access = authenticator.verify_access_for_refresh(pair.access.signed())?;
//! let refresh = authenticator.verify_refresh(pair.refresh.signed())?;
//! let rotated = authenticator.rotate(&access, &refresh)?;
//! ```

use time::OffsetDateTime;

use crate::AuthResult;
use crate::config::{MAX_TOKEN_LIFETIME, TokenConfig};
use crate::error::AuthError;
use crate::token::codec::{CodecError, TokenCodec, TokenKind};
use crate::types::{AccessToken, RefreshToken, TokenPair};

/// Issues, verifies and rotates access/refresh token pairs.
///
/// Holds only the codec (keys and lifetimes); there is no mutable runtime
/// state, so one instance is shared behind an `Arc`.
pub struct Authenticator {
    codec: TokenCodec,
}

impl Authenticator {
    /// Creates an authenticator around an existing codec.
    #[must_use]
    pub fn new(codec: TokenCodec) -> Self {
        Self { codec }
    }

    /// Creates an authenticator from token configuration.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if a lifetime exceeds [`MAX_TOKEN_LIFETIME`].
    pub fn from_config(config: &TokenConfig) -> AuthResult<Self> {
        for (name, lifetime) in [
            ("access_token_lifetime", config.access_token_lifetime),
            ("refresh_token_lifetime", config.refresh_token_lifetime),
        ] {
            if lifetime > MAX_TOKEN_LIFETIME {
                return Err(AuthError::configuration(format!(
                    "{name} exceeds the maximum token lifetime"
                )));
            }
        }

        let access_ttl = time::Duration::try_from(config.access_token_lifetime)
            .map_err(|e| AuthError::configuration(format!("access_token_lifetime: {e}")))?;
        let refresh_ttl = time::Duration::try_from(config.refresh_token_lifetime)
            .map_err(|e| AuthError::configuration(format!("refresh_token_lifetime: {e}")))?;

        Ok(Self::new(TokenCodec::new(
            config.access_token_secret.as_bytes(),
            config.refresh_token_secret.as_bytes(),
            access_ttl,
            refresh_ttl,
        )))
    }

    /// Returns the underlying codec.
    #[must_use]
    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    /// Issues a new pair for `subject`.
    ///
    /// The refresh token is bound to the id of the access token issued with it.
    ///
    /// # Errors
    ///
    /// Returns a `Token` error if randomness or signing fails.
    pub fn issue_session(&self, subject: &str) -> AuthResult<TokenPair> {
        self.issue_session_at(subject, OffsetDateTime::now_utc())
    }

    /// Issues a new pair for `subject` as if it were `now`.
    ///
    /// # Errors
    ///
    /// Returns a `Token` error if randomness or signing fails.
    pub fn issue_session_at(&self, subject: &str, now: OffsetDateTime) -> AuthResult<TokenPair> {
        let access = self.codec.issue_access_at(subject, now)?;
        let refresh = self.codec.issue_refresh_at(&access.id, now)?;

        tracing::debug!(
            subject = %subject,
            access_token_id = %access.id,
            refresh_token_id = %refresh.id,
            "Issued token pair"
        );

        Ok(TokenPair { access, refresh })
    }

    /// Strictly verifies an access token.
    ///
    /// # Errors
    ///
    /// Returns the codec's parse failure, including `Expired`.
    pub fn verify_access(&self, token: &str) -> AuthResult<AccessToken> {
        self.codec
            .parse_access(token)
            .map_err(|e| rejected(TokenKind::Access, e))
    }

    /// Verifies an access token presented for refresh; expiry is not checked.
    ///
    /// # Errors
    ///
    /// Returns the codec's parse failure other than `Expired`.
    pub fn verify_access_for_refresh(&self, token: &str) -> AuthResult<AccessToken> {
        self.codec
            .parse_access_allow_expired(token)
            .map_err(|e| rejected(TokenKind::Access, e))
    }

    /// Strictly verifies a refresh token.
    ///
    /// # Errors
    ///
    /// Returns the codec's parse failure, including `Expired`.
    pub fn verify_refresh(&self, token: &str) -> AuthResult<RefreshToken> {
        self.codec
            .parse_refresh(token)
            .map_err(|e| rejected(TokenKind::Refresh, e))
    }

    /// Rotates a verified pair into a new one for the same subject.
    ///
    /// Does not consult the session store: the caller must first confirm that
    /// `refresh.id` is the user's current refresh token.
    ///
    /// # Errors
    ///
    /// Returns `TokenPairMismatch` if `refresh` was not issued alongside
    /// `access`, or a `Token` error if issuance fails.
    pub fn rotate(&self, access: &AccessToken, refresh: &RefreshToken) -> AuthResult<TokenPair> {
        if !refresh.is_bound_to(access) {
            tracing::debug!(
                subject = %access.subject,
                access_token_id = %access.id,
                bound_access_token_id = %refresh.bound_access_token_id,
                "Refresh token is not bound to the presented access token"
            );
            return Err(AuthError::TokenPairMismatch);
        }

        self.issue_session(&access.subject)
    }
}

fn rejected(kind: TokenKind, err: CodecError) -> AuthError {
    tracing::debug!(kind = %kind, error = %err, "Token rejected");
    AuthError::from(err)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn config() -> TokenConfig {
        TokenConfig {
            access_token_lifetime: Duration::from_secs(300),
            refresh_token_lifetime: Duration::from_secs(600),
            access_token_secret: "access-secret".to_string(),
            refresh_token_secret: "refresh-secret".to_string(),
        }
    }

    fn authenticator() -> Authenticator {
        Authenticator::from_config(&config()).unwrap()
    }

    #[test]
    fn test_issue_session_binds_pair() {
        let auth = authenticator();
        let pair = auth.issue_session("user-1").unwrap();

        assert_eq!(pair.subject(), "user-1");
        assert_eq!(pair.refresh.bound_access_token_id, pair.access.id);
        assert_ne!(pair.access.id, pair.refresh.id);
    }

    #[test]
    fn test_issued_access_verifies() {
        let auth = authenticator();
        let pair = auth.issue_session("user-1").unwrap();

        let access = auth.verify_access(pair.access.signed()).unwrap();
        assert_eq!(access.subject, "user-1");
        assert_eq!(access.id, pair.access.id);

        let refresh = auth.verify_refresh(pair.refresh.signed()).unwrap();
        assert_eq!(refresh.id, pair.refresh.id);
    }

    #[test]
    fn test_lifetimes_come_from_config() {
        let auth = authenticator();
        assert_eq!(auth.codec().access_ttl(), time::Duration::seconds(300));
        assert_eq!(auth.codec().refresh_ttl(), time::Duration::seconds(600));
    }

    #[test]
    fn test_rotate_bound_pair() {
        let auth = authenticator();
        let pair = auth.issue_session("user-1").unwrap();

        let rotated = auth.rotate(&pair.access, &pair.refresh).unwrap();
        assert_eq!(rotated.subject(), "user-1");
        assert_ne!(rotated.access.id, pair.access.id);
        assert_ne!(rotated.refresh.id, pair.refresh.id);
        assert_eq!(rotated.refresh.bound_access_token_id, rotated.access.id);
    }

    #[test]
    fn test_rotate_unbound_pair_rejected() {
        let auth = authenticator();
        let first = auth.issue_session("user-1").unwrap();
        let second = auth.issue_session("user-1").unwrap();

        let result = auth.rotate(&first.access, &second.refresh);
        assert!(matches!(result, Err(AuthError::TokenPairMismatch)));
    }

    #[test]
    fn test_expired_access_only_verifies_for_refresh() {
        let auth = authenticator();
        let issued_at = OffsetDateTime::now_utc() - time::Duration::seconds(301);
        let pair = auth.issue_session_at("user-1", issued_at).unwrap();

        let strict = auth.verify_access(pair.access.signed());
        assert!(matches!(strict, Err(AuthError::Token(CodecError::Expired))));

        let relaxed = auth.verify_access_for_refresh(pair.access.signed()).unwrap();
        assert_eq!(relaxed.subject, "user-1");

        // The refresh token is still within its 600s lifetime.
        let refresh = auth.verify_refresh(pair.refresh.signed()).unwrap();
        let rotated = auth.rotate(&relaxed, &refresh).unwrap();
        assert!(auth.verify_access(rotated.access.signed()).is_ok());
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let auth = authenticator();
        let pair = auth.issue_session("user-1").unwrap();

        let result = auth.verify_access(pair.refresh.signed());
        assert!(matches!(
            result,
            Err(AuthError::Token(CodecError::InvalidSignature))
        ));
    }

    #[test]
    fn test_out_of_range_lifetime_rejected() {
        let mut config = config();
        config.access_token_lifetime = Duration::MAX;

        let result = Authenticator::from_config(&config);
        assert!(matches!(result, Err(AuthError::Configuration { .. })));
    }

    #[test]
    fn test_lifetime_beyond_maximum_rejected() {
        let mut config = config();
        config.refresh_token_lifetime = Duration::from_secs(300_000 * 365 * 24 * 3600);

        let result = Authenticator::from_config(&config);
        assert!(matches!(result, Err(AuthError::Configuration { .. })));

        config.refresh_token_lifetime = MAX_TOKEN_LIFETIME;
        let auth = Authenticator::from_config(&config).unwrap();
        assert!(auth.issue_session("user-1").is_ok());
    }
}
