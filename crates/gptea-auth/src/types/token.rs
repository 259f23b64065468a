//! Access and refresh token domain types.
//!
//! Both types are immutable once built. They carry the decoded claims in
//! typed form plus the signed compact string handed to the client.
//!
//! # Security
//!
//! The signed string is a bearer credential. `Debug` output redacts it so
//! tokens never end up in logs.

use std::fmt;

use time::OffsetDateTime;

use crate::token::codec::{AccessTokenClaims, CodecError, RefreshTokenClaims};

fn timestamp(claim: &str, value: i64) -> Result<OffsetDateTime, CodecError> {
    OffsetDateTime::from_unix_timestamp(value)
        .map_err(|e| CodecError::malformed(format!("{claim} out of range: {e}")))
}

/// Short-lived proof of identity.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    /// Internal user id.
    pub subject: String,

    /// Unique random token id (`jti`).
    pub id: String,

    /// When the token was issued.
    pub issued_at: OffsetDateTime,

    /// When the token stops being accepted by strict verification.
    pub expires_at: OffsetDateTime,

    signed: String,
}

impl AccessToken {
    pub(crate) fn from_claims(
        claims: AccessTokenClaims,
        signed: String,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            issued_at: timestamp("iat", claims.iat)?,
            expires_at: timestamp("exp", claims.exp)?,
            subject: claims.sub,
            id: claims.jti,
            signed,
        })
    }

    /// Returns the signed compact form.
    #[must_use]
    pub fn signed(&self) -> &str {
        &self.signed
    }

    /// Returns `true` if the token has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at < now
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("subject", &self.subject)
            .field("id", &self.id)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .field("signed", &"<redacted>")
            .finish()
    }
}

/// Long-lived proof permitting reissuance of a token pair.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken {
    /// Unique random token id (`jti`). This is the value kept in the session store.
    pub id: String,

    /// When the token was issued.
    pub issued_at: OffsetDateTime,

    /// When the token stops being accepted.
    pub expires_at: OffsetDateTime,

    /// Id of the access token issued in the same pair (`ati`).
    pub bound_access_token_id: String,

    signed: String,
}

impl RefreshToken {
    pub(crate) fn from_claims(
        claims: RefreshTokenClaims,
        signed: String,
    ) -> Result<Self, CodecError> {
        Ok(Self {
            issued_at: timestamp("iat", claims.iat)?,
            expires_at: timestamp("exp", claims.exp)?,
            id: claims.jti,
            bound_access_token_id: claims.ati,
            signed,
        })
    }

    /// Returns the signed compact form.
    #[must_use]
    pub fn signed(&self) -> &str {
        &self.signed
    }

    /// Returns `true` if this refresh token was issued alongside `access`.
    #[must_use]
    pub fn is_bound_to(&self, access: &AccessToken) -> bool {
        self.bound_access_token_id == access.id
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshToken")
            .field("id", &self.id)
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .field("bound_access_token_id", &self.bound_access_token_id)
            .field("signed", &"<redacted>")
            .finish()
    }
}

/// An access token and the refresh token issued alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    /// The access token.
    pub access: AccessToken,
    /// The refresh token bound to `access`.
    pub refresh: RefreshToken,
}

impl TokenPair {
    /// Returns the user id the pair was issued to.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.access.subject
    }
}
