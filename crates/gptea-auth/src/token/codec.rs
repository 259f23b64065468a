//! Signed token encoding and decoding.
//!
//! Access and refresh tokens are compact JWS strings signed with HMAC-SHA256.
//! Each kind has its own secret, so a leaked access secret cannot be used to
//! forge refresh tokens and vice versa.
//!
//! ## Claims
//!
//! - **Access**: `{sub, jti, iat, exp}`
//! - **Refresh**: `{jti, iat, exp, ati}` where `ati` is the `jti` of the access
//!   token the refresh token was issued alongside
//!
//! ## Example
//!
//! ```ignore
//! use gptea_auth::token::codec::TokenCodec;
//! use time::Duration;
//!
//! let codec = TokenCodec::new(b"access-secret", b"refresh-secret", Duration::minutes(15), Duration::days(14));
//!
//! let access = codec.issue_access("user-1")?;
//! let refresh = codec.issue_refresh(&access.id)?;
//!
//! let parsed = codec.parse_access(access.signed())?;
//! assert_eq!(parsed.subject, "user-1");
//! ```

use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::types::{AccessToken, RefreshToken};

/// Number of random bytes in a token id.
///
/// A multiple of 3 so the base64 rendering has no padding.
pub const TOKEN_ID_BYTES: usize = 15;

/// Algorithm used when signing new tokens.
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// HMAC algorithms accepted when parsing.
const HMAC_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while issuing or parsing tokens.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The secure random source failed while generating a token id.
    #[error("Failed to generate token id: {message}")]
    RandomnessFailure {
        /// Description of the RNG failure.
        message: String,
    },

    /// The claims could not be signed.
    #[error("Failed to sign token: {message}")]
    SigningFailure {
        /// Description of the signing failure.
        message: String,
    },

    /// The token could not be decoded.
    #[error("Malformed token: {message}")]
    Malformed {
        /// Description of the structural problem.
        message: String,
    },

    /// The token header declares an algorithm outside the HMAC family.
    #[error("Invalid signing method: {algorithm}")]
    InvalidSignatureMethod {
        /// The declared algorithm.
        algorithm: String,
    },

    /// The signature does not match the expected key.
    #[error("Invalid signature")]
    InvalidSignature,

    /// The token's `exp` is in the past.
    #[error("Token expired")]
    Expired,
}

impl CodecError {
    /// Creates a new `RandomnessFailure`.
    #[must_use]
    pub fn randomness_failure(message: impl Into<String>) -> Self {
        Self::RandomnessFailure {
            message: message.into(),
        }
    }

    /// Creates a new `SigningFailure`.
    #[must_use]
    pub fn signing_failure(message: impl Into<String>) -> Self {
        Self::SigningFailure {
            message: message.into(),
        }
    }

    /// Creates a new `Malformed` error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidSignatureMethod` error.
    #[must_use]
    pub fn invalid_signature_method(algorithm: impl Into<String>) -> Self {
        Self::InvalidSignatureMethod {
            algorithm: algorithm.into(),
        }
    }

    /// Returns `true` if the failure happened while parsing a presented token.
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::Malformed { .. }
                | Self::InvalidSignatureMethod { .. }
                | Self::InvalidSignature
                | Self::Expired
        )
    }

    /// Returns `true` if the failure happened while issuing a token.
    #[must_use]
    pub fn is_issuance_error(&self) -> bool {
        matches!(
            self,
            Self::RandomnessFailure { .. } | Self::SigningFailure { .. }
        )
    }
}

impl From<jsonwebtoken::errors::Error> for CodecError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::InvalidAlgorithm => Self::invalid_signature_method(err.to_string()),
            _ => Self::malformed(err.to_string()),
        }
    }
}

// ============================================================================
// Token Kind
// ============================================================================

/// The two token kinds, each signed with its own secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Short-lived bearer credential.
    Access,
    /// Long-lived credential used once to mint a new pair.
    Refresh,
}

impl TokenKind {
    /// Returns the kind name as used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Token Claims
// ============================================================================

/// Claims carried by an access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessTokenClaims {
    /// Subject (internal user id).
    pub sub: String,

    /// Token id.
    pub jti: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

/// Claims carried by a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshTokenClaims {
    /// Token id.
    pub jti: String,

    /// Issued at (Unix timestamp).
    pub iat: i64,

    /// Expiration time (Unix timestamp).
    pub exp: i64,

    /// Id of the access token issued alongside this refresh token.
    pub ati: String,
}

// ============================================================================
// Token Ids
// ============================================================================

/// Generates a fresh token id from the operating system CSPRNG.
///
/// The id is [`TOKEN_ID_BYTES`] random bytes rendered as unpadded base64url.
///
/// # Errors
/// Returns `RandomnessFailure` if the OS random source is unavailable.
pub fn generate_token_id() -> Result<String, CodecError> {
    let mut bytes = [0u8; TOKEN_ID_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| CodecError::randomness_failure(e.to_string()))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Computes `now + ttl` as a unix timestamp.
fn expiry(now: OffsetDateTime, ttl: Duration) -> Result<i64, CodecError> {
    now.checked_add(ttl)
        .map(OffsetDateTime::unix_timestamp)
        .ok_or_else(|| CodecError::signing_failure(format!("expiry out of range: {now} + {ttl}")))
}

// ============================================================================
// Signing Secret
// ============================================================================

/// An HMAC secret usable for both signing and verification.
struct SigningSecret {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl SigningSecret {
    fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    fn sign<T: Serialize>(&self, claims: &T) -> Result<String, CodecError> {
        encode(&Header::new(SIGNING_ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| CodecError::signing_failure(e.to_string()))
    }

    fn verify<T: DeserializeOwned>(&self, token: &str, allow_expired: bool) -> Result<T, CodecError> {
        // Reject asymmetric and unknown algorithms before the key is touched.
        let header = decode_header(token).map_err(|e| CodecError::malformed(e.to_string()))?;
        if !HMAC_ALGORITHMS.contains(&header.alg) {
            return Err(CodecError::invalid_signature_method(format!(
                "{:?}",
                header.alg
            )));
        }

        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = HMAC_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.validate_exp = !allow_expired;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        decode::<T>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(CodecError::from)
    }
}

// ============================================================================
// Token Codec
// ============================================================================

/// Issues and parses access and refresh tokens.
///
/// The codec holds only immutable keys and lifetimes, so it is `Send + Sync`
/// and can be shared across tasks behind an `Arc`.
pub struct TokenCodec {
    access: SigningSecret,
    refresh: SigningSecret,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenCodec {
    /// Creates a codec from the two secrets and token lifetimes.
    #[must_use]
    pub fn new(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access: SigningSecret::new(access_secret),
            refresh: SigningSecret::new(refresh_secret),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Returns the access token lifetime.
    #[must_use]
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Returns the refresh token lifetime.
    #[must_use]
    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Issues an access token for `subject`, valid from now.
    ///
    /// # Errors
    /// Returns `RandomnessFailure` or `SigningFailure`.
    pub fn issue_access(&self, subject: &str) -> Result<AccessToken, CodecError> {
        self.issue_access_at(subject, OffsetDateTime::now_utc())
    }

    /// Issues an access token for `subject` as if it were `now`.
    ///
    /// # Errors
    /// Returns `RandomnessFailure` or `SigningFailure`.
    pub fn issue_access_at(
        &self,
        subject: &str,
        now: OffsetDateTime,
    ) -> Result<AccessToken, CodecError> {
        let claims = AccessTokenClaims {
            sub: subject.to_string(),
            jti: generate_token_id()?,
            iat: now.unix_timestamp(),
            exp: expiry(now, self.access_ttl)?,
        };
        let signed = self.access.sign(&claims)?;
        AccessToken::from_claims(claims, signed)
    }

    /// Issues a refresh token bound to the given access token id.
    ///
    /// # Errors
    /// Returns `RandomnessFailure` or `SigningFailure`.
    pub fn issue_refresh(&self, access_token_id: &str) -> Result<RefreshToken, CodecError> {
        self.issue_refresh_at(access_token_id, OffsetDateTime::now_utc())
    }

    /// Issues a refresh token bound to `access_token_id` as if it were `now`.
    ///
    /// # Errors
    /// Returns `RandomnessFailure` or `SigningFailure`.
    pub fn issue_refresh_at(
        &self,
        access_token_id: &str,
        now: OffsetDateTime,
    ) -> Result<RefreshToken, CodecError> {
        let claims = RefreshTokenClaims {
            jti: generate_token_id()?,
            iat: now.unix_timestamp(),
            exp: expiry(now, self.refresh_ttl)?,
            ati: access_token_id.to_string(),
        };
        let signed = self.refresh.sign(&claims)?;
        RefreshToken::from_claims(claims, signed)
    }

    /// Parses and fully validates an access token.
    ///
    /// # Errors
    /// Returns `Malformed`, `InvalidSignatureMethod`, `InvalidSignature` or
    /// `Expired`.
    pub fn parse_access(&self, token: &str) -> Result<AccessToken, CodecError> {
        let claims = self.access.verify::<AccessTokenClaims>(token, false)?;
        AccessToken::from_claims(claims, token.to_string())
    }

    /// Parses an access token without checking expiration.
    ///
    /// Only the refresh flow uses this: replacing an expired access token is
    /// the purpose of a refresh. Algorithm, signature and structure are still
    /// verified.
    ///
    /// # Errors
    /// Returns `Malformed`, `InvalidSignatureMethod` or `InvalidSignature`.
    pub fn parse_access_allow_expired(&self, token: &str) -> Result<AccessToken, CodecError> {
        let claims = self.access.verify::<AccessTokenClaims>(token, true)?;
        AccessToken::from_claims(claims, token.to_string())
    }

    /// Parses and fully validates a refresh token.
    ///
    /// # Errors
    /// Returns `Malformed`, `InvalidSignatureMethod`, `InvalidSignature` or
    /// `Expired`.
    pub fn parse_refresh(&self, token: &str) -> Result<RefreshToken, CodecError> {
        let claims = self.refresh.verify::<RefreshTokenClaims>(token, false)?;
        RefreshToken::from_claims(claims, token.to_string())
    }
}

// ============================================================================
// Tests
// ============================================================================
