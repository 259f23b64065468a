//! Authentication configuration.
//!
//! This module provides the configuration types for token signing and
//! identity provider federation, plus a loader that merges an optional TOML
//! file with `GPTEA__`-prefixed environment overrides.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::federation::provider::{KAKAO_PROFILE_URL, NAVER_PROFILE_URL};

/// Longest accepted token lifetime (ten years).
pub const MAX_TOKEN_LIFETIME: Duration = Duration::from_secs(10 * 365 * 24 * 3600);

/// Root authentication configuration.
///
/// # Example (TOML)
///
/// ```toml
/// [tokens]
/// access_token_lifetime = "15m"
/// refresh_token_lifetime = "14d"
/// access_token_secret = "..."
/// refresh_token_secret = "..."
///
/// [federation]
/// request_timeout = "10s"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Token signing configuration.
    pub tokens: TokenConfig,

    /// External identity provider configuration.
    pub federation: FederationConfig,
}

/// Token lifetimes and signing secrets.
///
/// Access and refresh tokens are signed with independent HMAC secrets.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Access token lifetime.
    #[serde(with = "humantime_serde")]
    pub access_token_lifetime: Duration,

    /// Refresh token lifetime.
    #[serde(with = "humantime_serde")]
    pub refresh_token_lifetime: Duration,

    /// HMAC secret for access tokens.
    pub access_token_secret: String,

    /// HMAC secret for refresh tokens. Must differ from the access secret.
    pub refresh_token_secret: String,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            access_token_lifetime: Duration::from_secs(15 * 60), // 15 minutes
            refresh_token_lifetime: Duration::from_secs(14 * 24 * 3600), // 14 days
            access_token_secret: String::new(),
            refresh_token_secret: String::new(),
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_token_lifetime", &self.access_token_lifetime)
            .field("refresh_token_lifetime", &self.refresh_token_lifetime)
            .field("access_token_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .finish()
    }
}

/// Identity provider federation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FederationConfig {
    /// Timeout applied to every profile request.
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Naver profile endpoint.
    pub naver_profile_url: String,

    /// Kakao profile endpoint.
    pub kakao_profile_url: String,
}

impl Default for FederationConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            naver_profile_url: NAVER_PROFILE_URL.to_string(),
            kakao_profile_url: KAKAO_PROFILE_URL.to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value is invalid.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),

    /// The configuration sources could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    Load(String),
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if a token secret is empty, and
    /// `ConfigError::InvalidValue` if:
    /// - The two token secrets are equal
    /// - A token lifetime or the request timeout is zero
    /// - The refresh lifetime is not longer than the access lifetime
    /// - A token lifetime exceeds [`MAX_TOKEN_LIFETIME`]
    /// - A profile URL does not parse
    pub fn validate(&self) -> Result<(), ConfigError> {
        let tokens = &self.tokens;

        if tokens.access_token_secret.is_empty() {
            return Err(ConfigError::Missing(
                "tokens.access_token_secret".to_string(),
            ));
        }
        if tokens.refresh_token_secret.is_empty() {
            return Err(ConfigError::Missing(
                "tokens.refresh_token_secret".to_string(),
            ));
        }
        if tokens.access_token_secret == tokens.refresh_token_secret {
            return Err(ConfigError::InvalidValue(
                "access and refresh token secrets must differ".to_string(),
            ));
        }

        if tokens.access_token_lifetime.is_zero() {
            return Err(ConfigError::InvalidValue(
                "access_token_lifetime must be > 0".to_string(),
            ));
        }
        if tokens.refresh_token_lifetime <= tokens.access_token_lifetime {
            return Err(ConfigError::InvalidValue(
                "refresh_token_lifetime must be longer than access_token_lifetime".to_string(),
            ));
        }

        if tokens.refresh_token_lifetime > MAX_TOKEN_LIFETIME {
            return Err(ConfigError::InvalidValue(format!(
                "refresh_token_lifetime must not exceed {}",
                humantime_serde::re::humantime::format_duration(MAX_TOKEN_LIFETIME)
            )));
        }

        if self.federation.request_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "federation request_timeout must be > 0".to_string(),
            ));
        }
        for (name, value) in [
            ("naver_profile_url", &self.federation.naver_profile_url),
            ("kakao_profile_url", &self.federation.kakao_profile_url),
        ] {
            url::Url::parse(value).map_err(|e| {
                ConfigError::InvalidValue(format!("Invalid {name} '{value}': {e}"))
            })?;
        }

        Ok(())
    }
}

pub mod loader {
    //! Loads [`AuthConfig`] from a file and the environment.

    use super::{AuthConfig, ConfigError};
    use config::{Config, Environment, File};
    use std::path::Path;

    /// Default config file looked up when no path is given.
    pub const DEFAULT_CONFIG_FILE: &str = "gptea.toml";

    /// Loads and validates the configuration.
    ///
    /// Reads `path` (or `gptea.toml` in the working directory) if it exists,
    /// then applies environment overrides such as
    /// `GPTEA__TOKENS__ACCESS_TOKEN_SECRET=...`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source cannot be read or deserialized,
    /// or the validation error.
    pub fn load_config(path: Option<&Path>) -> Result<AuthConfig, ConfigError> {
        let path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));

        let mut builder = Config::builder();
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix("GPTEA")
                .prefix_separator("__")
                .try_parsing(true)
                .separator("__"),
        );

        let cfg = builder
            .build()
            .map_err(|e| ConfigError::Load(format!("config build error: {e}")))?;
        let merged: AuthConfig = cfg
            .try_deserialize()
            .map_err(|e| ConfigError::Load(format!("config deserialize error: {e}")))?;

        merged.validate()?;
        tracing::debug!(path = %path.display(), "Loaded auth configuration");
        Ok(merged)
    }
}
