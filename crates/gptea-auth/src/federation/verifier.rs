//! Credential verification against provider profile endpoints.
//!
//! Each provider exposes a profile endpoint that, given the provider-issued
//! bearer token, returns the user's profile. A credential is valid when that
//! call succeeds and the profile carries a non-empty identifier.
//!
//! # Usage
//!
//! ```ignore
//! use gptea_auth::federation::CredentialVerifiers;
//!
//! let verifiers = CredentialVerifiers::new(&config.federation)?;
//! let result = verifiers.verify("naver", provider_token).await?;
//! println!("{}:{}", result.provider, result.external_id);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::CredentialError;
use super::provider::CredentialProvider;
use crate::AuthResult;
use crate::config::FederationConfig;
use crate::error::AuthError;

/// Outcome of a successful credential check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyResult {
    /// The provider that vouched for the credential.
    pub provider: CredentialProvider,
    /// Stable user identifier at that provider.
    pub external_id: String,
}

/// Verifies a bearer credential issued by one identity provider.
///
/// Implementations perform at most one network request and never retry.
/// Dropping the returned future cancels the request.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// The provider this verifier speaks to.
    fn provider(&self) -> CredentialProvider;

    /// Verifies `token` and returns the provider's identifier for its owner.
    ///
    /// # Errors
    ///
    /// - `ProviderUnreachable` on transport failure or timeout
    /// - `ProviderRejected` on a non-200 response
    /// - `ProfileIncomplete` if the profile has no usable identifier
    async fn verify(&self, token: &str) -> Result<VerifyResult, CredentialError>;
}

async fn fetch_profile<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    provider: CredentialProvider,
    token: &str,
) -> Result<T, CredentialError> {
    let response = client
        .get(url)
        .bearer_auth(token)
        .send()
        .await
        .map_err(|e| CredentialError::provider_unreachable(provider.as_str(), e.to_string()))?;

    let status = response.status();
    if status != StatusCode::OK {
        tracing::warn!(provider = %provider, status = status.as_u16(), "Provider rejected credential");
        return Err(CredentialError::provider_rejected(
            provider.as_str(),
            status.as_u16(),
        ));
    }

    response.json::<T>().await.map_err(|e| {
        if e.is_timeout() {
            CredentialError::provider_unreachable(provider.as_str(), e.to_string())
        } else {
            CredentialError::profile_incomplete(
                provider.as_str(),
                format!("undecodable profile: {e}"),
            )
        }
    })
}

// ============================================================================
// Naver
// ============================================================================

#[derive(Debug, Deserialize)]
struct NaverProfile {
    response: Option<NaverProfileBody>,
}

#[derive(Debug, Deserialize)]
struct NaverProfileBody {
    id: Option<String>,
}

/// Verifies Naver login tokens. The identifier is `response.id`.
#[derive(Debug, Clone)]
pub struct NaverCredential {
    client: reqwest::Client,
    profile_url: String,
}

impl NaverCredential {
    /// Creates a verifier calling `profile_url` with `client`.
    #[must_use]
    pub fn new(client: reqwest::Client, profile_url: impl Into<String>) -> Self {
        Self {
            client,
            profile_url: profile_url.into(),
        }
    }
}

#[async_trait]
impl CredentialVerifier for NaverCredential {
    fn provider(&self) -> CredentialProvider {
        CredentialProvider::Naver
    }

    async fn verify(&self, token: &str) -> Result<VerifyResult, CredentialError> {
        let profile: NaverProfile =
            fetch_profile(&self.client, &self.profile_url, self.provider(), token).await?;

        let external_id = profile
            .response
            .and_then(|body| body.id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CredentialError::profile_incomplete("naver", "missing response.id"))?;

        Ok(VerifyResult {
            provider: self.provider(),
            external_id,
        })
    }
}

// ============================================================================
// Kakao
// ============================================================================

#[derive(Debug, Deserialize)]
struct KakaoProfile {
    id: Option<i64>,
}

/// Verifies Kakao login tokens. The identifier is the integer `id`,
/// rendered in decimal.
#[derive(Debug, Clone)]
pub struct KakaoCredential {
    client: reqwest::Client,
    profile_url: String,
}

impl KakaoCredential {
    /// Creates a verifier calling `profile_url` with `client`.
    #[must_use]
    pub fn new(client: reqwest::Client, profile_url: impl Into<String>) -> Self {
        Self {
            client,
            profile_url: profile_url.into(),
        }
    }
}

#[async_trait]
impl CredentialVerifier for KakaoCredential {
    fn provider(&self) -> CredentialProvider {
        CredentialProvider::Kakao
    }

    async fn verify(&self, token: &str) -> Result<VerifyResult, CredentialError> {
        let profile: KakaoProfile =
            fetch_profile(&self.client, &self.profile_url, self.provider(), token).await?;

        let external_id = profile
            .id
            .filter(|id| *id != 0)
            .map(|id| id.to_string())
            .ok_or_else(|| CredentialError::profile_incomplete("kakao", "missing id"))?;

        Ok(VerifyResult {
            provider: self.provider(),
            external_id,
        })
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Selects the verifier for a provider name.
///
/// Built with one verifier per supported provider sharing a single HTTP
/// client. Individual verifiers can be replaced with [`Self::with_verifier`].
#[derive(Clone)]
pub struct CredentialVerifiers {
    verifiers: HashMap<CredentialProvider, Arc<dyn CredentialVerifier>>,
}

impl CredentialVerifiers {
    /// Creates verifiers for every provider from the federation config.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` if the HTTP client cannot be built.
    pub fn new(config: &FederationConfig) -> AuthResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AuthError::configuration(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self::empty()
            .with_verifier(Arc::new(NaverCredential::new(
                client.clone(),
                &config.naver_profile_url,
            )))
            .with_verifier(Arc::new(KakaoCredential::new(
                client,
                &config.kakao_profile_url,
            ))))
    }

    /// Creates a registry with no verifiers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            verifiers: HashMap::new(),
        }
    }

    /// Registers `verifier` for its provider, replacing any existing one.
    #[must_use]
    pub fn with_verifier(mut self, verifier: Arc<dyn CredentialVerifier>) -> Self {
        self.verifiers.insert(verifier.provider(), verifier);
        self
    }

    /// Returns the verifier for `name`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProvider` if `name` is not a supported provider or no
    /// verifier is registered for it. No network I/O happens in that case.
    pub fn verifier_for(&self, name: &str) -> Result<Arc<dyn CredentialVerifier>, CredentialError> {
        let provider: CredentialProvider = name.parse()?;
        self.verifiers
            .get(&provider)
            .cloned()
            .ok_or_else(|| CredentialError::unknown_provider(name))
    }

    /// Verifies `token` with the verifier for `name`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProvider` or the verifier's error.
    pub async fn verify(&self, name: &str, token: &str) -> Result<VerifyResult, CredentialError> {
        let verifier = self.verifier_for(name)?;
        let result = verifier.verify(token).await?;

        tracing::debug!(
            provider = %result.provider,
            external_id = %result.external_id,
            "Verified credential"
        );

        Ok(result)
    }
}
