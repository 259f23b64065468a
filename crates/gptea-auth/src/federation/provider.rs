//! Supported identity providers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CredentialError;

/// Naver profile endpoint.
pub const NAVER_PROFILE_URL: &str = "https://openapi.naver.com/v1/nid/me";

/// Kakao profile endpoint.
pub const KAKAO_PROFILE_URL: &str = "https://kapi.kakao.com/v2/user/me";

/// The closed set of identity providers a credential can come from.
///
/// Names are matched case-sensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialProvider {
    /// Naver login.
    Naver,
    /// Kakao login.
    Kakao,
}

impl CredentialProvider {
    /// All supported providers.
    pub const ALL: [Self; 2] = [Self::Naver, Self::Kakao];

    /// Returns the provider name as stored with credentials.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Naver => "naver",
            Self::Kakao => "kakao",
        }
    }

    /// Returns the provider's public profile endpoint.
    #[must_use]
    pub fn default_profile_url(&self) -> &'static str {
        match self {
            Self::Naver => NAVER_PROFILE_URL,
            Self::Kakao => KAKAO_PROFILE_URL,
        }
    }
}

impl fmt::Display for CredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CredentialProvider {
    type Err = CredentialError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| CredentialError::unknown_provider(s))
    }
}
