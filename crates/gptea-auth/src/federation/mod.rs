//! External identity provider federation.
//!
//! A user proves their identity by presenting a bearer token issued by one of
//! the supported providers. This module checks that token against the
//! provider's profile endpoint and normalizes the answer to a
//! `(provider, external_id)` pair.
//!
//! - [`CredentialProvider`] - The closed set of supported providers
//! - [`CredentialVerifier`] - Per-provider verification
//! - [`CredentialVerifiers`] - Selects a verifier by provider name

pub mod error;
pub mod provider;
pub mod verifier;

pub use error::CredentialError;
pub use provider::{CredentialProvider, KAKAO_PROFILE_URL, NAVER_PROFILE_URL};
pub use verifier::{
    CredentialVerifier, CredentialVerifiers, KakaoCredential, NaverCredential, VerifyResult,
};
