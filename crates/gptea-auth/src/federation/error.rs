//! Error types for external credential verification.

/// Errors that can occur while verifying a third-party credential.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The provider name is not one of the supported providers.
    #[error("Unknown credential provider: {0}")]
    UnknownProvider(String),

    /// The provider could not be reached (transport failure or timeout).
    #[error("Provider {provider} unreachable: {message}")]
    ProviderUnreachable {
        /// The provider name.
        provider: String,
        /// Description of the transport failure.
        message: String,
    },

    /// The provider answered with a non-success status.
    #[error("Provider {provider} rejected the credential with status {status}")]
    ProviderRejected {
        /// The provider name.
        provider: String,
        /// HTTP status returned by the provider.
        status: u16,
    },

    /// The provider profile carried no usable identifier.
    #[error("Provider {provider} returned an incomplete profile: {message}")]
    ProfileIncomplete {
        /// The provider name.
        provider: String,
        /// Description of what was missing.
        message: String,
    },
}

impl CredentialError {
    /// Creates an `UnknownProvider` error.
    #[must_use]
    pub fn unknown_provider(name: impl Into<String>) -> Self {
        Self::UnknownProvider(name.into())
    }

    /// Creates a `ProviderUnreachable` error.
    #[must_use]
    pub fn provider_unreachable(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderUnreachable {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Creates a `ProviderRejected` error.
    #[must_use]
    pub fn provider_rejected(provider: impl Into<String>, status: u16) -> Self {
        Self::ProviderRejected {
            provider: provider.into(),
            status,
        }
    }

    /// Creates a `ProfileIncomplete` error.
    #[must_use]
    pub fn profile_incomplete(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProfileIncomplete {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the failure lies with the provider or the network
    /// rather than with the presented credential.
    #[must_use]
    pub fn is_external_error(&self) -> bool {
        matches!(self, Self::ProviderUnreachable { .. })
    }

    /// Returns the machine-readable error code exposed in HTTP bodies.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownProvider(_) => "unknown_provider",
            Self::ProviderUnreachable { .. } => "provider_unreachable",
            Self::ProviderRejected { .. } => "invalid_credential",
            Self::ProfileIncomplete { .. } => "invalid_credential",
        }
    }
}
