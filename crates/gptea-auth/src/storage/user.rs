//! User directory trait.

use async_trait::async_trait;

use crate::AuthResult;
use crate::federation::CredentialProvider;

/// Maps federated credentials to internal user ids.
///
/// Each `(provider, external_id)` pair belongs to at most one user.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds the user owning a credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_user_id(
        &self,
        provider: CredentialProvider,
        external_id: &str,
    ) -> AuthResult<Option<String>>;

    /// Creates `user_id` and attaches the credential to it.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the credential is already registered, or a
    /// storage error.
    async fn register(
        &self,
        user_id: &str,
        provider: CredentialProvider,
        external_id: &str,
    ) -> AuthResult<()>;
}
