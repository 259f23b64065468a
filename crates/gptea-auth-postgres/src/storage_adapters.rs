//! Arc-owning storage adapters implementing the `gptea-auth` storage traits.
//!
//! These adapters own a [`PostgresAuthStorage`] (an `Arc<PgPool>` inside) and
//! borrow the lifetime-based storage types from it per call, allowing them to
//! be used as `Arc<dyn SessionStore>` / `Arc<dyn UserDirectory>`.

use async_trait::async_trait;

use gptea_auth::federation::CredentialProvider;
use gptea_auth::storage::{SessionStore, UserDirectory};
use gptea_auth::{AuthError, AuthResult};

use crate::{PostgresAuthStorage, StorageError};

fn into_auth_error(err: StorageError) -> AuthError {
    match err {
        StorageError::Conflict(message) => AuthError::conflict(message),
        other => AuthError::storage(other.to_string()),
    }
}

// =============================================================================
// Arc-Owning Session Store
// =============================================================================

/// Arc-owning PostgreSQL session store adapter.
#[derive(Clone)]
pub struct ArcSessionStore {
    storage: PostgresAuthStorage,
}

impl ArcSessionStore {
    /// Create a new Arc-owning session store.
    #[must_use]
    pub fn new(storage: PostgresAuthStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl SessionStore for ArcSessionStore {
    async fn exists(&self, user_id: &str, refresh_token_id: &str) -> AuthResult<bool> {
        self.storage
            .sessions()
            .exists(user_id, refresh_token_id)
            .await
            .map_err(into_auth_error)
    }

    async fn upsert(&self, user_id: &str, refresh_token_id: &str) -> AuthResult<()> {
        self.storage
            .sessions()
            .upsert(user_id, refresh_token_id)
            .await
            .map_err(into_auth_error)
    }

    async fn delete(&self, user_id: &str) -> AuthResult<bool> {
        self.storage
            .sessions()
            .delete(user_id)
            .await
            .map_err(into_auth_error)
    }
}

// =============================================================================
// Arc-Owning User Directory
// =============================================================================

/// Arc-owning PostgreSQL user directory adapter.
#[derive(Clone)]
pub struct ArcUserDirectory {
    storage: PostgresAuthStorage,
}

impl ArcUserDirectory {
    /// Create a new Arc-owning user directory.
    #[must_use]
    pub fn new(storage: PostgresAuthStorage) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl UserDirectory for ArcUserDirectory {
    async fn find_user_id(
        &self,
        provider: CredentialProvider,
        external_id: &str,
    ) -> AuthResult<Option<String>> {
        self.storage
            .users()
            .find_user_id(provider.as_str(), external_id)
            .await
            .map_err(into_auth_error)
    }

    async fn register(
        &self,
        user_id: &str,
        provider: CredentialProvider,
        external_id: &str,
    ) -> AuthResult<()> {
        self.storage
            .users()
            .register(user_id, provider.as_str(), external_id)
            .await
            .map_err(into_auth_error)
    }
}
