//! In-memory storage backed by `DashMap`.
//!
//! Data lives only as long as the process. Each operation touches a single
//! map entry under its shard lock, so upserts are atomic per user.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{SessionStore, UserDirectory};
use crate::AuthResult;
use crate::error::AuthError;
use crate::federation::CredentialProvider;

/// Session store keeping one refresh token id per user.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: DashMap<String, String>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if no user has a session.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Returns the user's current refresh token id.
    #[must_use]
    pub fn current(&self, user_id: &str) -> Option<String> {
        self.sessions.get(user_id).map(|entry| entry.value().clone())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn exists(&self, user_id: &str, refresh_token_id: &str) -> AuthResult<bool> {
        Ok(self
            .sessions
            .get(user_id)
            .is_some_and(|current| current.value() == refresh_token_id))
    }

    async fn upsert(&self, user_id: &str, refresh_token_id: &str) -> AuthResult<()> {
        self.sessions
            .insert(user_id.to_string(), refresh_token_id.to_string());
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> AuthResult<bool> {
        Ok(self.sessions.remove(user_id).is_some())
    }
}

/// User directory keyed by `(provider, external_id)`.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    credentials: DashMap<(CredentialProvider, String), String>,
}

impl InMemoryUserDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user_id(
        &self,
        provider: CredentialProvider,
        external_id: &str,
    ) -> AuthResult<Option<String>> {
        Ok(self
            .credentials
            .get(&(provider, external_id.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn register(
        &self,
        user_id: &str,
        provider: CredentialProvider,
        external_id: &str,
    ) -> AuthResult<()> {
        match self.credentials.entry((provider, external_id.to_string())) {
            Entry::Occupied(_) => Err(AuthError::conflict(format!(
                "{provider} credential already registered"
            ))),
            Entry::Vacant(entry) => {
                entry.insert(user_id.to_string());
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn test_upsert_then_exists() {
        let store = InMemorySessionStore::new();
        store.upsert("u1", "r1").await.unwrap();

        assert!(store.exists("u1", "r1").await.unwrap());
        assert!(!store.exists("u1", "r2").await.unwrap());
        assert!(!store.exists("u2", "r1").await.unwrap());
    }

    #[tokio::test]
    async fn test_upsert_replaces_previous_id() {
        let store = InMemorySessionStore::new();
        store.upsert("u1", "r1").await.unwrap();
        store.upsert("u1", "r2").await.unwrap();

        assert!(!store.exists("u1", "r1").await.unwrap());
        assert!(store.exists("u1", "r2").await.unwrap());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_is_idempotent() {
        let store = InMemorySessionStore::new();
        store.upsert("u1", "r1").await.unwrap();
        store.upsert("u1", "r1").await.unwrap();

        assert!(store.exists("u1", "r1").await.unwrap());
        assert_eq!(store.current("u1").as_deref(), Some("r1"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = InMemorySessionStore::new();
        store.upsert("u1", "r1").await.unwrap();
        store.upsert("u2", "r9").await.unwrap();

        assert!(store.delete("u1").await.unwrap());
        assert!(!store.delete("u1").await.unwrap());
        assert!(!store.exists("u1", "r1").await.unwrap());
        assert!(store.exists("u2", "r9").await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_upserts_leave_one_winner() {
        let store = Arc::new(InMemorySessionStore::new());

        let handles: Vec<_> = (0..32)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.upsert("u1", &format!("r{i}")).await })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.len(), 1);
        let winner = store.current("u1").unwrap();
        let matching = (0..32)
            .filter(|i| format!("r{i}") == winner)
            .count();
        assert_eq!(matching, 1);
        assert!(store.exists("u1", &winner).await.unwrap());
    }

    #[tokio::test]
    async fn test_register_and_find() {
        let directory = InMemoryUserDirectory::new();
        directory
            .register("user-1", CredentialProvider::Naver, "123")
            .await
            .unwrap();

        assert_eq!(
            directory
                .find_user_id(CredentialProvider::Naver, "123")
                .await
                .unwrap()
                .as_deref(),
            Some("user-1")
        );
        // Same external id at another provider is a different credential.
        assert!(
            directory
                .find_user_id(CredentialProvider::Kakao, "123")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_register_duplicate_credential_conflicts() {
        let directory = InMemoryUserDirectory::new();
        directory
            .register("user-1", CredentialProvider::Kakao, "42")
            .await
            .unwrap();

        let err = directory
            .register("user-2", CredentialProvider::Kakao, "42")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Conflict { .. }));
    }
}
