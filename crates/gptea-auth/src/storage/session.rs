//! Session storage trait.
//!
//! A session is the single refresh token id a user currently holds. Storing
//! it server-side is what makes rotation revoke the previous refresh token:
//! a refresh is only honored while its id is the stored one.
//!
//! # Security Considerations
//!
//! - Only token ids are stored, never signed token text
//! - `upsert` must be atomic so concurrent logins cannot leave two sessions
//! - `delete` must take effect immediately

use async_trait::async_trait;

use crate::AuthResult;

/// Storage trait for the user → current refresh token id mapping.
///
/// There is at most one row per user. A new login or a rotation overwrites
/// it, which invalidates every refresh token issued before.
///
/// # Implementations
///
/// - [`InMemorySessionStore`](super::InMemorySessionStore) - process-local store
/// - `gptea-auth-postgres` - PostgreSQL storage backend
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns `true` if `refresh_token_id` is the user's current refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn exists(&self, user_id: &str, refresh_token_id: &str) -> AuthResult<bool>;

    /// Makes `refresh_token_id` the user's current refresh token.
    ///
    /// Inserts a row or replaces the existing one in a single atomic step.
    /// Concurrent calls for the same user resolve last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn upsert(&self, user_id: &str, refresh_token_id: &str) -> AuthResult<()>;

    /// Removes the user's session.
    ///
    /// # Returns
    ///
    /// Returns `true` if a session existed and was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn delete(&self, user_id: &str) -> AuthResult<bool>;
}
