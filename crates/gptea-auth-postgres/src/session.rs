//! Session storage for PostgreSQL.
//!
//! One row per user in `refresh_tokens` holds the id of the user's current
//! refresh token.

use sqlx_core::query::query;
use sqlx_core::query_scalar::query_scalar;

use crate::{PgPool, StorageResult};

// =============================================================================
// Session Storage
// =============================================================================

/// Session storage operations.
pub struct SessionStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> SessionStorage<'a> {
    /// Create a new session storage with a connection pool reference.
    #[must_use]
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Check whether `token_id` is the user's current refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn exists(&self, user_id: &str, token_id: &str) -> StorageResult<bool> {
        let exists: bool = query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM refresh_tokens WHERE user_id = $1 AND token_id = $2
            )
            "#,
        )
        .bind(user_id)
        .bind(token_id)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Insert or replace the user's current refresh token id.
    ///
    /// A single statement, so concurrent calls for one user resolve
    /// last-write-wins.
    ///
    /// # Errors
    ///
    /// Returns an error if the database upsert fails.
    pub async fn upsert(&self, user_id: &str, token_id: &str) -> StorageResult<()> {
        query(
            r#"
            INSERT INTO refresh_tokens (user_id, token_id, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id) DO UPDATE
            SET token_id = EXCLUDED.token_id, updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user_id)
        .bind(token_id)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Delete the user's session row.
    ///
    /// # Returns
    ///
    /// Returns `true` if a row was deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, user_id: &str) -> StorageResult<bool> {
        let result = query("DELETE FROM refresh_tokens WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
