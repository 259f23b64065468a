//! User and credential storage for PostgreSQL.

use sqlx_core::query::query;
use sqlx_core::query_scalar::query_scalar;

use crate::{PgPool, StorageError, StorageResult, is_unique_violation};

// =============================================================================
// User Storage
// =============================================================================

/// User storage operations over `users` and `user_credentials`.
pub struct UserStorage<'a> {
    pool: &'a PgPool,
}

impl<'a> UserStorage<'a> {
    /// Create a new user storage with a connection pool reference.
    #[must_use]
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Find the user owning a credential.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_user_id(
        &self,
        credential_type: &str,
        credential_id: &str,
    ) -> StorageResult<Option<String>> {
        let user_id: Option<String> = query_scalar(
            r#"
            SELECT user_id FROM user_credentials
            WHERE credential_type = $1 AND credential_id = $2
            "#,
        )
        .bind(credential_type)
        .bind(credential_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user_id)
    }

    /// Create a user and attach a credential to it in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the user or credential already
    /// exists, or a database error.
    pub async fn register(
        &self,
        user_id: &str,
        credential_type: &str,
        credential_id: &str,
    ) -> StorageResult<()> {
        let mut tx = self.pool.begin().await?;

        query("INSERT INTO users (id, created_at) VALUES ($1, NOW())")
            .bind(user_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| conflict_or_database(e, "user already exists"))?;

        query(
            r#"
            INSERT INTO user_credentials (user_id, credential_type, credential_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user_id)
        .bind(credential_type)
        .bind(credential_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| conflict_or_database(e, "credential already registered"))?;

        tx.commit().await?;
        Ok(())
    }
}

fn conflict_or_database(err: sqlx_core::Error, message: &str) -> StorageError {
    if is_unique_violation(&err) {
        StorageError::conflict(message)
    } else {
        StorageError::Database(err)
    }
}
