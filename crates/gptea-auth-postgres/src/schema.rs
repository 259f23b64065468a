//! Table definitions for the auth storage.

use sqlx_core::query::query;

use crate::{PgPool, StorageResult};

/// DDL statements, applied in order. Each is idempotent.
pub const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id          TEXT PRIMARY KEY,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_credentials (
        user_id          TEXT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        credential_type  TEXT NOT NULL,
        credential_id    TEXT NOT NULL,
        UNIQUE (credential_type, credential_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS refresh_tokens (
        user_id     TEXT PRIMARY KEY REFERENCES users (id) ON DELETE CASCADE,
        token_id    TEXT NOT NULL,
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
];

/// Creates the auth tables if they do not exist.
///
/// # Errors
///
/// Returns an error if a statement fails.
pub async fn ensure_schema(pool: &PgPool) -> StorageResult<()> {
    for statement in SCHEMA {
        query(statement).execute(pool).await?;
    }
    tracing::debug!("Auth schema ensured");
    Ok(())
}
