//! PostgreSQL storage backend for gptea Auth
//!
//! Provides persistent storage for:
//!
//! - Users (`users`)
//! - Federated credentials attached to users (`user_credentials`)
//! - The current refresh token id per user (`refresh_tokens`)
//!
//! # Example
//!
//! ```ignore
//! use gptea_auth_postgres::PostgresAuthStorage;
//!
//! // Create storage with connection pool
//! let storage = PostgresAuthStorage::connect("postgres://localhost/gptea").await?;
//! storage.ensure_schema().await?;
//!
//! // Hand the trait objects to the session service
//! let sessions = Arc::new(storage.session_store());
//! let users = Arc::new(storage.user_directory());
//! ```

pub mod schema;
pub mod session;
pub mod storage_adapters;
pub mod user;

use std::sync::Arc;

use sqlx_core::pool::Pool;
use sqlx_postgres::Postgres;

/// PostgreSQL connection pool type alias.
pub type PgPool = Pool<Postgres>;

pub use session::SessionStorage;
pub use storage_adapters::{ArcSessionStore, ArcUserDirectory};
pub use user::UserStorage;

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur during auth storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx_core::Error),

    /// Resource already exists (conflict).
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl StorageError {
    /// Create a `Conflict` error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Returns `true` if `err` is a PostgreSQL unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx_core::Error) -> bool {
    matches!(err, sqlx_core::Error::Database(db) if db.is_unique_violation())
}

// =============================================================================
// PostgreSQL Auth Storage
// =============================================================================

/// PostgreSQL storage backend for authentication data.
///
/// This struct holds a connection pool and provides access to specialized
/// storage types for users and sessions.
#[derive(Debug, Clone)]
pub struct PostgresAuthStorage {
    pool: Arc<PgPool>,
}

impl PostgresAuthStorage {
    /// Create new storage with an existing connection pool.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create new storage by connecting to the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection fails.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        use sqlx_core::pool::PoolOptions;
        let pool = PoolOptions::<Postgres>::new().connect(database_url).await?;
        Ok(Self::new(Arc::new(pool)))
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the auth tables if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if a statement fails.
    pub async fn ensure_schema(&self) -> StorageResult<()> {
        schema::ensure_schema(&self.pool).await
    }

    // -------------------------------------------------------------------------
    // Storage Accessors
    // -------------------------------------------------------------------------

    /// Get session storage operations.
    #[must_use]
    pub fn sessions(&self) -> SessionStorage<'_> {
        SessionStorage::new(&self.pool)
    }

    /// Get user storage operations.
    #[must_use]
    pub fn users(&self) -> UserStorage<'_> {
        UserStorage::new(&self.pool)
    }

    /// Returns an owned session store usable as `Arc<dyn SessionStore>`.
    #[must_use]
    pub fn session_store(&self) -> ArcSessionStore {
        ArcSessionStore::new(self.clone())
    }

    /// Returns an owned user directory usable as `Arc<dyn UserDirectory>`.
    #[must_use]
    pub fn user_directory(&self) -> ArcUserDirectory {
        ArcUserDirectory::new(self.clone())
    }
}

// =============================================================================
// Tests
// =============================================================================
