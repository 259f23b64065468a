//! Storage traits for authentication data.
//!
//! This module defines storage interfaces for:
//!
//! - User sessions (current refresh token id per user)
//! - Federated credential to user id mapping
//!
//! # Implementations
//!
//! - [`memory`] - In-process stores for tests and single-node setups
//! - `gptea-auth-postgres` - PostgreSQL storage backend

pub mod memory;
pub mod session;
pub mod user;

pub use memory::{InMemorySessionStore, InMemoryUserDirectory};
pub use session::SessionStore;
pub use user::UserDirectory;
