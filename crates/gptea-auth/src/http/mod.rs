//! HTTP handlers for the session endpoints.
//!
//! This module provides Axum handlers; mounting them is up to the
//! application.
//!
//! # Available Handlers
//!
//! - [`register_handler`] - `POST /auth/cred/register`
//! - [`sign_in_handler`] - `POST /auth/cred/sign-in`
//! - [`refresh_handler`] - `POST /auth/token/refresh`
//! - [`logout_handler`] - `DELETE /auth/cred/logout`

pub mod session;

pub use session::{
    CredentialRequest, MessageResponse, SessionState, TokenResponse, logout_handler,
    refresh_handler, register_handler, sign_in_handler,
};
