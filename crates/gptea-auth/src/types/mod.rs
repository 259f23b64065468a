//! Common types used across the authentication modules.
//!
//! ## Domain Types
//!
//! - [`AccessToken`] - Short-lived proof of identity
//! - [`RefreshToken`] - Long-lived token permitting pair reissuance
//! - [`TokenPair`] - An access token and the refresh token bound to it

pub mod token;

pub use token::{AccessToken, RefreshToken, TokenPair};
