//! Token issuance, validation, and rotation.
//!
//! This module provides:
//!
//! - [`codec`] - HMAC-signed encoding and decoding of access and refresh tokens
//! - [`service`] - The [`Authenticator`], which composes the codec into
//!   session issuance and pair rotation

pub mod codec;
pub mod service;

pub use codec::{
    AccessTokenClaims, CodecError, RefreshTokenClaims, TOKEN_ID_BYTES, TokenCodec, TokenKind,
    generate_token_id,
};
pub use service::Authenticator;
