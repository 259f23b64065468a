//! Authentication context types.

use time::OffsetDateTime;

use crate::types::AccessToken;

/// Identity established by a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Internal user id (the token subject).
    pub user_id: String,

    /// Id of the access token that authenticated the request.
    pub token_id: String,

    /// When the access token expires.
    pub expires_at: OffsetDateTime,
}

impl AuthContext {
    /// Returns the authenticated user id.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.user_id
    }
}

impl From<AccessToken> for AuthContext {
    fn from(token: AccessToken) -> Self {
        Self {
            user_id: token.subject,
            token_id: token.id,
            expires_at: token.expires_at,
        }
    }
}
