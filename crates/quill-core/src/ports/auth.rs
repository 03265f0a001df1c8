//! Session verification port. Accounts and credentials live in the
//! external auth system; this side only issues and checks session tokens.

use uuid::Uuid;

/// Claims carried by a session token.
#[derive(Debug, Clone)]
pub struct SessionClaims {
    pub user_id: Uuid,
    pub username: String,
    pub exp: i64,
}

/// Session token service.
pub trait SessionService: Send + Sync {
    /// Issue a session token for a signed-in user.
    fn issue(&self, user_id: Uuid, username: &str) -> Result<String, AuthError>;

    /// Validate and decode a session token.
    fn verify(&self, token: &str) -> Result<SessionClaims, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing session")]
    MissingAuth,

    #[error("Session expired")]
    TokenExpired,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),
}
