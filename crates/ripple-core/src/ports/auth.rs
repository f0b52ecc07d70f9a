//! Authentication ports.

use crate::domain::SessionIdentity;

/// Session token service - seals an identity into an opaque, expiring
/// token carried by the session cookie.
pub trait TokenService: Send + Sync {
    /// Issue a session token for an authenticated identity.
    fn issue(&self, identity: &SessionIdentity) -> Result<String, AuthError>;

    /// Validate a token and recover the identity it carries.
    fn validate(&self, token: &str) -> Result<SessionIdentity, AuthError>;

    /// Lifetime of issued tokens, in seconds.
    fn ttl_seconds(&self) -> i64;
}

/// Password hashing service.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("No session attached to the request")]
    MissingSession,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
