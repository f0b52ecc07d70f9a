//! Password hashing and session token services.

mod password;
mod session;

pub use password::Argon2PasswordService;
pub use session::{SessionConfig, SessionTokenService};
