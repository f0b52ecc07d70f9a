//! # Ripple Infrastructure
//!
//! Concrete implementations of the ports defined in `ripple-core`:
//! SeaORM repositories, Argon2 password hashing, signed session tokens,
//! and the broadcast channel behind the realtime feed.

pub mod auth;
pub mod broadcast;
pub mod database;

pub use auth::{Argon2PasswordService, SessionConfig, SessionTokenService};
pub use broadcast::FeedChannel;
pub use database::{DatabaseConfig, SqlPostRepository, SqlUserRepository};
