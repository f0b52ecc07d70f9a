//! Database connection management and SeaORM repositories.

mod connections;
mod sql_base;
pub mod sql_repo;

pub mod entity;

pub use connections::DatabaseConfig;
pub use sql_repo::{SqlPostRepository, SqlUserRepository};
