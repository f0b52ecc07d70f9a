use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{FeedItem, Post, User};
use crate::error::RepoError;

/// Generic repository trait. Users and posts are immutable once created,
/// so the write surface is insert-only.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity and return the persisted row.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific lookups.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// The most recent posts joined with their authors' usernames,
    /// newest first, ties broken deterministically by id.
    async fn recent_with_authors(&self, limit: u64) -> Result<Vec<FeedItem>, RepoError>;

    /// One author's posts, newest first.
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError>;
}
