use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a short message published to the feed.
///
/// The timestamp is assigned when the entity is constructed, before the
/// insert, so feed order matches insertion order within one process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with generated ID and server-assigned timestamp.
    pub fn new(user_id: Uuid, title: Option<String>, content: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            content,
            created_at: Utc::now(),
        }
    }
}

/// A post joined with its author's username - the shape pages, the
/// create-post response, and broadcast events all use.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: Uuid,
    pub title: Option<String>,
    pub content: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl FeedItem {
    pub fn new(post: Post, username: String) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            username,
            created_at: post.created_at,
        }
    }
}
