//! Data Transfer Objects - form, API, and realtime payload types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ripple_core::domain::FeedItem;

/// Display format for post timestamps, shared by pages and realtime events.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Registration form body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login form body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Create-post form body. The title is the optional variant of the post
/// entity; an empty field reads as no title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// A post as rendered to clients: pages, the create-post response, and the
/// `new_post` / `feed_update` realtime events all carry this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPayload {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    pub username: String,
    pub timestamp: String,
}

impl From<FeedItem> for PostPayload {
    fn from(item: FeedItem) -> Self {
        Self {
            id: item.id,
            title: item.title,
            content: item.content,
            username: item.username,
            timestamp: item.created_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }
}

/// Response for a successful post creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostResponse {
    pub success: bool,
    pub post: PostPayload,
}

impl CreatePostResponse {
    pub fn new(post: PostPayload) -> Self {
        Self {
            success: true,
            post,
        }
    }
}

/// Acknowledgment sent to a connecting realtime client that holds an
/// authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionResponse {
    pub status: String,
}

impl ConnectionResponse {
    pub fn connected() -> Self {
        Self {
            status: "connected".to_string(),
        }
    }
}

/// Feed snapshot pushed in response to a `request_feed` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedUpdate {
    pub posts: Vec<PostPayload>,
}

impl FeedUpdate {
    pub fn new(items: Vec<FeedItem>) -> Self {
        Self {
            posts: items.into_iter().map(PostPayload::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    #[test]
    fn payload_timestamp_uses_the_display_format() {
        let item = FeedItem {
            id: Uuid::new_v4(),
            title: None,
            content: "hello world".to_string(),
            username: "alice".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 7, 59).unwrap(),
        };

        let payload = PostPayload::from(item);

        assert_eq!(payload.timestamp, "2024-05-01 09:07");
    }
}
