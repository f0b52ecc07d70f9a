//! Feed broadcast channel - fan-out of committed posts to the realtime
//! layer.
//!
//! Single-process and single-channel: the write path publishes each
//! committed post, and the realtime listener re-emits it to connected
//! sockets. Delivery is best effort - a post published while no subscriber
//! is live is dropped, never replayed, and a lagging subscriber loses the
//! oldest entries.

use tokio::sync::broadcast;

use ripple_core::domain::FeedItem;

/// Broadcast channel for newly committed posts.
#[derive(Clone)]
pub struct FeedChannel {
    sender: broadcast::Sender<FeedItem>,
}

impl FeedChannel {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Push a committed post to every live subscriber. Returns the number
    /// of subscribers it reached; zero means the post was dropped here and
    /// readers catch up on their next feed snapshot.
    pub fn publish(&self, item: FeedItem) -> usize {
        match self.sender.send(item) {
            Ok(count) => {
                tracing::debug!(subscribers = count, "Post broadcast");
                count
            }
            Err(_) => {
                tracing::debug!("No live subscribers, post broadcast dropped");
                0
            }
        }
    }

    /// Register a new subscriber. Only posts published after this call are
    /// delivered.
    pub fn subscribe(&self) -> broadcast::Receiver<FeedItem> {
        self.sender.subscribe()
    }
}

impl Default for FeedChannel {
    fn default() -> Self {
        Self::new(100)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn item(content: &str) -> FeedItem {
        FeedItem {
            id: Uuid::new_v4(),
            title: None,
            content: content.to_string(),
            username: "alice".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn live_subscriber_receives_published_post() {
        let channel = FeedChannel::default();
        let mut posts = channel.subscribe();

        channel.publish(item("hello"));

        let received = posts.recv().await.unwrap();
        assert_eq!(received.content, "hello");
        assert_eq!(received.username, "alice");
    }

    #[tokio::test]
    async fn post_published_before_subscribe_is_not_replayed() {
        let channel = FeedChannel::default();

        assert_eq!(channel.publish(item("missed")), 0);

        let mut posts = channel.subscribe();
        channel.publish(item("seen"));

        // Only the post-subscribe message arrives.
        let received = posts.recv().await.unwrap();
        assert_eq!(received.content, "seen");
        assert!(posts.try_recv().is_err());
    }

    #[tokio::test]
    async fn every_live_subscriber_receives_the_same_post() {
        let channel = FeedChannel::default();
        let mut first = channel.subscribe();
        let mut second = channel.subscribe();

        let delivered = channel.publish(item("fan-out"));

        assert_eq!(delivered, 2);
        assert_eq!(first.recv().await.unwrap().content, "fan-out");
        assert_eq!(second.recv().await.unwrap().content, "fan-out");
    }
}
