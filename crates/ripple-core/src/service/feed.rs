//! Post creation and feed reads.

use std::sync::Arc;

use crate::domain::{FeedItem, Post, SessionIdentity, User};
use crate::error::DomainError;
use crate::ports::{PostRepository, UserRepository};

/// Feed service - persists posts and materializes feed snapshots.
///
/// Broadcasting is not this service's job: the caller publishes the
/// returned item after the commit, best effort.
pub struct FeedService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl FeedService {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    /// Persist a new post on behalf of an authenticated identity and return
    /// it materialized with the author's username. A blank title collapses
    /// to no title.
    pub async fn create_post(
        &self,
        identity: &SessionIdentity,
        content: &str,
        title: Option<&str>,
    ) -> Result<FeedItem, DomainError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DomainError::Validation(
                "Post content cannot be empty".to_string(),
            ));
        }

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned);

        let post = Post::new(identity.user_id, title, content.to_owned());
        let saved = self.posts.insert(post).await?;

        Ok(FeedItem::new(saved, identity.username.clone()))
    }

    /// A point-in-time snapshot of the most recent posts, newest first.
    /// Each call issues a fresh query.
    pub async fn feed(&self, limit: u64) -> Result<Vec<FeedItem>, DomainError> {
        Ok(self.posts.recent_with_authors(limit).await?)
    }

    /// One author's posts, newest first.
    pub async fn posts_by_author(
        &self,
        username: &str,
    ) -> Result<(User, Vec<FeedItem>), DomainError> {
        let Some(user) = self.users.find_by_username(username).await? else {
            return Err(DomainError::NotFound { entity: "user" });
        };

        let posts = self.posts.find_by_user_id(user.id).await?;
        let items = posts
            .into_iter()
            .map(|post| FeedItem::new(post, user.username.clone()))
            .collect();

        Ok((user, items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::AuthService;
    use crate::service::testutil::{InMemoryPosts, InMemoryUsers, PlainPasswords};

    struct Fixture {
        auth: AuthService,
        feed: FeedService,
        posts: Arc<InMemoryPosts>,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUsers::default());
        let posts = Arc::new(InMemoryPosts::new(users.clone()));
        Fixture {
            auth: AuthService::new(users.clone(), Arc::new(PlainPasswords)),
            feed: FeedService::new(users, posts.clone()),
            posts,
        }
    }

    async fn login_as(fx: &Fixture, username: &str) -> SessionIdentity {
        fx.auth
            .register(username, &format!("{username}@x.com"), "pw123")
            .await
            .unwrap();
        fx.auth.login(username, "pw123").await.unwrap()
    }

    #[tokio::test]
    async fn create_post_returns_materialized_item() {
        let fx = fixture();
        let alice = login_as(&fx, "alice").await;

        let item = fx
            .feed
            .create_post(&alice, "  hello world  ", None)
            .await
            .unwrap();

        assert_eq!(item.content, "hello world");
        assert_eq!(item.username, "alice");
        assert!(item.title.is_none());
    }

    #[tokio::test]
    async fn blank_content_persists_nothing() {
        let fx = fixture();
        let alice = login_as(&fx, "alice").await;

        let err = fx.feed.create_post(&alice, "   \t ", None).await.unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(fx.posts.len(), 0);
    }

    #[tokio::test]
    async fn blank_title_collapses_to_none() {
        let fx = fixture();
        let alice = login_as(&fx, "alice").await;

        let untitled = fx.feed.create_post(&alice, "one", Some("  ")).await.unwrap();
        let titled = fx
            .feed
            .create_post(&alice, "two", Some(" First! "))
            .await
            .unwrap();

        assert!(untitled.title.is_none());
        assert_eq!(titled.title.as_deref(), Some("First!"));
    }

    #[tokio::test]
    async fn feed_returns_newest_first_capped_at_limit() {
        let fx = fixture();
        let alice = login_as(&fx, "alice").await;

        for n in 0..5 {
            fx.feed
                .create_post(&alice, &format!("post {n}"), None)
                .await
                .unwrap();
        }

        let items = fx.feed.feed(3).await.unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].content, "post 4");
        assert_eq!(items[1].content, "post 3");
        assert_eq!(items[2].content, "post 2");
        for pair in items.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn feed_snapshot_is_reinvocable() {
        let fx = fixture();
        let alice = login_as(&fx, "alice").await;
        fx.feed.create_post(&alice, "only", None).await.unwrap();

        let first = fx.feed.feed(20).await.unwrap();
        let second = fx.feed.feed(20).await.unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(first[0].id, second[0].id);
    }

    #[tokio::test]
    async fn unknown_author_is_not_found() {
        let fx = fixture();

        let err = fx.feed.posts_by_author("nobody").await.unwrap_err();

        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn author_page_lists_only_their_posts_newest_first() {
        let fx = fixture();
        let alice = login_as(&fx, "alice").await;
        let bob = login_as(&fx, "bob").await;

        fx.feed.create_post(&alice, "a1", None).await.unwrap();
        fx.feed.create_post(&bob, "b1", None).await.unwrap();
        fx.feed.create_post(&alice, "a2", None).await.unwrap();

        let (user, items) = fx.feed.posts_by_author("alice").await.unwrap();

        assert_eq!(user.username, "alice");
        assert_eq!(
            items.iter().map(|i| i.content.as_str()).collect::<Vec<_>>(),
            vec!["a2", "a1"]
        );
    }

    // The end-to-end happy path: register alice, login, post "hello world",
    // and the feed holds exactly that post.
    #[tokio::test]
    async fn hello_world_scenario() {
        let fx = fixture();

        fx.auth
            .register("alice", "alice@x.com", "pw123")
            .await
            .unwrap();
        let alice = fx.auth.login("alice", "pw123").await.unwrap();
        fx.feed
            .create_post(&alice, "hello world", None)
            .await
            .unwrap();

        let items = fx.feed.feed(20).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].content, "hello world");
        assert_eq!(items[0].username, "alice");
    }
}
