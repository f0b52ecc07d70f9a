//! Domain services - use cases wired against the ports.

mod auth;
mod feed;

pub use auth::AuthService;
pub use feed::FeedService;

#[cfg(test)]
pub(crate) mod testutil {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::domain::{FeedItem, Post, User};
    use crate::error::RepoError;
    use crate::ports::{BaseRepository, PasswordService, PostRepository, UserRepository};

    /// In-memory user store for service tests.
    #[derive(Default)]
    pub struct InMemoryUsers {
        rows: Mutex<Vec<User>>,
    }

    impl InMemoryUsers {
        pub fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl BaseRepository<User, Uuid> for InMemoryUsers {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
            Ok(self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned())
        }

        async fn insert(&self, entity: User) -> Result<User, RepoError> {
            let mut rows = self.rows.lock().unwrap();
            if rows
                .iter()
                .any(|u| u.username == entity.username || u.email == entity.email)
            {
                return Err(RepoError::Constraint("unique violation".to_string()));
            }
            rows.push(entity.clone());
            Ok(entity)
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUsers {
        async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.username == username)
                .cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }
    }

    /// In-memory post store. Holds the user store so joins can resolve
    /// author usernames the way the SQL repository does.
    pub struct InMemoryPosts {
        rows: Mutex<Vec<Post>>,
        users: Arc<InMemoryUsers>,
    }

    impl InMemoryPosts {
        pub fn new(users: Arc<InMemoryUsers>) -> Self {
            Self {
                rows: Mutex::new(Vec::new()),
                users,
            }
        }

        pub fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        fn sorted_desc(&self) -> Vec<Post> {
            let mut rows = self.rows.lock().unwrap().clone();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
            rows
        }
    }

    #[async_trait]
    impl BaseRepository<Post, Uuid> for InMemoryPosts {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
            Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
        }

        async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
            self.rows.lock().unwrap().push(entity.clone());
            Ok(entity)
        }
    }

    #[async_trait]
    impl PostRepository for InMemoryPosts {
        async fn recent_with_authors(&self, limit: u64) -> Result<Vec<FeedItem>, RepoError> {
            let users = self.users.rows.lock().unwrap();
            Ok(self
                .sorted_desc()
                .into_iter()
                .take(limit as usize)
                .filter_map(|post| {
                    let username = users
                        .iter()
                        .find(|u| u.id == post.user_id)
                        .map(|u| u.username.clone())?;
                    Some(FeedItem::new(post, username))
                })
                .collect())
        }

        async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Post>, RepoError> {
            Ok(self
                .sorted_desc()
                .into_iter()
                .filter(|p| p.user_id == user_id)
                .collect())
        }
    }

    /// Transparent password service so tests stay fast and deterministic.
    pub struct PlainPasswords;

    impl PasswordService for PlainPasswords {
        fn hash(&self, password: &str) -> Result<String, crate::ports::AuthError> {
            Ok(format!("hashed:{password}"))
        }

        fn verify(&self, password: &str, hash: &str) -> Result<bool, crate::ports::AuthError> {
            Ok(hash == format!("hashed:{password}"))
        }
    }
}
