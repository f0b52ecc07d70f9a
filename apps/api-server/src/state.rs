//! Application state - shared across all handlers.

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use ripple_core::ports::{PasswordService, PostRepository, UserRepository};
use ripple_core::service::{AuthService, FeedService};
use ripple_infra::{Argon2PasswordService, FeedChannel, SqlPostRepository, SqlUserRepository};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub feed: Arc<FeedService>,
    pub feed_channel: FeedChannel,
    pub templates: tera::Tera,
    pub feed_page_size: u64,
    pub realtime_port: u16,
}

impl AppState {
    /// Connect the database, bring the schema up to date, and wire the
    /// services. The database is a hard dependency; failing to reach it
    /// fails startup.
    pub async fn new(config: &AppConfig) -> std::io::Result<Self> {
        let db = config
            .database
            .connect()
            .await
            .map_err(std::io::Error::other)?;

        Migrator::up(&db, None).await.map_err(std::io::Error::other)?;
        tracing::info!("Database schema is up to date");

        let users: Arc<dyn UserRepository> = Arc::new(SqlUserRepository::new(db.clone()));
        let posts: Arc<dyn PostRepository> = Arc::new(SqlPostRepository::new(db));
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService);

        let templates = tera::Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*"))
            .map_err(std::io::Error::other)?;

        tracing::info!("Application state initialized");

        Ok(Self {
            auth: Arc::new(AuthService::new(users.clone(), passwords)),
            feed: Arc::new(FeedService::new(users, posts)),
            feed_channel: FeedChannel::default(),
            templates,
            feed_page_size: config.feed_page_size,
            realtime_port: config.realtime_port,
        })
    }
}
