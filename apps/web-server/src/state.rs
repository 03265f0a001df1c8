//! Application state - shared across all handlers.

use std::sync::Arc;
use std::time::Duration;

use quill_core::feed::FeedService;
use quill_core::ports::{
    Cache, CommentRepository, FollowRepository, GroupRepository, PostRepository, SessionService,
    UserRepository,
};
use quill_infra::auth::JwtSessionService;
use quill_infra::cache::InMemoryCache;
use quill_infra::database::{
    DatabaseConnections, InMemoryStore, PostgresCommentRepository, PostgresFollowRepository,
    PostgresGroupRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
    pub feed: Arc<FeedService>,
    pub cache: Arc<dyn Cache>,
    pub sessions: Arc<dyn SessionService>,
    pub feed_cache_ttl: Duration,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let feed_cache_ttl = Duration::from_secs(config.feed_cache_ttl_secs);

        if let Some(db_config) = &config.database {
            match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let state = Self::with_postgres(&connections, config.page_size, feed_cache_ttl);
                    tracing::info!("Application state initialized");
                    return state;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to connect to database: {}. Using in-memory fallback.",
                        e
                    );
                }
            }
        } else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        }

        let state = Self::with_store(InMemoryStore::new(), config.page_size, feed_cache_ttl);
        tracing::info!("Application state initialized");
        state
    }

    fn with_postgres(
        connections: &DatabaseConnections,
        page_size: u64,
        feed_cache_ttl: Duration,
    ) -> Self {
        let db = connections.main.clone();
        let posts: Arc<dyn PostRepository> = Arc::new(PostgresPostRepository::new(db.clone()));

        Self {
            users: Arc::new(PostgresUserRepository::new(db.clone())),
            groups: Arc::new(PostgresGroupRepository::new(db.clone())),
            comments: Arc::new(PostgresCommentRepository::new(db.clone())),
            follows: Arc::new(PostgresFollowRepository::new(db)),
            feed: Arc::new(FeedService::new(posts.clone(), page_size)),
            posts,
            cache: Arc::new(InMemoryCache::new()),
            sessions: Arc::new(JwtSessionService::from_env()),
            feed_cache_ttl,
        }
    }

    /// State over one shared in-memory store; the dev fallback and the
    /// handler tests go through this.
    pub fn with_store(store: InMemoryStore, page_size: u64, feed_cache_ttl: Duration) -> Self {
        let posts: Arc<dyn PostRepository> = Arc::new(store.clone());

        Self {
            users: Arc::new(store.clone()),
            groups: Arc::new(store.clone()),
            comments: Arc::new(store.clone()),
            follows: Arc::new(store),
            feed: Arc::new(FeedService::new(posts.clone(), page_size)),
            posts,
            cache: Arc::new(InMemoryCache::new()),
            sessions: Arc::new(JwtSessionService::from_env()),
            feed_cache_ttl,
        }
    }
}
