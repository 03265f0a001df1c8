use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Follow, Group, Post, User};
use crate::error::RepoError;
use crate::feed::FeedScope;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity (create or update).
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User lookups. Accounts are provisioned by the auth system, so this
/// port is read-only.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Batch lookup for rendering author names on a feed page.
    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Group repository.
#[async_trait]
pub trait GroupRepository: BaseRepository<Group, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError>;

    async fn list(&self) -> Result<Vec<Group>, RepoError>;
}

/// Post repository with the feed queries.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Total posts matching the scope.
    async fn count(&self, scope: FeedScope) -> Result<u64, RepoError>;

    /// One window of posts matching the scope, newest first
    /// (`published_at` descending, id descending as tiebreak).
    async fn page(&self, scope: FeedScope, offset: u64, limit: u64)
        -> Result<Vec<Post>, RepoError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn save(&self, comment: Comment) -> Result<Comment, RepoError>;

    /// Comments under a post, newest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError>;
}

/// Follow repository. The store holds at most one row per
/// (user, author) pair; `create` surfaces a duplicate as
/// [`RepoError::Constraint`].
#[async_trait]
pub trait FollowRepository: Send + Sync {
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;

    async fn create(&self, follow: Follow) -> Result<Follow, RepoError>;

    /// Remove a follow edge. Returns whether a row was deleted.
    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError>;
}
