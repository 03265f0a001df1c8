//! In-memory store - used as fallback when the database is unavailable
//! and as the backing store in handler tests.
//!
//! Mirrors the relational semantics of the Postgres schema: deleting a
//! group detaches its posts, deleting a post drops its comments, and the
//! (user, author) follow pair is unique.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Comment, Follow, Group, Post, User};
use quill_core::error::RepoError;
use quill_core::feed::FeedScope;
use quill_core::ports::{
    BaseRepository, CommentRepository, FollowRepository, GroupRepository, PostRepository,
    UserRepository,
};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    groups: Vec<Group>,
    posts: Vec<Post>,
    comments: Vec<Comment>,
    follows: Vec<Follow>,
}

/// All five repositories over one shared in-memory table set.
///
/// Note: data is lost on process restart.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts come from the auth system, so the user port is read-only;
    /// this is the seeding entry point for dev mode and tests.
    pub async fn insert_user(&self, user: User) {
        let mut inner = self.inner.write().await;
        inner.users.retain(|u| u.id != user.id);
        inner.users.push(user);
    }
}

fn scope_matches(scope: FeedScope, post: &Post, follows: &[Follow]) -> bool {
    match scope {
        FeedScope::All => true,
        FeedScope::Group(group_id) => post.group_id == Some(group_id),
        FeedScope::Author(author_id) => post.author_id == author_id,
        FeedScope::Following(viewer_id) => follows
            .iter()
            .any(|f| f.user_id == viewer_id && f.author_id == post.author_id),
    }
}

/// Newest first; ids break ties so the order is stable across calls.
fn feed_order(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.published_at
            .cmp(&a.published_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Group, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.groups.iter().find(|g| g.id == id).cloned())
    }

    async fn save(&self, group: Group) -> Result<Group, RepoError> {
        let mut inner = self.inner.write().await;
        if inner
            .groups
            .iter()
            .any(|g| g.slug == group.slug && g.id != group.id)
        {
            return Err(RepoError::Constraint(format!(
                "duplicate slug: {}",
                group.slug
            )));
        }
        inner.groups.retain(|g| g.id != group.id);
        inner.groups.push(group.clone());
        Ok(group)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;
        let before = inner.groups.len();
        inner.groups.retain(|g| g.id != id);
        if inner.groups.len() == before {
            return Err(RepoError::NotFound);
        }
        // Posts survive their group; the reference is nulled.
        for post in &mut inner.posts {
            if post.group_id == Some(id) {
                post.group_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.groups.iter().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Group>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner
            .groups
            .iter()
            .filter(|g| ids.contains(&g.id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let inner = self.inner.read().await;
        let mut groups: Vec<Group> = inner.groups.clone();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut inner = self.inner.write().await;
        inner.posts.retain(|p| p.id != post.id);
        inner.posts.push(post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut inner = self.inner.write().await;
        let before = inner.posts.len();
        inner.posts.retain(|p| p.id != id);
        if inner.posts.len() == before {
            return Err(RepoError::NotFound);
        }
        // Comments cascade with their post.
        inner.comments.retain(|c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn count(&self, scope: FeedScope) -> Result<u64, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner
            .posts
            .iter()
            .filter(|p| scope_matches(scope, p, &inner.follows))
            .count() as u64)
    }

    async fn page(
        &self,
        scope: FeedScope,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let inner = self.inner.read().await;
        let mut posts: Vec<Post> = inner
            .posts
            .iter()
            .filter(|p| scope_matches(scope, p, &inner.follows))
            .cloned()
            .collect();
        feed_order(&mut posts);
        Ok(posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .count() as u64)
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut inner = self.inner.write().await;
        if !inner.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "no such post: {}",
                comment.post_id
            )));
        }
        inner.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let inner = self.inner.read().await;
        let mut comments: Vec<Comment> = inner
            .comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(comments)
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn exists(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let inner = self.inner.read().await;
        Ok(inner
            .follows
            .iter()
            .any(|f| f.user_id == user_id && f.author_id == author_id))
    }

    async fn create(&self, follow: Follow) -> Result<Follow, RepoError> {
        let mut inner = self.inner.write().await;
        if inner
            .follows
            .iter()
            .any(|f| f.user_id == follow.user_id && f.author_id == follow.author_id)
        {
            return Err(RepoError::Constraint("duplicate follow".to_string()));
        }
        inner.follows.push(follow.clone());
        Ok(follow)
    }

    async fn delete(&self, user_id: Uuid, author_id: Uuid) -> Result<bool, RepoError> {
        let mut inner = self.inner.write().await;
        let before = inner.follows.len();
        inner
            .follows
            .retain(|f| !(f.user_id == user_id && f.author_id == author_id));
        Ok(inner.follows.len() < before)
    }
}
