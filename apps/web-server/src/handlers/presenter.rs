//! Mapping from domain entities to the view models pages render.
//!
//! Feeds carry posts from many authors and groups; the batch builders
//! here resolve those in two lookups rather than one per post.

use std::collections::HashMap;

use uuid::Uuid;

use quill_core::access::can_edit_post;
use quill_core::domain::{Comment, Group, Post, User};
use quill_core::feed::FeedPage;
use quill_shared::views::{AuthorView, CommentView, GroupRef, GroupView, PageMeta, PostView};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub fn author_view(user: &User) -> AuthorView {
    AuthorView {
        id: user.id.to_string(),
        username: user.username.clone(),
        full_name: user.full_name(),
    }
}

pub fn group_ref(group: &Group) -> GroupRef {
    GroupRef {
        id: group.id.to_string(),
        title: group.title.clone(),
        slug: group.slug.clone(),
    }
}

pub fn group_view(group: &Group) -> GroupView {
    GroupView {
        id: group.id.to_string(),
        title: group.title.clone(),
        slug: group.slug.clone(),
        description: group.description.clone(),
    }
}

pub fn page_meta(page: &FeedPage) -> PageMeta {
    PageMeta {
        number: page.number,
        total_pages: page.total_pages,
        total_items: page.total_items,
        page_size: page.page_size,
        has_next: page.has_next,
        has_previous: page.has_previous,
    }
}

/// Render one post for `viewer`. `editable` reflects the edit rule, so
/// the page can show an edit link only to the author.
pub fn post_view(
    post: &Post,
    author: &User,
    group: Option<&Group>,
    viewer: Option<Uuid>,
) -> PostView {
    PostView {
        id: post.id.to_string(),
        text: post.text.clone(),
        preview: post.preview(),
        published_at: post.published_at.to_rfc3339(),
        author: author_view(author),
        group: group.map(group_ref),
        image: post.image.clone(),
        editable: viewer.is_some_and(|v| can_edit_post(v, post)),
    }
}

/// Render a page of posts, resolving authors and groups in batch.
///
/// A post whose author row is gone indicates a broken foreign key, so
/// that surfaces as an internal error; a missing group is rendered as
/// no group at all.
pub async fn post_views(
    state: &AppState,
    posts: &[Post],
    viewer: Option<Uuid>,
) -> AppResult<Vec<PostView>> {
    let mut author_ids: Vec<Uuid> = posts.iter().map(|p| p.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let mut group_ids: Vec<Uuid> = posts.iter().filter_map(|p| p.group_id).collect();
    group_ids.sort_unstable();
    group_ids.dedup();

    let authors: HashMap<Uuid, User> = state
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let groups: HashMap<Uuid, Group> = state
        .groups
        .find_by_ids(&group_ids)
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();

    let mut views = Vec::with_capacity(posts.len());
    for post in posts {
        let author = authors.get(&post.author_id).ok_or_else(|| {
            AppError::Internal(format!("Post {} has no author row", post.id))
        })?;
        let group = post.group_id.and_then(|id| groups.get(&id));
        views.push(post_view(post, author, group, viewer));
    }

    Ok(views)
}

/// Render a post's comments newest-first, resolving authors in batch.
pub async fn comment_views(state: &AppState, comments: &[Comment]) -> AppResult<Vec<CommentView>> {
    let mut author_ids: Vec<Uuid> = comments.iter().map(|c| c.author_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<Uuid, User> = state
        .users
        .find_by_ids(&author_ids)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let mut views = Vec::with_capacity(comments.len());
    for comment in comments {
        let author = authors.get(&comment.author_id).ok_or_else(|| {
            AppError::Internal(format!("Comment {} has no author row", comment.id))
        })?;
        views.push(CommentView {
            id: comment.id.to_string(),
            author: author_view(author),
            text: comment.text.clone(),
            created_at: comment.created_at.to_rfc3339(),
        });
    }

    Ok(views)
}
