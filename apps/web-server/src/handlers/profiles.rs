//! Profile pages and the follow relation.

use actix_web::{HttpResponse, web};

use quill_core::RepoError;
use quill_core::access::can_follow;
use quill_core::domain::Follow;
use quill_core::feed::{FeedScope, PageSelector};
use quill_shared::views::ProfileView;

use crate::handlers::feed::PageQuery;
use crate::handlers::presenter::{author_view, page_meta, post_views};
use crate::handlers::{profile_url, redirect};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn resolve_author(
    state: &AppState,
    username: &str,
) -> AppResult<quill_core::domain::User> {
    state
        .users
        .find_by_username(username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No user '{}'", username)))
}

/// GET /{username}/ - an author's posts plus the viewer's follow state.
///
/// `following` is reported only when there is a relation to report:
/// signed-out viewers and the author's own profile get no flag.
pub async fn profile(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let author = resolve_author(&state, &username).await?;

    let selector = PageSelector::from_query(query.page.as_deref());
    let page = state
        .feed
        .compose(FeedScope::Author(author.id), selector)
        .await?;
    let viewer_id = viewer.0.map(|i| i.user_id);

    let following = match viewer_id {
        Some(v) if v != author.id => Some(state.follows.exists(v, author.id).await?),
        _ => None,
    };

    let posts = post_views(&state, &page.items, viewer_id).await?;

    Ok(HttpResponse::Ok().json(ProfileView {
        author: author_view(&author),
        posts_count: page.total_items,
        following,
        posts,
        page: page_meta(&page),
    }))
}

/// POST /{username}/follow/ - subscribe to an author, then bounce to their
/// profile. Self-follow and an existing relation leave the store untouched.
pub async fn follow(
    state: web::Data<AppState>,
    identity: Identity,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = resolve_author(&state, &username).await?;

    let already = state.follows.exists(identity.user_id, author.id).await?;
    if can_follow(identity.user_id, author.id, already) {
        match state
            .follows
            .create(Follow::new(identity.user_id, author.id))
            .await
        {
            Ok(_) => {}
            // Lost a race with a concurrent follow; the relation exists
            // either way.
            Err(RepoError::Constraint(_)) => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(redirect(&profile_url(&username)))
}

/// POST /{username}/unfollow/ - drop the relation if present, then bounce
/// to the profile. Unfollowing someone never followed is a no-op.
pub async fn unfollow(
    state: web::Data<AppState>,
    identity: Identity,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    let author = resolve_author(&state, &username).await?;

    state.follows.delete(identity.user_id, author.id).await?;

    Ok(redirect(&profile_url(&username)))
}
