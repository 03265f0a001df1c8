//! Feed pages: the home feed, the follow feed, and group feeds.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use quill_core::feed::{FeedScope, PageSelector};
use quill_shared::views::{FeedPageView, GroupFeedView};

use crate::handlers::presenter::{group_view, page_meta, post_views};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Feed pages accept `?page=` as free text; out-of-range and garbage
/// values resolve to a real page instead of erroring.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

fn index_cache_key(raw: Option<&str>) -> String {
    format!("feed:index:page:{}", raw.unwrap_or("1"))
}

/// GET / - the home feed, every post newest-first.
///
/// The rendered body is cached for a short TTL keyed by the raw page
/// parameter, so new posts may lag here until the entry expires. The
/// cached rendering is viewer-neutral: `editable` is false for every
/// post on this page.
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let key = index_cache_key(query.page.as_deref());
    if let Some(body) = state.cache.get(&key).await {
        return Ok(HttpResponse::Ok()
            .content_type("application/json")
            .body(body));
    }

    let selector = PageSelector::from_query(query.page.as_deref());
    let page = state.feed.compose(FeedScope::All, selector).await?;
    let posts = post_views(&state, &page.items, None).await?;
    let view = FeedPageView {
        posts,
        page: page_meta(&page),
    };

    let body = serde_json::to_string(&view)
        .map_err(|e| AppError::Internal(format!("Failed to render feed: {}", e)))?;
    if let Err(e) = state
        .cache
        .set(&key, &body, Some(state.feed_cache_ttl))
        .await
    {
        tracing::warn!("Feed cache write failed: {}", e);
    }

    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .body(body))
}

/// GET /follow/ - posts by the authors the signed-in user follows.
pub async fn follow_index(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let selector = PageSelector::from_query(query.page.as_deref());
    let page = state
        .feed
        .compose(FeedScope::Following(identity.user_id), selector)
        .await?;
    let posts = post_views(&state, &page.items, Some(identity.user_id)).await?;

    Ok(HttpResponse::Ok().json(FeedPageView {
        posts,
        page: page_meta(&page),
    }))
}

/// GET /group/{slug}/ - one group's posts, newest-first.
pub async fn group_posts(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let group = state
        .groups
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No group with slug '{}'", slug)))?;

    let selector = PageSelector::from_query(query.page.as_deref());
    let page = state
        .feed
        .compose(FeedScope::Group(group.id), selector)
        .await?;
    let viewer_id = viewer.0.map(|i| i.user_id);
    let posts = post_views(&state, &page.items, viewer_id).await?;

    Ok(HttpResponse::Ok().json(GroupFeedView {
        group: group_view(&group),
        posts,
        page: page_meta(&page),
    }))
}
