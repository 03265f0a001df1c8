//! Post pages: create, detail, and edit.
//!
//! Failed form submissions re-render the form with the submitted values
//! and field errors at 200; successful mutations answer 302. A signed-in
//! user who is not the author of a post is bounced to the post's page
//! rather than shown an error.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::access::{can_comment, can_edit_post};
use quill_core::domain::Post;
use quill_shared::forms::{FieldErrors, INVALID_CHOICE_MSG, PostForm, ValidatedPost};
use quill_shared::views::{CommentFormView, PostDetailView, PostFormView};

use crate::handlers::presenter::{comment_views, group_ref, post_view};
use crate::handlers::{post_url, redirect};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Validate the form, then check the chosen group actually exists.
///
/// The outer error is a repository failure; the inner one is the form
/// coming back to the user.
async fn validate_with_group(
    state: &AppState,
    form: &PostForm,
) -> AppResult<Result<ValidatedPost, FieldErrors>> {
    let validated = match form.validate() {
        Ok(v) => v,
        Err(errors) => return Ok(Err(errors)),
    };

    if let Some(group_id) = validated.group_id {
        if state.groups.find_by_id(group_id).await?.is_none() {
            let mut errors = FieldErrors::new();
            errors.add("group", INVALID_CHOICE_MSG);
            return Ok(Err(errors));
        }
    }

    Ok(Ok(validated))
}

/// Re-render the post form with the submitted values and errors.
async fn form_view(
    state: &AppState,
    form: &PostForm,
    errors: FieldErrors,
    is_edit: bool,
) -> AppResult<HttpResponse> {
    let groups = state.groups.list().await?;

    Ok(HttpResponse::Ok().json(PostFormView {
        text: form.text.clone(),
        group: form.group.clone().filter(|g| !g.trim().is_empty()),
        image: form.image.clone().filter(|i| !i.is_empty()),
        groups: groups.iter().map(group_ref).collect(),
        errors,
        is_edit,
    }))
}

/// Resolve a post by id under an author's username, as the post URLs
/// embed both. A wrong username 404s even when the post id exists.
pub(crate) async fn resolve_post(state: &AppState, username: &str, post_id: Uuid) -> AppResult<Post> {
    let post = state
        .posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No post {}", post_id)))?;

    let author = state
        .users
        .find_by_id(post.author_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Post {} has no author row", post.id)))?;

    if author.username != username {
        return Err(AppError::NotFound(format!("No post {}", post_id)));
    }

    Ok(post)
}

/// GET /new/ - the empty creation form.
pub async fn new_post_form(state: web::Data<AppState>, _identity: Identity) -> AppResult<HttpResponse> {
    let groups = state.groups.list().await?;

    Ok(HttpResponse::Ok().json(PostFormView {
        text: String::new(),
        group: None,
        image: None,
        groups: groups.iter().map(group_ref).collect(),
        errors: FieldErrors::new(),
        is_edit: false,
    }))
}

/// POST /new/ - create a post and bounce to the home feed.
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let validated = match validate_with_group(&state, &form).await? {
        Ok(v) => v,
        Err(errors) => return form_view(&state, &form, errors, false).await,
    };

    let post = Post::new(
        identity.user_id,
        validated.text,
        validated.group_id,
        validated.image,
    );
    state.posts.save(post).await?;

    Ok(redirect("/"))
}

/// Build the post detail page shared by GET and by failed comment
/// submissions, which re-render it with the comment form filled in.
pub(crate) async fn build_post_detail(
    state: &AppState,
    username: &str,
    post_id: Uuid,
    viewer: Option<&Identity>,
    comment_form: CommentFormView,
) -> AppResult<HttpResponse> {
    let post = resolve_post(state, username, post_id).await?;

    let author = state
        .users
        .find_by_id(post.author_id)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Post {} has no author row", post.id)))?;

    let group = match post.group_id {
        Some(group_id) => state.groups.find_by_id(group_id).await?,
        None => None,
    };

    let comments = state.comments.list_for_post(post.id).await?;
    let comments = comment_views(state, &comments).await?;
    let author_posts_count = state.posts.count_by_author(post.author_id).await?;
    let viewer_id = viewer.map(|i| i.user_id);

    Ok(HttpResponse::Ok().json(PostDetailView {
        post: post_view(&post, &author, group.as_ref(), viewer_id),
        author_posts_count,
        comments,
        can_comment: can_comment(viewer_id),
        comment_form,
    }))
}

/// GET /{username}/{post_id}/ - a single post with its comments.
pub async fn post_detail(
    state: web::Data<AppState>,
    viewer: OptionalIdentity,
    path: web::Path<(String, Uuid)>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();

    build_post_detail(
        &state,
        &username,
        post_id,
        viewer.0.as_ref(),
        CommentFormView::default(),
    )
    .await
}

/// GET /{username}/{post_id}/edit/ - the edit form, prefilled.
pub async fn edit_post_form(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, Uuid)>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let post = resolve_post(&state, &username, post_id).await?;

    if !can_edit_post(identity.user_id, &post) {
        return Ok(redirect(&post_url(&username, post_id)));
    }

    let groups = state.groups.list().await?;

    Ok(HttpResponse::Ok().json(PostFormView {
        text: post.text.clone(),
        group: post.group_id.map(|id| id.to_string()),
        image: post.image.clone(),
        groups: groups.iter().map(group_ref).collect(),
        errors: FieldErrors::new(),
        is_edit: true,
    }))
}

/// POST /{username}/{post_id}/edit/ - apply an edit and bounce to the post.
pub async fn update_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, Uuid)>,
    form: web::Form<PostForm>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let mut post = resolve_post(&state, &username, post_id).await?;

    if !can_edit_post(identity.user_id, &post) {
        return Ok(redirect(&post_url(&username, post_id)));
    }

    let validated = match validate_with_group(&state, &form).await? {
        Ok(v) => v,
        Err(errors) => return form_view(&state, &form, errors, true).await,
    };

    post.edit(validated.text, validated.group_id, validated.image);
    state.posts.save(post).await?;

    Ok(redirect(&post_url(&username, post_id)))
}
