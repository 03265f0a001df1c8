//! Comment submission.

use actix_web::{HttpResponse, web};

use quill_core::domain::Comment;
use quill_shared::forms::CommentForm;
use quill_shared::views::CommentFormView;

use crate::handlers::posts::{build_post_detail, resolve_post};
use crate::handlers::{post_url, redirect};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /{username}/{post_id}/comment/ - leave a comment and bounce back
/// to the post. A blank comment re-renders the post page with the error
/// under the form instead.
pub async fn add_comment(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(String, uuid::Uuid)>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let post = resolve_post(&state, &username, post_id).await?;

    let validated = match form.validate() {
        Ok(v) => v,
        Err(errors) => {
            let comment_form = CommentFormView {
                text: form.text.clone(),
                errors,
            };
            return build_post_detail(&state, &username, post_id, Some(&identity), comment_form)
                .await;
        }
    };

    let comment = Comment::new(identity.user_id, post.id, validated.text);
    state.comments.save(comment).await?;

    Ok(redirect(&post_url(&username, post_id)))
}
