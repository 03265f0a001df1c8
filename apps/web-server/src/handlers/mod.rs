//! HTTP handlers and route configuration.

mod comments;
mod feed;
mod posts;
mod presenter;
mod profiles;


use actix_web::{HttpRequest, HttpResponse, http::header, web};

use quill_shared::ErrorResponse;

use crate::middleware::error::AppError;
use crate::state::AppState;

/// 302 to `location` - the answer to every successful mutation and to
/// every denied one.
pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.to_string()))
        .finish()
}

pub(crate) fn post_url(username: &str, post_id: uuid::Uuid) -> String {
    format!("/{}/{}/", username, post_id)
}

pub(crate) fn profile_url(username: &str) -> String {
    format!("/{}/", username)
}

/// Configure all application routes.
///
/// Fixed paths come before the `/{username}/` family; actix matches in
/// registration order, so `/new/` is never read as a profile.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(feed::index))
        .route("/follow/", web::get().to(feed::follow_index))
        .route("/new/", web::get().to(posts::new_post_form))
        .route("/new/", web::post().to(posts::create_post))
        .route("/group/{slug}/", web::get().to(feed::group_posts))
        .route("/{username}/", web::get().to(profiles::profile))
        .route("/{username}/follow/", web::post().to(profiles::follow))
        .route("/{username}/unfollow/", web::post().to(profiles::unfollow))
        .route("/{username}/{post_id}/", web::get().to(posts::post_detail))
        .route(
            "/{username}/{post_id}/edit/",
            web::get().to(posts::edit_post_form),
        )
        .route(
            "/{username}/{post_id}/edit/",
            web::post().to(posts::update_post),
        )
        .route(
            "/{username}/{post_id}/comment/",
            web::post().to(comments::add_comment),
        );
}

/// Everything the server mounts on an `App`: shared state, path error
/// handling, the routes and the fallback 404. Used by `main` and by the
/// handler tests, so both run the same app.
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(state))
            // A path segment that fails to parse (a malformed post id)
            // is an unknown URL, not a client error.
            .app_data(web::PathConfig::default().error_handler(|_, req| {
                AppError::NotFound(format!("No route for '{}'", req.path())).into()
            }))
            .configure(configure_routes)
            .default_service(web::to(not_found));
    }
}

async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound()
        .json(ErrorResponse::not_found("No such page").with_instance(req.path()))
}
