//! Session extractors.
//!
//! Sign-in itself lives in the external auth system; requests arrive with
//! a session token in the `session` cookie or an Authorization header.
//! Handlers that require a signed-in user take [`Identity`]; pages that
//! merely adapt to the viewer take [`OptionalIdentity`]. A missing or
//! invalid session on a protected route redirects to the sign-in page
//! rather than erroring.

use actix_web::{FromRequest, HttpRequest, http::StatusCode, http::header};
use std::future::{Ready, ready};

use quill_core::ports::SessionClaims;

use crate::state::AppState;

/// Path of the external sign-in page.
pub const LOGIN_URL: &str = "/auth/login/";

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

/// Authenticated user identity extractor.
///
/// Use this in handlers to require a signed-in user:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
        }
    }
}

/// Challenge for requests that need a signed-in user: a redirect to the
/// sign-in page carrying the originally requested path in `next`.
#[derive(Debug)]
pub struct LoginRequired {
    next: String,
}

impl std::fmt::Display for LoginRequired {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "login required (next: {})", self.next)
    }
}

impl actix_web::ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::Found()
            .insert_header((
                header::LOCATION,
                format!("{}?next={}", LOGIN_URL, self.next),
            ))
            .finish()
    }
}

/// Token from the session cookie, falling back to a Bearer header.
fn session_token(req: &HttpRequest) -> Option<String> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        return Some(cookie.value().to_string());
    }

    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn authenticate(req: &HttpRequest) -> Option<Identity> {
    let state = req.app_data::<actix_web::web::Data<AppState>>()?;
    let token = session_token(req)?;

    match state.sessions.verify(&token) {
        Ok(claims) => Some(claims.into()),
        Err(e) => {
            tracing::debug!("Session rejected: {}", e);
            None
        }
    }
}

impl FromRequest for Identity {
    type Error = LoginRequired;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(authenticate(req).ok_or_else(|| LoginRequired {
            next: req.path().to_string(),
        }))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req))))
    }
}
