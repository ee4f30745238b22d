//! Route guard middleware.
//!
//! Redirects based on Session Cookie presence only. This keeps visitors
//! away from pages that would fail; it is not an authorization boundary,
//! upstream validates the token on every call.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;

use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{GuardDecision, SessionState};

pub async fn route_guard_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request<Body>,
    next: Next,
) -> Response {
    let session = SessionState::from_token(state.cookies.token(&jar).as_deref());
    let path = request.uri().path().to_owned();

    match state.routes.decide(&path, session) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::RedirectToSignIn => {
            tracing::debug!(path = %path, "No session, redirecting to sign-in");
            metrics::record_guard_redirect("unauthenticated");
            Redirect::temporary(state.routes.sign_in_path()).into_response()
        }
        GuardDecision::RedirectToLanding => {
            tracing::debug!(path = %path, "Session active, redirecting to landing page");
            metrics::record_guard_redirect("authenticated");
            Redirect::temporary(state.routes.landing_path()).into_response()
        }
    }
}
