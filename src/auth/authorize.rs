//! OAuth initiation: `GET <authorize-prefix>/{provider}` sends the browser to
//! the upstream's authorization endpoint for that provider.

use axum::extract::{Path, State};
use axum::response::Redirect;

use crate::auth::callback::sign_in_with_error;
use crate::http::server::AppState;

pub const UNKNOWN_PROVIDER: &str = "unknown_provider";

pub async fn oauth_authorize(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Redirect {
    if !state.config.oauth.providers.iter().any(|p| p == &provider) {
        tracing::warn!(provider = %provider, "OAuth flow requested for unknown provider");
        return Redirect::to(&sign_in_with_error(
            state.routes.sign_in_path(),
            UNKNOWN_PROVIDER,
        ));
    }

    tracing::debug!(provider = %provider, "Starting OAuth flow");
    Redirect::to(&state.upstream.authorization_url(&provider))
}
