//! Local logout.
//!
//! Upstream authenticates with stateless bearer tokens, so logging out only
//! needs the Session Cookie cleared; upstream is not called.

use axum::extract::State;
use axum::Json;
use axum_extra::extract::CookieJar;
use serde_json::{json, Value};

use crate::http::server::AppState;

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Json<Value>) {
    let had_session = state.cookies.token(&jar).is_some();
    tracing::info!(had_session, "Session cleared by logout");
    (
        jar.add(state.cookies.clear()),
        Json(json!({ "message": "Logged out" })),
    )
}
