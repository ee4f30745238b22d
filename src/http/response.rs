//! Response helpers.
//!
//! # Responsibilities
//! - Decide whether an upstream status carries a body
//! - Produce generic JSON error bodies
//!
//! # Design Decisions
//! - Error bodies never include upstream or internal detail

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Content type used when upstream does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Whether a response with this status conventionally carries a body.
pub fn carries_body(status: StatusCode) -> bool {
    !matches!(
        status,
        StatusCode::NO_CONTENT | StatusCode::RESET_CONTENT | StatusCode::NOT_MODIFIED
    )
}

/// `{"message": ...}` with the given status.
pub fn json_message(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}
