//! Proxy relay handler.
//!
//! Forwards `<prefix>/<tail>` to `<upstream>/<api-segment>/<tail>`, turning
//! the Session Cookie into a bearer credential on the way out and upstream
//! session signals into cookie writes on the way back.

use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::{
    header::{CONTENT_TYPE, LOCATION},
    HeaderValue, Method, Request,
};
use axum::response::Response;
use axum_extra::extract::CookieJar;
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::http::request::RequestIdExt;
use crate::http::response::DEFAULT_CONTENT_TYPE;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::proxy::error::RelayError;
use crate::proxy::upstream::UpstreamRequest;
use crate::session::SessionSignal;

/// Whether the relay reads and forwards a body for this method.
pub fn method_carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Read the inbound body and re-serialize it as JSON.
///
/// An empty or non-JSON body yields `None`. An over-limit body and a body
/// that fails to arrive are errors.
pub async fn read_json_body(body: Body, limit: usize) -> Result<Option<Vec<u8>>, RelayError> {
    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => {
            return Err(RelayError::InboundBodyTooLarge { limit })
        }
        Err(e) => return Err(RelayError::InboundBody(e)),
    };
    if bytes.is_empty() {
        return Ok(None);
    }

    match serde_json::from_slice::<serde_json::Value>(&bytes) {
        Ok(value) => Ok(serde_json::to_vec(&value).ok()),
        Err(e) => {
            tracing::debug!(error = %e, "Inbound body is not JSON, relaying without body");
            Ok(None)
        }
    }
}

/// Main relay handler, mounted on `<prefix>/{*tail}`.
pub async fn relay(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request<Body>,
) -> Result<(CookieJar, Response), RelayError> {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = parts.headers.request_id().to_string();
    let method = parts.method.clone();
    let path = parts.uri.path();
    let tail = path.strip_prefix(state.proxy_prefix()).unwrap_or(path);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Relaying request"
    );

    let body = if method_carries_body(&method) {
        read_json_body(body, state.config.proxy.max_body_bytes).await?
    } else {
        None
    };

    let token = state.cookies.token(&jar);
    let upstream = state
        .upstream
        .send(UpstreamRequest {
            method: method.clone(),
            tail,
            query: parts.uri.query(),
            bearer: token.as_deref(),
            body,
            request_id: &request_id,
        })
        .await
        .map_err(|e| {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            e
        })?;

    let jar = match upstream.signal {
        Some(SessionSignal::Establish(ref token)) => jar.add(state.cookies.establish(token)),
        Some(SessionSignal::Clear) => jar.add(state.cookies.clear()),
        None => jar,
    };
    if let Some(signal) = &upstream.signal {
        metrics::record_session_signal(signal.kind());
        tracing::info!(request_id = %request_id, signal = signal.kind(), "Session signal from upstream");
    }

    let mut response = match upstream.body {
        Some(bytes) => Response::new(Body::from(bytes)),
        None => Response::new(Body::empty()),
    };
    *response.status_mut() = upstream.status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        upstream
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE)),
    );
    if let Some(location) = upstream.location {
        response.headers_mut().insert(LOCATION, location);
    }

    metrics::record_relay(method.as_str(), upstream.status.as_u16(), start);
    tracing::debug!(
        request_id = %request_id,
        status = %upstream.status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Relay complete"
    );

    Ok((jar, response))
}
