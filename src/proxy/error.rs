//! Relay failures and their caller-facing responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::http::response::json_message;
use crate::observability::metrics;

/// Failures of the proxy relay.
///
/// A non-2xx status from upstream is not an error; it is relayed as is.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Network or transport failure reaching upstream.
    #[error("upstream unreachable: {0}")]
    UpstreamUnreachable(#[source] reqwest::Error),

    /// Upstream did not answer within the configured timeout.
    #[error("upstream timed out: {0}")]
    UpstreamTimeout(#[source] reqwest::Error),

    /// The upstream body could not be read.
    #[error("failed to read upstream body: {0}")]
    UpstreamBody(#[source] reqwest::Error),

    /// The inbound body exceeded the configured limit.
    #[error("inbound body exceeds {limit} bytes")]
    InboundBodyTooLarge { limit: usize },

    /// The inbound body could not be read, e.g. the client went away mid-body.
    #[error("failed to read inbound body: {0}")]
    InboundBody(#[source] axum::BoxError),

    /// The composed upstream URL was malformed or escaped the API segment.
    #[error("invalid upstream URL '{url}'")]
    InvalidUpstreamUrl { url: String },
}

impl RelayError {
    /// Classify a transport error from the upstream call.
    pub fn from_send(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RelayError::UpstreamTimeout(err)
        } else {
            RelayError::UpstreamUnreachable(err)
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::UpstreamUnreachable(_) => "unreachable",
            RelayError::UpstreamTimeout(_) => "timeout",
            RelayError::UpstreamBody(_) => "upstream_body",
            RelayError::InboundBodyTooLarge { .. } => "body_too_large",
            RelayError::InboundBody(_) => "inbound_body",
            RelayError::InvalidUpstreamUrl { .. } => "invalid_url",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::InboundBodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            RelayError::InvalidUpstreamUrl { .. } | RelayError::InboundBody(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        metrics::record_relay_failure(self.kind());
        match self {
            RelayError::InboundBodyTooLarge { .. } => {
                json_message(self.status(), "Request body too large")
            }
            RelayError::InvalidUpstreamUrl { .. } => {
                json_message(self.status(), "Invalid request path")
            }
            RelayError::InboundBody(_) => json_message(self.status(), "Invalid request body"),
            _ => json_message(self.status(), "Upstream request failed"),
        }
    }
}
