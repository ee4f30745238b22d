use reqwest::StatusCode;
use serde_json::Value;

/// Body of a failed response.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub(crate) fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(text),
        }
    }

    /// The `message` field of a JSON payload, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Payload::Json(value) => value.get("message").and_then(Value::as_str),
            Payload::Text(_) => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// A successful response whose body is not the expected JSON.
    #[error("unparseable response (status {status}): {source}")]
    Unparseable {
        status: StatusCode,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// A non-2xx response.
    #[error("gateway returned status {status}")]
    Status { status: StatusCode, payload: Payload },
}

impl ClientError {
    /// HTTP status of the response, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Transport(e) => e.status(),
            ClientError::Unparseable { status, .. } | ClientError::Status { status, .. } => {
                Some(*status)
            }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status == StatusCode::UNAUTHORIZED)
    }

    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status == StatusCode::TOO_MANY_REQUESTS)
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            ClientError::Status { payload, .. } => Some(payload),
            _ => None,
        }
    }
}
