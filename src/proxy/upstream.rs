//! Upstream API client.
//!
//! # Responsibilities
//! - Compose `<base>/<api-segment>/<tail>?<query>` URLs
//! - Issue exactly one call per relayed request, bounded by a timeout
//! - Collect status, content type, session signal and (maybe) body
//!
//! # Design Decisions
//! - No retries: a failed call is reported immediately
//! - Redirects from upstream are relayed with their `Location`, never followed
//! - Composed URLs must stay under the API segment after normalization

use std::time::Duration;

use axum::body::Bytes;
use axum::http::{
    header::{CONTENT_TYPE, LOCATION},
    HeaderValue, Method, StatusCode,
};
use url::Url;

use crate::config::GatewayConfig;
use crate::http::request::X_REQUEST_ID;
use crate::http::response::{carries_body, DEFAULT_CONTENT_TYPE};
use crate::proxy::error::RelayError;
use crate::session::{session_signal, SessionSignal};

/// One outbound call.
#[derive(Debug)]
pub struct UpstreamRequest<'a> {
    pub method: Method,
    /// Path after the gateway's proxy prefix, still percent-encoded.
    pub tail: &'a str,
    /// Raw query string, forwarded verbatim.
    pub query: Option<&'a str>,
    pub bearer: Option<&'a str>,
    /// Re-serialized JSON body.
    pub body: Option<Vec<u8>>,
    pub request_id: &'a str,
}

/// What the relay needs from an upstream response.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    /// Redirect target, kept only for 3xx statuses.
    pub location: Option<HeaderValue>,
    pub signal: Option<SessionSignal>,
    /// `None` for statuses that carry no body.
    pub body: Option<Bytes>,
}

/// HTTP client bound to the configured upstream.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    base_url: String,
    api_segment: String,
    api_root_path: String,
    cookie_name: String,
}

impl UpstreamClient {
    pub fn new(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream.timeout_secs))
            .connect_timeout(Duration::from_secs(config.upstream.connect_timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        let base_url = config.upstream_base_url();
        let api_segment = config.upstream.api_segment.trim_matches('/').to_string();
        let api_root = format!("{base_url}/{api_segment}/");
        let api_root_path = Url::parse(&api_root)
            .map(|u| u.path().to_string())
            .unwrap_or_else(|_| format!("/{api_segment}/"));

        Ok(Self {
            client,
            base_url,
            api_segment,
            api_root_path,
            cookie_name: config.session.cookie_name.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `<base>/<api-segment>/<tail>` with the query appended verbatim.
    pub fn api_url(&self, tail: &str, query: Option<&str>) -> String {
        let mut url = format!(
            "{}/{}/{}",
            self.base_url,
            self.api_segment,
            tail.trim_start_matches('/')
        );
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        url
    }

    /// Where the upstream starts an OAuth flow for `provider`.
    pub fn authorization_url(&self, provider: &str) -> String {
        format!("{}/oauth2/authorization/{}", self.base_url, provider)
    }

    /// Issue the call and collect the response.
    pub async fn send(&self, request: UpstreamRequest<'_>) -> Result<UpstreamResponse, RelayError> {
        let url = self.api_url(request.tail, request.query);
        let parsed = Url::parse(&url).map_err(|_| RelayError::InvalidUpstreamUrl { url: url.clone() })?;
        if !parsed.path().starts_with(&self.api_root_path) {
            return Err(RelayError::InvalidUpstreamUrl { url });
        }

        let mut builder = self
            .client
            .request(request.method, parsed)
            .header(CONTENT_TYPE, DEFAULT_CONTENT_TYPE)
            .header(X_REQUEST_ID, request.request_id);
        if let Some(token) = request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(RelayError::from_send)?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let location = if status.is_redirection() {
            response.headers().get(LOCATION).cloned()
        } else {
            None
        };
        let signal = session_signal(response.headers(), &self.cookie_name);
        let body = if carries_body(status) {
            Some(response.bytes().await.map_err(RelayError::UpstreamBody)?)
        } else {
            None
        };

        Ok(UpstreamResponse {
            status,
            content_type,
            location,
            signal,
            body,
        })
    }
}
