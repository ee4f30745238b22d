//! Session-signal extraction from upstream responses.
//!
//! Upstream establishes or clears a session by emitting a `Set-Cookie`
//! header named after the session cookie. Each header is parsed with the
//! cookie grammar rather than matched as text, so attribute order and
//! attribute casing do not matter and `xtoken=` never counts as `token=`.

use axum::http::{header::SET_COOKIE, HeaderMap};
use axum_extra::extract::cookie::Cookie;

/// What upstream asked the gateway to do with the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionSignal {
    /// Write the session cookie with this token.
    Establish(String),
    /// Clear the session cookie.
    Clear,
}

impl SessionSignal {
    pub fn kind(&self) -> &'static str {
        match self {
            SessionSignal::Establish(_) => "establish",
            SessionSignal::Clear => "clear",
        }
    }
}

/// Find the session signal among the `Set-Cookie` headers.
///
/// When several headers name the session cookie, the last one wins, as it
/// would in a browser.
pub fn session_signal(headers: &HeaderMap, cookie_name: &str) -> Option<SessionSignal> {
    let mut signal = None;

    for value in headers.get_all(SET_COOKIE) {
        let Ok(raw) = value.to_str() else {
            tracing::debug!("Ignoring non-ASCII Set-Cookie header from upstream");
            continue;
        };
        let cookie = match Cookie::parse(raw) {
            Ok(cookie) => cookie,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring malformed Set-Cookie header from upstream");
                continue;
            }
        };
        if cookie.name() != cookie_name {
            continue;
        }
        signal = Some(if cookie.value().is_empty() {
            SessionSignal::Clear
        } else {
            SessionSignal::Establish(cookie.value().to_string())
        });
    }

    signal
}
