//! OAuth completion handler.
//!
//! The provider flow ends with a redirect carrying either `token` (issued by
//! upstream) or `error`. The token is stored as the Session Cookie; it is not
//! validated here, upstream rejects bad tokens on every call.

use axum::extract::{RawQuery, State};
use axum::response::Redirect;
use axum_extra::extract::CookieJar;

use crate::http::server::AppState;
use crate::observability::metrics;

/// Error marker used when the redirect carries neither token nor error.
pub const MISSING_TOKEN: &str = "no_token";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub token: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Parse the callback query. Repeated keys keep their first value and
    /// unknown keys are ignored, so no query is ever rejected.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            let slot = match key.as_ref() {
                "token" => &mut params.token,
                "error" => &mut params.error,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

/// `<sign-in>?error=<code>` with the code form-encoded.
pub fn sign_in_with_error(sign_in_path: &str, error: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(error.as_bytes()).collect();
    format!("{sign_in_path}?error={encoded}")
}

pub async fn oauth_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    RawQuery(query): RawQuery,
) -> (CookieJar, Redirect) {
    let params = CallbackParams::from_query(query.as_deref());
    let sign_in = state.routes.sign_in_path();

    if let Some(error) = params.error.filter(|e| !e.is_empty()) {
        tracing::warn!(error = %error, "OAuth provider reported an error");
        metrics::record_oauth_callback("provider_error");
        return (jar, Redirect::to(&sign_in_with_error(sign_in, &error)));
    }

    let Some(token) = params.token.filter(|t| !t.is_empty()) else {
        tracing::warn!("OAuth callback without token");
        metrics::record_oauth_callback("missing_token");
        return (jar, Redirect::to(&sign_in_with_error(sign_in, MISSING_TOKEN)));
    };

    tracing::info!("OAuth login completed");
    metrics::record_oauth_callback("success");
    let jar = jar.add(state.cookies.establish_cross_site(&token));
    (jar, Redirect::to(state.routes.landing_path()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_is_form_encoded() {
        assert_eq!(
            sign_in_with_error("/auth/login", "access_denied"),
            "/auth/login?error=access_denied"
        );
        assert_eq!(
            sign_in_with_error("/auth/login", "bad&evil=1 x"),
            "/auth/login?error=bad%26evil%3D1+x"
        );
    }

    #[test]
    fn first_value_wins_for_repeated_keys() {
        let params = CallbackParams::from_query(Some("token=a&token=b&error=&error=x&state=1"));
        assert_eq!(params.token.as_deref(), Some("a"));
        assert_eq!(params.error.as_deref(), Some(""));
    }

    #[test]
    fn decodes_values_and_tolerates_junk() {
        let params = CallbackParams::from_query(Some("token=a%2Bb%3D&&=x&error"));
        assert_eq!(params.token.as_deref(), Some("a+b="));
        assert_eq!(params.error.as_deref(), Some(""));
        assert_eq!(CallbackParams::from_query(None), CallbackParams::default());
    }
}
