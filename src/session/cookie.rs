//! Session Cookie construction and lookup.
//!
//! The cookie value is an opaque bearer token issued by upstream. An empty
//! value means "no session"; the gateway never looks inside the token.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::config::GatewayConfig;

/// Builds and reads the Session Cookie.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    name: String,
    ttl: Duration,
    secure: bool,
}

impl SessionCookies {
    pub fn new(name: impl Into<String>, ttl_secs: i64, secure: bool) -> Self {
        Self {
            name: name.into(),
            ttl: Duration::seconds(ttl_secs),
            secure,
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(
            config.session.cookie_name.clone(),
            config.session.ttl_secs,
            config.secure_cookies(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bearer token carried by the jar, if the session is active.
    pub fn token(&self, jar: &CookieJar) -> Option<String> {
        jar.get(&self.name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Session cookie for same-site flows (relay login).
    pub fn establish(&self, token: &str) -> Cookie<'static> {
        self.build(token.to_string(), SameSite::Lax, self.secure, self.ttl)
    }

    /// Session cookie written from a cross-site provider redirect.
    ///
    /// `SameSite=None` requires `Secure`, so it is set regardless of environment.
    pub fn establish_cross_site(&self, token: &str) -> Cookie<'static> {
        self.build(token.to_string(), SameSite::None, true, self.ttl)
    }

    /// Cleared session cookie (`Max-Age=0`, empty value).
    pub fn clear(&self) -> Cookie<'static> {
        self.build(String::new(), SameSite::Lax, self.secure, Duration::ZERO)
    }

    fn build(
        &self,
        value: String,
        same_site: SameSite,
        secure: bool,
        max_age: Duration,
    ) -> Cookie<'static> {
        Cookie::build((self.name.clone(), value))
            .http_only(true)
            .secure(secure)
            .same_site(same_site)
            .path("/")
            .max_age(max_age)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cookies(secure: bool) -> SessionCookies {
        SessionCookies::new("token", 86_400, secure)
    }

    #[test]
    fn establish_is_lax_http_only() {
        let cookie = cookies(false).establish("xyz");
        assert_eq!(cookie.name(), "token");
        assert_eq!(cookie.value(), "xyz");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(86_400)));
    }

    #[test]
    fn secure_follows_environment() {
        assert_eq!(cookies(true).establish("xyz").secure(), Some(true));
        assert_eq!(cookies(true).clear().secure(), Some(true));
    }

    #[test]
    fn cross_site_is_none_and_always_secure() {
        let cookie = cookies(false).establish_cross_site("abc123");
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.max_age(), Some(Duration::seconds(86_400)));
    }

    #[test]
    fn clear_has_zero_max_age() {
        let cookie = cookies(false).clear();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn token_ignores_empty_value() {
        let session = cookies(false);

        let jar = CookieJar::new().add(Cookie::new("token", "abc"));
        assert_eq!(session.token(&jar).as_deref(), Some("abc"));

        let jar = CookieJar::new().add(Cookie::new("token", ""));
        assert_eq!(session.token(&jar), None);

        let jar = CookieJar::new().add(Cookie::new("other", "abc"));
        assert_eq!(session.token(&jar), None);
    }
}
