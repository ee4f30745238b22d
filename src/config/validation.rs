//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ttl > 0)
//! - Detect redirect loops between the guard's route classes
//! - Detect endpoint paths shadowed by the proxy prefix
//! - Detect fixed endpoints that would be mounted twice
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use url::Url;

use crate::config::schema::GatewayConfig;
use crate::http::server::HEALTH_PATH;
use crate::routing::matcher::{Matcher, PathPrefixMatcher};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base = config.upstream_base_url();
    match Url::parse(&base) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("invalid URL '{base}': {e}"),
        )),
    }

    if config.upstream.api_segment.trim_matches('/').is_empty() {
        errors.push(ValidationError::new("upstream.api_segment", "must not be empty"));
    }
    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::new("upstream.timeout_secs", "must be greater than 0"));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "upstream.connect_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.proxy.max_body_bytes == 0 {
        errors.push(ValidationError::new("proxy.max_body_bytes", "must be greater than 0"));
    }

    let name = &config.session.cookie_name;
    if name.is_empty() {
        errors.push(ValidationError::new("session.cookie_name", "must not be empty"));
    } else if name
        .chars()
        .any(|c| c == '=' || c == ';' || c == ',' || c.is_whitespace() || c.is_control())
    {
        errors.push(ValidationError::new(
            "session.cookie_name",
            format!("'{name}' is not a valid cookie name"),
        ));
    }
    if config.session.ttl_secs <= 0 {
        errors.push(ValidationError::new("session.ttl_secs", "must be greater than 0"));
    }

    let mut paths: Vec<(String, &str)> = vec![
        ("proxy.prefix".into(), config.proxy.prefix.as_str()),
        ("routes.sign_in_path".into(), config.routes.sign_in_path.as_str()),
        ("routes.landing_path".into(), config.routes.landing_path.as_str()),
        ("oauth.callback_path".into(), config.oauth.callback_path.as_str()),
        ("oauth.logout_path".into(), config.oauth.logout_path.as_str()),
        ("oauth.authorize_prefix".into(), config.oauth.authorize_prefix.as_str()),
    ];
    for (i, prefix) in config.routes.protected_prefixes.iter().enumerate() {
        paths.push((format!("routes.protected_prefixes[{i}]"), prefix));
    }
    for (i, prefix) in config.routes.guest_only_prefixes.iter().enumerate() {
        paths.push((format!("routes.guest_only_prefixes[{i}]"), prefix));
    }
    for (field, path) in &paths {
        if !path.starts_with('/') {
            errors.push(ValidationError::new(field.clone(), format!("'{path}' must start with '/'")));
        }
    }
    if config.proxy.prefix.trim_end_matches('/').is_empty() {
        errors.push(ValidationError::new("proxy.prefix", "must not be the root path"));
    }

    let protected: Vec<PathPrefixMatcher> = config
        .routes
        .protected_prefixes
        .iter()
        .map(PathPrefixMatcher::new)
        .collect();
    let guest_only: Vec<PathPrefixMatcher> = config
        .routes
        .guest_only_prefixes
        .iter()
        .map(PathPrefixMatcher::new)
        .collect();

    if protected.iter().any(|m| m.matches(&config.routes.sign_in_path)) {
        errors.push(ValidationError::new(
            "routes.sign_in_path",
            "is protected; unauthenticated visitors would loop",
        ));
    }
    if guest_only.iter().any(|m| m.matches(&config.routes.landing_path)) {
        errors.push(ValidationError::new(
            "routes.landing_path",
            "is guest-only; authenticated visitors would loop",
        ));
    }
    for (i, prefix) in config.routes.guest_only_prefixes.iter().enumerate() {
        if protected.iter().any(|m| m.matches(prefix)) {
            errors.push(ValidationError::new(
                format!("routes.guest_only_prefixes[{i}]"),
                format!("'{prefix}' is also protected"),
            ));
        }
    }

    let proxy = PathPrefixMatcher::new(&config.proxy.prefix);
    for (field, path) in [
        ("oauth.callback_path", &config.oauth.callback_path),
        ("oauth.logout_path", &config.oauth.logout_path),
        ("oauth.authorize_prefix", &config.oauth.authorize_prefix),
    ] {
        if proxy.matches(path) {
            errors.push(ValidationError::new(
                field,
                format!("'{path}' is shadowed by the proxy prefix"),
            ));
        }
    }

    let authorize_prefix = config.oauth.authorize_prefix.trim_end_matches('/');
    let endpoints = [
        ("oauth.callback_path", config.oauth.callback_path.as_str()),
        ("oauth.logout_path", config.oauth.logout_path.as_str()),
        ("oauth.authorize_prefix", authorize_prefix),
    ];
    for (i, (field, path)) in endpoints.iter().enumerate() {
        if path.contains(['{', '}', '*']) {
            errors.push(ValidationError::new(
                *field,
                format!("'{path}' must not contain route parameters"),
            ));
        }
        if *path == HEALTH_PATH {
            errors.push(ValidationError::new(
                *field,
                format!("'{path}' is reserved for the health endpoint"),
            ));
        }
        if let Some((other, _)) = endpoints[..i].iter().find(|(_, p)| p == path) {
            errors.push(ValidationError::new(
                *field,
                format!("'{path}' is already used by {other}"),
            ));
        }
    }

    if config.oauth.providers.is_empty() {
        errors.push(ValidationError::new("oauth.providers", "at least one provider is required"));
    }
    for (i, provider) in config.oauth.providers.iter().enumerate() {
        if provider.is_empty() || provider.contains('/') {
            errors.push(ValidationError::new(
                format!("oauth.providers[{i}]"),
                format!("'{provider}' is not a valid provider name"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(config: &GatewayConfig) -> Vec<String> {
        validate_config(config)
            .unwrap_err()
            .into_iter()
            .map(|e| e.field)
            .collect()
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = GatewayConfig::default();
        config.upstream.base_url = Some("ftp://backend".into());
        config.upstream.timeout_secs = 0;
        config.session.cookie_name = "bad name".into();

        let fields = fields(&config);
        assert!(fields.contains(&"upstream.base_url".to_string()));
        assert!(fields.contains(&"upstream.timeout_secs".to_string()));
        assert!(fields.contains(&"session.cookie_name".to_string()));
    }

    #[test]
    fn rejects_redirect_loops() {
        let mut config = GatewayConfig::default();
        config.routes.protected_prefixes.push("/auth".into());
        config.routes.landing_path = "/auth/signup/done".into();

        let fields = fields(&config);
        assert!(fields.contains(&"routes.sign_in_path".to_string()));
        assert!(fields.contains(&"routes.landing_path".to_string()));
    }

    #[test]
    fn rejects_paths_under_proxy_prefix() {
        let mut config = GatewayConfig::default();
        config.oauth.callback_path = "/api/auth/callback".into();
        assert_eq!(fields(&config), vec!["oauth.callback_path".to_string()]);
    }

    #[test]
    fn rejects_colliding_endpoints() {
        let mut config = GatewayConfig::default();
        config.oauth.logout_path = "/auth/callback".into();
        assert_eq!(fields(&config), vec!["oauth.logout_path".to_string()]);

        let mut config = GatewayConfig::default();
        config.oauth.callback_path = "/healthz".into();
        assert_eq!(fields(&config), vec!["oauth.callback_path".to_string()]);

        let mut config = GatewayConfig::default();
        config.oauth.authorize_prefix = "/auth/logout/".into();
        assert_eq!(fields(&config), vec!["oauth.authorize_prefix".to_string()]);
    }

    #[test]
    fn rejects_route_syntax_in_endpoints() {
        let mut config = GatewayConfig::default();
        config.oauth.callback_path = "/auth/{kind}".into();
        assert_eq!(fields(&config), vec!["oauth.callback_path".to_string()]);
    }

    #[test]
    fn validated_config_builds_router() {
        let mut config = GatewayConfig::default();
        config.oauth.callback_path = "/oauth/done".into();
        config.oauth.logout_path = "/signout".into();
        config.oauth.authorize_prefix = "/oauth/start".into();
        assert!(validate_config(&config).is_ok());
        let _ = crate::http::HttpServer::new(config).unwrap().into_router();
    }

    #[test]
    fn rejects_relative_paths() {
        let mut config = GatewayConfig::default();
        config.routes.protected_prefixes = vec!["dashboard".into()];
        assert!(fields(&config).contains(&"routes.protected_prefixes[0]".to_string()));
    }
}
