//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Root configuration for the session gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Deployment environment (controls cookie `Secure` and upstream default).
    pub environment: Environment,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream API settings.
    pub upstream: UpstreamConfig,

    /// Proxy relay settings.
    pub proxy: ProxyConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Route classification used by the route guard.
    pub routes: RoutesConfig,

    /// OAuth completion, initiation and logout paths.
    pub oauth: OAuthConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Whether same-site cookie writes carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Upstream base URL with any trailing slash removed.
    ///
    /// Falls back to the environment default when none is configured.
    pub fn upstream_base_url(&self) -> String {
        let base = match &self.upstream.base_url {
            Some(url) => url.as_str(),
            None => self.environment.default_upstream_url(),
        };
        base.trim_end_matches('/').to_string()
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Upstream base URL used when none is configured.
    pub fn default_upstream_url(&self) -> &'static str {
        match self {
            Environment::Development => "http://localhost:8080",
            Environment::Production => "http://app:8080",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the backend API. `None` selects the environment default.
    pub base_url: Option<String>,

    /// Fixed path segment inserted between the base URL and the tail path.
    pub api_segment: String,

    /// Total timeout for one upstream call in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_segment: "api".to_string(),
            timeout_secs: 30,
            connect_timeout_secs: 5,
        }
    }
}

/// Proxy relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Inbound path prefix forwarded to upstream.
    pub prefix: String,

    /// Maximum inbound body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            prefix: "/api".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie name shared with upstream.
    pub cookie_name: String,

    /// Lifetime of an established session in seconds.
    pub ttl_secs: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "token".to_string(),
            ttl_secs: 60 * 60 * 24,
        }
    }
}

/// Route classification for the route guard.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Prefixes that require an active session.
    pub protected_prefixes: Vec<String>,

    /// Prefixes that redirect away when a session is already active.
    pub guest_only_prefixes: Vec<String>,

    /// Where unauthenticated visitors are sent.
    pub sign_in_path: String,

    /// Where authenticated visitors land.
    pub landing_path: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            protected_prefixes: vec![
                "/dashboard".to_string(),
                "/admin".to_string(),
                "/profile".to_string(),
            ],
            guest_only_prefixes: vec!["/auth/login".to_string(), "/auth/signup".to_string()],
            sign_in_path: "/auth/login".to_string(),
            landing_path: "/dashboard".to_string(),
        }
    }
}

/// OAuth and session endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OAuthConfig {
    /// Redirect target of the provider flow; receives `token`/`error`.
    pub callback_path: String,

    /// Local logout endpoint.
    pub logout_path: String,

    /// Prefix of the initiation endpoint (`<prefix>/{provider}`).
    pub authorize_prefix: String,

    /// Providers the upstream can start a flow for.
    pub providers: Vec<String>,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            callback_path: "/auth/callback".to_string(),
            logout_path: "/auth/logout".to_string(),
            authorize_prefix: "/auth/oauth".to_string(),
            providers: vec!["kakao".to_string()],
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log format. `None` picks JSON in production, pretty otherwise.
    pub log_format: Option<LogFormat>,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: None,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
