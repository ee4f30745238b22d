//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{Environment, GatewayConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Overrides the listener bind address.
pub const ENV_BIND: &str = "GATEWAY_BIND";
/// Overrides the upstream base URL.
pub const ENV_BACKEND_URL: &str = "BACKEND_URL";
/// Selects `development` or `production`.
pub const ENV_ENVIRONMENT: &str = "APP_ENV";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid environment variable {name}: {message}")]
    Env { name: &'static str, message: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides and validate the result.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(env) = lookup(ENV_ENVIRONMENT) {
        config.environment = env.parse::<Environment>().map_err(|message| ConfigError::Env {
            name: ENV_ENVIRONMENT,
            message,
        })?;
    }
    if let Some(url) = lookup(ENV_BACKEND_URL).filter(|u| !u.trim().is_empty()) {
        config.upstream.base_url = Some(url);
    }
    if let Some(bind) = lookup(ENV_BIND).filter(|b| !b.trim().is_empty()) {
        config.listener.bind_address = bind;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(
            &mut config,
            lookup(&[
                (ENV_ENVIRONMENT, "production"),
                (ENV_BACKEND_URL, "https://api.example.com"),
                (ENV_BIND, "127.0.0.1:4000"),
            ]),
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.upstream_base_url(), "https://api.example.com");
        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
    }

    #[test]
    fn empty_backend_url_keeps_default() {
        let mut config = GatewayConfig::default();
        apply_env_overrides(&mut config, lookup(&[(ENV_BACKEND_URL, "  ")])).unwrap();
        assert_eq!(config.upstream.base_url, None);
    }

    #[test]
    fn invalid_environment_is_reported() {
        let mut config = GatewayConfig::default();
        let err = apply_env_overrides(&mut config, lookup(&[(ENV_ENVIRONMENT, "staging")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: ENV_ENVIRONMENT, .. }));
    }

    #[test]
    fn loads_file_and_reports_validation_errors() {
        let path = std::env::temp_dir().join(format!("gateway-config-{}.toml", std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[upstream]\ntimeout_secs = 0").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        fs::remove_file(&path).unwrap();

        match err {
            ConfigError::Validation(errors) => {
                assert!(errors.iter().any(|e| e.field == "upstream.timeout_secs"));
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/nonexistent/gateway.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
