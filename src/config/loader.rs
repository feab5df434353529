//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ApiTracerConfig, TracerConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Enables analytics at full rate when no rate is configured.
pub const ANALYTICS_ENABLED_ENV: &str = "API_TRACER_ANALYTICS_ENABLED";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

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

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ApiTracerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content, |key| std::env::var(key).ok())
}

/// Parse, apply environment overrides and validate.
///
/// `env` resolves environment variables; tests pass a closure instead of
/// touching the process environment.
pub fn parse_config<F>(content: &str, env: F) -> Result<ApiTracerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: ApiTracerConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config, env);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides to an already parsed configuration.
pub fn apply_env_overrides<F>(config: &mut ApiTracerConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    apply_tracer_env_overrides(&mut config.tracer, env);
}

/// Apply environment overrides to tracer settings.
pub fn apply_tracer_env_overrides<F>(tracer: &mut TracerConfig, env: F)
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = env(ANALYTICS_ENABLED_ENV) else {
        return;
    };
    match parse_bool(&raw) {
        Some(true) if tracer.analytics_rate.is_none() => {
            tracer.analytics_rate = Some(1.0);
        }
        Some(_) => {}
        None => {
            tracing::warn!(
                variable = ANALYTICS_ENABLED_ENV,
                value = %raw,
                "Ignoring non-boolean environment override"
            );
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
