//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the tracer.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::loader::apply_tracer_env_overrides;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ApiTracerConfig {
    /// Request tagging settings.
    pub tracer: TracerConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

impl ApiTracerConfig {
    /// Defaults with environment overrides applied, for running without a
    /// config file.
    pub fn from_env() -> Self {
        Self {
            tracer: TracerConfig::from_env(),
            ..Self::default()
        }
    }
}

/// Request tagging configuration.
///
/// `Default` never reads the environment; use [`TracerConfig::from_env`] to
/// honor `API_TRACER_ANALYTICS_ENABLED`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TracerConfig {
    /// Replaces the classified service name on every span.
    pub service_name: Option<String>,

    /// Analytics sample rate (0.0 to 1.0). Unset means no analytics tag.
    pub analytics_rate: Option<f64>,

    /// Classify requests against the endpoint table.
    /// When false every request gets the fallback label.
    pub endpoint_metadata: bool,

    /// Load endpoints from this JSON file instead of the embedded table.
    pub endpoint_table: Option<PathBuf>,
}

impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            service_name: None,
            analytics_rate: None,
            endpoint_metadata: true,
            endpoint_table: None,
        }
    }
}

impl TracerConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides resolved through `env`.
    pub fn with_env_overrides<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        apply_tracer_env_overrides(&mut self, env);
        self
    }

    /// Override the service name reported on spans.
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }

    /// Enable analytics at full rate, or disable it.
    pub fn with_analytics(mut self, enabled: bool) -> Self {
        self.analytics_rate = enabled.then_some(1.0);
        self
    }

    /// Set the analytics sample rate.
    pub fn with_analytics_rate(mut self, rate: f64) -> Self {
        self.analytics_rate = Some(rate);
        self
    }

    /// Skip endpoint classification; every span gets the fallback label.
    pub fn with_endpoint_metadata_disabled(mut self) -> Self {
        self.endpoint_metadata = false;
        self
    }

    /// Use a custom endpoint table file.
    pub fn with_endpoint_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.endpoint_table = Some(path.into());
        self
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
