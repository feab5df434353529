//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (analytics rate within 0..=1)
//! - Reject overrides that would produce empty span tags
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ApiTracerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;

use crate::config::schema::ApiTracerConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("tracer.analytics_rate must be between 0.0 and 1.0, got {0}")]
    AnalyticsRate(f64),

    #[error("tracer.service_name must not be empty")]
    EmptyServiceName,

    #[error("tracer.endpoint_table must not be empty")]
    EmptyTablePath,

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    LogLevel(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ApiTracerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let tracer = &config.tracer;

    if let Some(rate) = tracer.analytics_rate {
        if !(0.0..=1.0).contains(&rate) {
            errors.push(ValidationError::AnalyticsRate(rate));
        }
    }

    if matches!(&tracer.service_name, Some(name) if name.trim().is_empty()) {
        errors.push(ValidationError::EmptyServiceName);
    }

    if matches!(&tracer.endpoint_table, Some(path) if path.as_os_str().is_empty()) {
        errors.push(ValidationError::EmptyTablePath);
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
