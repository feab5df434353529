//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → ApiTracerConfig (validated, immutable)
//!     → TracerConfig handed to the client layer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Builder methods on TracerConfig for programmatic setup
//! - Without a file, `ApiTracerConfig::from_env` still applies environment overrides

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{ApiTracerConfig, LogFormat, ObservabilityConfig, TracerConfig};
pub use validation::{validate_config, ValidationError};
