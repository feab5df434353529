//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Client layer produces:
//!     → spans.rs (one span per outbound request, tagged with the classification)
//!     → metrics.rs (request counter by outcome, table size gauge)
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → Whatever tracing subscriber / metrics recorder the host installs
//!     → stderr via init_logging for the CLI
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Metrics are cheap (no-op without a recorder)
//! - Span tags use the tracer's dotted names so exporters map them 1:1

pub mod logging;
pub mod metrics;
pub mod spans;
