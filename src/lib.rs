//! Google API request tracing.
//!
//! Classifies outbound Google API requests by `(hostname, method, path)` into a
//! stable `(service, resource)` pair and tags a client span with it.
//!
//! ```text
//!   application request
//!        │
//!        ▼
//!   client::ApiTraceLayer ──▶ classifier::Classifier ──▶ endpoints::EndpointTree
//!        │                          (fallback on miss)         (immutable, shared)
//!        ▼
//!   span tags + inner HTTP service
//! ```

pub mod classifier;
pub mod client;
pub mod config;
pub mod endpoints;
pub mod observability;

pub use classifier::{Classification, ClassificationSource, Classifier, FALLBACK_SERVICE};
pub use client::{ApiTrace, ApiTraceLayer};
pub use config::{ApiTracerConfig, TracerConfig};
pub use endpoints::{EndpointRecord, EndpointTree};
