//! Outbound request instrumentation.
//!
//! # Data Flow
//! ```text
//! http::Request (from the application)
//!     → layer.rs (classify host/method/path, open span, apply overrides)
//!     → inner service (e.g. hyper_util legacy client)
//!     → layer.rs (record status code / error on the span)
//!     → http::Response (unchanged)
//! ```

pub mod layer;

pub use layer::{wrap, ApiTrace, ApiTraceLayer};
