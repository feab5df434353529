//! Client span construction.
//!
//! # Responsibilities
//! - Name the tags written onto outbound request spans
//! - Build the `tracing` span for one classified request
//!
//! # Design Decisions
//! - Result fields (status code, error) are declared empty up front and
//!   recorded when the response arrives
//! - Analytics rate is only recorded when configured

use serde::Serialize;
use tracing::field::Empty;
use tracing::Span;

use crate::classifier::ClassificationSource;

/// Component tag value for spans produced by this crate.
pub const COMPONENT_NAME: &str = "google-api";

pub const SPAN_NAME: &str = "http.request";
pub const SPAN_KIND_CLIENT: &str = "client";

/// Tag (span field) names.
pub mod tag {
    pub const SERVICE_NAME: &str = "service.name";
    pub const RESOURCE_NAME: &str = "resource.name";
    pub const COMPONENT: &str = "component";
    pub const SPAN_KIND: &str = "span.kind";
    pub const HTTP_METHOD: &str = "http.method";
    pub const HTTP_URL: &str = "http.url";
    pub const HTTP_STATUS_CODE: &str = "http.status_code";
    pub const ERROR: &str = "error";
    pub const ANALYTICS_RATE: &str = "_dd1.sr.eausr";
}

/// Everything written onto a span before the request is sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanTags {
    pub service_name: String,
    pub resource_name: String,
    pub method: String,
    pub url: String,
    pub analytics_rate: Option<f64>,
    pub source: ClassificationSource,
}

impl SpanTags {
    /// Open an `info` span carrying these tags.
    pub fn span(&self) -> Span {
        // The macro needs literals: name and field names must stay equal to
        // SPAN_NAME and the `tag` constants.
        let span = tracing::info_span!(
            target: "api_tracer::client",
            "http.request",
            service.name = %self.service_name,
            resource.name = %self.resource_name,
            component = COMPONENT_NAME,
            span.kind = SPAN_KIND_CLIENT,
            http.method = %self.method,
            http.url = %self.url,
            http.status_code = Empty,
            error = Empty,
            _dd1.sr.eausr = Empty,
        );
        if let Some(rate) = self.analytics_rate {
            span.record(tag::ANALYTICS_RATE, rate);
        }
        span
    }
}
