//! Request classification.
//!
//! # Responsibilities
//! - Normalize (hostname, method, path) taken from an outbound request
//! - Look the request up in the endpoint tree
//! - Fall back to a deterministic label on a miss
//!
//! # Design Decisions
//! - Total: every input yields a non-empty service and resource name
//! - The enriched/fallback-only choice is made once, when the classifier is built
//! - Pure: no logging, no metrics; a tree hit borrows its labels from the tree

use std::borrow::Cow;
use std::sync::Arc;

use hyper::http::Method;
use serde::Serialize;

use crate::config::TracerConfig;
use crate::endpoints::{self, normalize_host, EndpointTree, TableError};

/// Service name used when no endpoint matches.
pub const FALLBACK_SERVICE: &str = "google";

/// Where a classification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    Endpoint,
    Fallback,
}

impl ClassificationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassificationSource::Endpoint => "endpoint",
            ClassificationSource::Fallback => "fallback",
        }
    }
}

/// The (service, resource) label pair assigned to a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification<'a> {
    pub service_name: Cow<'a, str>,
    pub resource_name: Cow<'a, str>,
    pub source: ClassificationSource,
}

impl Classification<'_> {
    /// Fallback label: `"<METHOD> <hostname>"` under the sentinel service.
    pub fn fallback(host: &str, method: &str) -> Classification<'static> {
        let resource_name = if host.is_empty() {
            method.to_string()
        } else {
            format!("{method} {host}")
        };
        Classification {
            service_name: Cow::Borrowed(FALLBACK_SERVICE),
            resource_name: Cow::Owned(resource_name),
            source: ClassificationSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == ClassificationSource::Fallback
    }
}

/// Classification strategy, fixed at configuration time.
#[derive(Debug, Clone)]
pub enum Classifier {
    /// Look requests up in an endpoint table.
    Enriched(Arc<EndpointTree>),
    /// Always use the fallback label.
    FallbackOnly,
}

impl Classifier {
    /// Classifier backed by the embedded Google API table.
    pub fn embedded() -> Self {
        Classifier::Enriched(endpoints::api_endpoints())
    }

    /// Classifier backed by a caller-supplied table.
    pub fn with_tree(tree: Arc<EndpointTree>) -> Self {
        Classifier::Enriched(tree)
    }

    /// Pick the strategy a tracer configuration asks for.
    ///
    /// A configured table file is loaded here, so a bad file fails setup
    /// rather than the first request.
    pub fn from_config(config: &TracerConfig) -> Result<Self, TableError> {
        if !config.endpoint_metadata {
            return Ok(Classifier::FallbackOnly);
        }
        let tree = match &config.endpoint_table {
            Some(path) => {
                let tree = endpoints::load_from_path(path)?;
                tracing::info!(
                    path = %path.display(),
                    endpoints = tree.len(),
                    "Custom endpoint table loaded"
                );
                Arc::new(tree)
            }
            None => endpoints::init()?,
        };
        Ok(Classifier::Enriched(tree))
    }

    pub fn is_enriched(&self) -> bool {
        matches!(self, Classifier::Enriched(_))
    }

    /// Classify a request. Never fails.
    pub fn classify<'a>(&'a self, host: &str, method: &str, path: &str) -> Classification<'a> {
        let host = normalize_host(host);
        let method = normalize_method(method);

        let Classifier::Enriched(tree) = self else {
            return Classification::fallback(&host, method);
        };

        let record = Method::from_bytes(method.as_bytes())
            .ok()
            .and_then(|m| tree.get(&host, &m, &normalize_path(path)));

        match record {
            Some(record) => Classification {
                service_name: Cow::Borrowed(record.service_name.as_str()),
                resource_name: Cow::Borrowed(record.resource_name.as_str()),
                source: ClassificationSource::Endpoint,
            },
            None => Classification::fallback(&host, method),
        }
    }
}

/// An empty method means GET.
fn normalize_method(method: &str) -> &str {
    let method = method.trim();
    if method.is_empty() {
        "GET"
    } else {
        method
    }
}

/// Drop query and fragment, make the path absolute.
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    if path.starts_with('/') {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(format!("/{path}"))
    }
}
