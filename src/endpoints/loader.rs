//! Endpoint table loading.
//!
//! Turns the generated JSON description of known endpoints into an
//! [`EndpointTree`]:
//!
//! ```json
//! {
//!   "storage.googleapis.com": [
//!     {
//!       "path": "/storage/v1/b/{bucket}/o/{object}",
//!       "methods": {
//!         "GET": { "service": "storage", "resource": "storage.objects.get" }
//!       }
//!     }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use hyper::http::Method;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::endpoints::host::normalize_host;
use crate::endpoints::pattern::{PathPattern, PatternError};
use crate::endpoints::tree::{EndpointRecord, EndpointTree};

/// Error type for endpoint table loading.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to read endpoint table: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed endpoint table: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("endpoint table contains an empty hostname")]
    EmptyHost,

    #[error("invalid path template '{template}' for {host}: {source}")]
    Pattern {
        host: String,
        template: String,
        #[source]
        source: PatternError,
    },

    #[error("invalid HTTP method '{method}' for {host}{template}")]
    Method {
        host: String,
        template: String,
        method: String,
    },

    #[error("empty service or resource label for {method} {host}{template}")]
    EmptyLabel {
        host: String,
        template: String,
        method: String,
    },

    #[error("endpoint registered twice: {method} {host}{template}")]
    Duplicate {
        host: String,
        template: String,
        method: String,
    },
}

/// Serialized form of the table: hostname to its path patterns.
pub type TableSpec = BTreeMap<String, Vec<PatternSpec>>;

/// One path pattern with the labels of each method registered on it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PatternSpec {
    pub path: String,
    pub methods: BTreeMap<String, LabelSpec>,
}

/// The (service, resource) labels of one endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LabelSpec {
    pub service: String,
    pub resource: String,
}

/// Parse a JSON table and build the tree.
pub fn load_from_str(json: &str) -> Result<EndpointTree, TableError> {
    let spec: TableSpec = serde_json::from_str(json)?;
    build_tree(&spec)
}

/// Read a JSON table from disk and build the tree.
pub fn load_from_path(path: &Path) -> Result<EndpointTree, TableError> {
    let content = fs::read_to_string(path)?;
    load_from_str(&content)
}

/// Build a tree from an already deserialized table.
///
/// Hostnames are stored in canonical form, so `Storage.GoogleAPIs.com` and
/// `localhost:8080` keys match requests the classifier normalizes.
pub fn build_tree(spec: &TableSpec) -> Result<EndpointTree, TableError> {
    let mut tree = EndpointTree::new();

    for (host, patterns) in spec {
        let key = normalize_host(host);
        if key.is_empty() {
            return Err(TableError::EmptyHost);
        }
        for entry in patterns {
            let pattern = PathPattern::parse(&entry.path).map_err(|source| TableError::Pattern {
                host: host.clone(),
                template: entry.path.clone(),
                source,
            })?;

            for (method, label) in &entry.methods {
                let parsed = parse_method(method).ok_or_else(|| TableError::Method {
                    host: host.clone(),
                    template: entry.path.clone(),
                    method: method.clone(),
                })?;
                if label.service.is_empty() || label.resource.is_empty() {
                    return Err(TableError::EmptyLabel {
                        host: host.clone(),
                        template: entry.path.clone(),
                        method: method.clone(),
                    });
                }

                let record = EndpointRecord {
                    service_name: label.service.clone(),
                    resource_name: label.resource.clone(),
                    path_template: entry.path.clone(),
                };
                tree.insert(&key, parsed, &pattern, record)
                    .map_err(|_| TableError::Duplicate {
                        host: host.clone(),
                        template: entry.path.clone(),
                        method: method.clone(),
                    })?;
            }
        }
    }

    tracing::debug!(hosts = spec.len(), endpoints = tree.len(), "Endpoint table built");
    Ok(tree)
}

/// Table methods must be upper-case tokens.
fn parse_method(method: &str) -> Option<Method> {
    if method.is_empty() || !method.bytes().all(|b| b.is_ascii_uppercase()) {
        return None;
    }
    Method::from_bytes(method.as_bytes()).ok()
}
