//! The embedded Google API endpoint table.
//!
//! The JSON asset is generated from the published API discovery documents and
//! compiled into the binary. It is loaded once per process and never mutated
//! afterwards; every classifier shares the same `Arc`.

use std::sync::{Arc, OnceLock};

use crate::endpoints::loader::{self, TableError};
use crate::endpoints::tree::EndpointTree;
use crate::observability::metrics;

/// Generated table source.
pub const EMBEDDED_TABLE: &str = include_str!("../../data/google_api_endpoints.json");

static API_ENDPOINTS: OnceLock<Arc<EndpointTree>> = OnceLock::new();

/// Load the embedded table, once.
///
/// Call during startup so a defective table fails the process before any
/// request is traced. Later calls return the same tree.
pub fn init() -> Result<Arc<EndpointTree>, TableError> {
    let (tree, fresh) = load_once(&API_ENDPOINTS, EMBEDDED_TABLE)?;
    if fresh {
        metrics::record_table_size(tree.len());
        tracing::info!(
            hosts = tree.hosts().len(),
            endpoints = tree.len(),
            "Embedded endpoint table loaded"
        );
    }
    Ok(tree)
}

/// Fill `cell` from `source` unless it already holds a tree.
///
/// The flag is true only for the caller whose tree was stored. Racing callers
/// may each parse the source, but exactly one of them wins.
fn load_once(
    cell: &OnceLock<Arc<EndpointTree>>,
    source: &str,
) -> Result<(Arc<EndpointTree>, bool), TableError> {
    if let Some(tree) = cell.get() {
        return Ok((Arc::clone(tree), false));
    }
    let loaded = Arc::new(loader::load_from_str(source)?);
    let mut fresh = false;
    let tree = cell.get_or_init(|| {
        fresh = true;
        loaded
    });
    Ok((Arc::clone(tree), fresh))
}

/// The process-wide endpoint tree.
///
/// # Panics
///
/// Panics if the embedded table is malformed. That is a build defect, and
/// [`init`] reports it as an error for callers that want to fail gracefully.
pub fn api_endpoints() -> Arc<EndpointTree> {
    match init() {
        Ok(tree) => tree,
        Err(e) => panic!("embedded endpoint table is malformed: {e}"),
    }
}
