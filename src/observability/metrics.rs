//! Metrics collection.
//!
//! # Metrics
//! - `api_tracer_requests_total` (counter): traced requests by classification outcome
//! - `api_tracer_endpoint_table_entries` (gauge): endpoints in the embedded table
//!
//! # Design Decisions
//! - Facade only; the host application installs an exporter
//! - Without a recorder installed every call is a no-op

use crate::classifier::ClassificationSource;

pub const REQUESTS_TOTAL: &str = "api_tracer_requests_total";
pub const TABLE_ENTRIES: &str = "api_tracer_endpoint_table_entries";

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    ::metrics::describe_counter!(
        REQUESTS_TOTAL,
        "Outbound API requests traced, labelled by classification outcome"
    );
    ::metrics::describe_gauge!(TABLE_ENTRIES, "Endpoints in the embedded endpoint table");
}

/// Count one traced request.
pub fn record_request(source: ClassificationSource) {
    ::metrics::counter!(REQUESTS_TOTAL, "outcome" => source.as_str()).increment(1);
}

/// Publish the size of the loaded endpoint table.
pub fn record_table_size(entries: usize) {
    ::metrics::gauge!(TABLE_ENTRIES).set(entries as f64);
}
