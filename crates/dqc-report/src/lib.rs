//! Deterministic JSON report payloads for compliance runs.

mod payload;
mod writer;

pub use payload::{
    NestedAcquisition, NestedGroup, NestedReport, ParameterEntry, REPORT_SCHEMA,
    REPORT_SCHEMA_VERSION, ReportEntry, SessionReport, flat_entries,
};
pub use writer::write_report_json;
