//! Command implementations for `check` and `session`.

use anyhow::{Context, Result};
use tracing::{debug, info};

use dqc_match::{MappingSession, MatchEngine, MatchOptions};
use dqc_model::{ComplianceReport, GROUP_COLUMN, ReferenceSchema};
use dqc_report::{SessionReport, flat_entries, write_report_json};
use dqc_schema::{SchemaDocument, compile_acquisition, compile_group};
use dqc_validate::evaluate;

use crate::cli::{CheckArgs, SessionArgs};
use crate::input::{load_record, load_session};
use crate::render::{print_check_summary, print_session_summary};
use crate::resolver::StdinResolver;

/// Result of the `session` command.
#[derive(Debug)]
pub struct SessionOutcome {
    pub report: SessionReport,
    pub compliant: bool,
}

pub fn run_check(args: &CheckArgs) -> Result<ComplianceReport> {
    let doc = SchemaDocument::from_path(&args.schema)
        .with_context(|| format!("loading schema from {}", args.schema.display()))?;
    let schema = match &args.group {
        Some(group) => compile_group(&doc, &args.scan, group)?,
        None => compile_acquisition(&doc, &args.scan)?,
    };
    let record = load_record(&args.record)?;
    let report = evaluate(&schema, &record)?;
    info!(
        scan = %report.scan,
        failures = report.failure_count(),
        "compliance check complete"
    );

    print_check_summary(&report);
    if let Some(path) = &args.output {
        write_report_json(path, &report)?;
    }
    Ok(report)
}

pub fn run_session(args: &SessionArgs) -> Result<SessionOutcome> {
    let doc = SchemaDocument::from_path(&args.schema)
        .with_context(|| format!("loading schema from {}", args.schema.display()))?;
    let references = compile_references(&doc)?;
    let table = load_session(&args.session)?;
    info!(
        references = references.len(),
        acquisitions = table.acquisitions().len(),
        rows = table.len(),
        "session loaded"
    );

    let engine = MatchEngine::new(references);
    let mut session = MappingSession::new(
        &engine,
        &table,
        MatchOptions {
            interactive: args.interactive,
        },
    );
    if args.interactive {
        session.resolve(&mut StdinResolver::new());
    }
    let mapping = session.freeze();

    let mut reports = Vec::new();
    for (input, reference) in mapping.matched() {
        let rows = table.acquisition_rows(input);
        let Some(record) = rows.rows().first() else {
            continue;
        };
        debug!(input = %input, reference = %reference, "evaluating acquisition");
        let schema = compile_acquisition(&doc, reference)?;
        reports.push((input.to_string(), None, evaluate(&schema, record)?));

        // Each group the reference defines is checked against the first
        // row carrying that group label; groups absent from the session
        // are skipped, as are session groups the reference never names.
        for group in doc.group_names(reference) {
            let Some(record) = rows
                .rows()
                .iter()
                .find(|row| row.get(GROUP_COLUMN).is_some_and(|v| v.to_string() == group))
            else {
                continue;
            };
            debug!(input = %input, reference = %reference, group = %group, "evaluating group");
            let schema = compile_group(&doc, reference, group)?;
            reports.push((input.to_string(), Some(group.to_string()), evaluate(&schema, record)?));
        }
    }

    let report = SessionReport::new(flat_entries(&mapping, &reports));
    print_session_summary(&report);
    if let Some(path) = &args.output {
        if args.nested {
            write_report_json(path, &report.nested())?;
        } else {
            write_report_json(path, &report)?;
        }
    }

    let compliant = report.is_compliant();
    Ok(SessionOutcome { report, compliant })
}

fn compile_references(doc: &SchemaDocument) -> Result<Vec<ReferenceSchema>> {
    let mut references = Vec::new();
    for scan in doc.scan_names() {
        references.push(compile_acquisition(doc, scan)?);
    }
    Ok(references)
}
