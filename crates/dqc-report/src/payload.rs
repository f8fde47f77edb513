//! Report payloads: flat and nested views of a compliance run.
//!
//! Payloads carry no time-dependent content, so identical inputs
//! serialize to byte-identical files.

use serde::{Deserialize, Serialize};

use dqc_model::{AcquisitionMapping, ComplianceReport, ValidationRun};

pub const REPORT_SCHEMA: &str = "dicom-qc.compliance-report";
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// One failing check in the flat report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportEntry {
    pub acquisition: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    pub parameter: String,
    pub value: String,
    pub expected: String,
    pub pass: bool,
}

/// The flat session report: one entry per failing check, ordered by
/// acquisition and schema field order, unmatched acquisitions last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub schema: String,
    pub schema_version: u32,
    pub entries: Vec<ReportEntry>,
    /// Grouped-validation outcomes, when rules were run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<ValidationRun>,
}

impl SessionReport {
    pub fn new(entries: Vec<ReportEntry>) -> Self {
        Self {
            schema: REPORT_SCHEMA.to_string(),
            schema_version: REPORT_SCHEMA_VERSION,
            entries,
            rules: None,
        }
    }

    #[must_use]
    pub fn with_rules(mut self, rules: ValidationRun) -> Self {
        self.rules = Some(rules);
        self
    }

    pub fn is_compliant(&self) -> bool {
        self.entries.is_empty() && self.rules.as_ref().is_none_or(|r| r.passed)
    }

    /// Re-shape the flat entries into the nested per-acquisition view.
    pub fn nested(&self) -> NestedReport {
        let mut acquisitions: Vec<NestedAcquisition> = Vec::new();
        for entry in &self.entries {
            let a = match acquisitions
                .iter()
                .position(|a| a.acquisition == entry.acquisition)
            {
                Some(i) => i,
                None => {
                    acquisitions.push(NestedAcquisition {
                        acquisition: entry.acquisition.clone(),
                        groups: Vec::new(),
                    });
                    acquisitions.len() - 1
                }
            };
            let groups = &mut acquisitions[a].groups;
            let g = match groups.iter().position(|g| g.name == entry.group) {
                Some(i) => i,
                None => {
                    groups.push(NestedGroup {
                        name: entry.group.clone(),
                        parameters: Vec::new(),
                    });
                    groups.len() - 1
                }
            };
            groups[g].parameters.push(ParameterEntry {
                parameter: entry.parameter.clone(),
                value: entry.value.clone(),
                expected: entry.expected.clone(),
                pass: entry.pass,
            });
        }
        NestedReport {
            schema: REPORT_SCHEMA.to_string(),
            schema_version: REPORT_SCHEMA_VERSION,
            acquisitions,
        }
    }
}

/// Nested view: entries folded under their acquisition and group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NestedReport {
    pub schema: String,
    pub schema_version: u32,
    pub acquisitions: Vec<NestedAcquisition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NestedAcquisition {
    pub acquisition: String,
    pub groups: Vec<NestedGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NestedGroup {
    /// `None` for checks outside any named group.
    pub name: Option<String>,
    pub parameters: Vec<ParameterEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterEntry {
    pub parameter: String,
    pub value: String,
    pub expected: String,
    pub pass: bool,
}

/// Flatten per-acquisition compliance reports plus the frozen mapping
/// into report entries.
///
/// Entries keep the order of `reports` (acquisition order) and, within
/// one report, schema field order. Acquisitions the mapping left
/// unmatched are appended as non-fatal rows rather than errors.
pub fn flat_entries(
    mapping: &AcquisitionMapping,
    reports: &[(String, Option<String>, ComplianceReport)],
) -> Vec<ReportEntry> {
    let mut entries = Vec::new();
    for (acquisition, group, report) in reports {
        for verdict in &report.verdicts {
            entries.push(ReportEntry {
                acquisition: acquisition.clone(),
                group: group.clone(),
                parameter: verdict.field.clone(),
                value: verdict
                    .actual
                    .as_ref()
                    .map_or_else(|| "N/A".to_string(), ToString::to_string),
                expected: verdict.expected.clone(),
                pass: verdict.passed,
            });
        }
    }
    for input in mapping.unmatched() {
        entries.push(ReportEntry {
            acquisition: input.to_string(),
            group: None,
            parameter: "Acquisition".to_string(),
            value: "unmatched".to_string(),
            expected: "reference acquisition".to_string(),
            pass: false,
        });
    }
    entries
}
