use serde::{Deserialize, Serialize};

use crate::value::Value;

/// The result of checking one field of one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceVerdict {
    pub field: String,
    /// Observed value; `None` when the field was absent from the record.
    pub actual: Option<Value>,
    /// Description of what the constraint expected.
    pub expected: String,
    pub passed: bool,
}

/// Failing verdicts for one record against one reference schema.
///
/// Passing fields are omitted, so an empty report denotes full
/// compliance. Verdict order follows schema declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub scan: String,
    pub verdicts: Vec<ComplianceVerdict>,
}

impl ComplianceReport {
    pub fn is_compliant(&self) -> bool {
        self.verdicts.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.verdicts.len()
    }
}

/// One frequency-counted distinct combination of grouped field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    /// Key values in target-field order.
    pub values: Vec<Value>,
    pub count: u64,
}

/// The result of one rule invocation during grouped validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub acquisition: String,
    pub fields: Vec<String>,
    pub rule: String,
    /// Grouped rows the rule observed; empty when the rule never ran
    /// (missing fields) or for dataset-level rules.
    pub observed: Vec<GroupRow>,
    /// Failure message; `None` on success.
    pub message: Option<String>,
    pub passed: bool,
}

/// Accumulated outcomes of one `validate` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationRun {
    pub passed: bool,
    pub failures: Vec<ValidationOutcome>,
    pub successes: Vec<ValidationOutcome>,
}

impl ValidationRun {
    pub fn outcome_count(&self) -> usize {
        self.failures.len() + self.successes.len()
    }
}
