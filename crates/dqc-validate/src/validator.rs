//! Grouped validator: executes a [`RuleSet`] against a session table,
//! acquisition by acquisition.

use tracing::debug;

use dqc_model::{DataTable, SESSION_ACQUISITION, ValidationOutcome, ValidationRun};

use crate::group::group_by;
use crate::rules::RuleSet;

/// Executes a fixed rule set over tabular session data keyed by
/// acquisition identity.
#[derive(Debug)]
pub struct GroupedValidator {
    rules: RuleSet,
}

impl GroupedValidator {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Run every rule and accumulate outcomes.
    ///
    /// Per acquisition (first-appearance order), field-rule groups run
    /// in registration order. A group whose target fields are missing
    /// from the acquisition's columns yields one failing outcome and is
    /// skipped. Dataset-level rules run once afterwards against the
    /// whole table. Every invocation lands in exactly one of
    /// `failures`/`successes`; `passed` is the conjunction.
    pub fn validate(&self, table: &DataTable) -> ValidationRun {
        let mut failures = Vec::new();
        let mut successes = Vec::new();

        for acquisition in table.acquisitions() {
            let acquisition_table = table.acquisition_rows(&acquisition);
            debug!(
                acquisition = %acquisition,
                rows = acquisition_table.len(),
                "validating acquisition"
            );

            for (fields, rules) in self.rules.field_rule_groups() {
                let missing: Vec<&str> = fields
                    .iter()
                    .filter(|f| !acquisition_table.has_column(f))
                    .map(String::as_str)
                    .collect();
                if !missing.is_empty() {
                    failures.push(ValidationOutcome {
                        acquisition: acquisition.clone(),
                        fields: fields.to_vec(),
                        rule: rules[0].description.clone(),
                        observed: Vec::new(),
                        message: Some(format!("missing fields: {}", missing.join(", "))),
                        passed: false,
                    });
                    continue;
                }

                let grouped = group_by(&acquisition_table, fields);
                for rule in rules {
                    let outcome = ValidationOutcome {
                        acquisition: acquisition.clone(),
                        fields: fields.to_vec(),
                        rule: rule.description.clone(),
                        observed: grouped.clone(),
                        message: None,
                        passed: true,
                    };
                    match (rule.check)(&grouped) {
                        Ok(()) => successes.push(outcome),
                        Err(violation) => failures.push(ValidationOutcome {
                            message: Some(violation.message),
                            passed: false,
                            ..outcome
                        }),
                    }
                }
            }
        }

        for rule in &self.rules.dataset_rules {
            let outcome = ValidationOutcome {
                acquisition: SESSION_ACQUISITION.to_string(),
                fields: Vec::new(),
                rule: rule.description.clone(),
                observed: Vec::new(),
                message: None,
                passed: true,
            };
            match (rule.check)(table) {
                Ok(()) => successes.push(outcome),
                Err(violation) => failures.push(ValidationOutcome {
                    message: Some(violation.message),
                    passed: false,
                    ..outcome
                }),
            }
        }

        ValidationRun {
            passed: failures.is_empty(),
            failures,
            successes,
        }
    }
}
