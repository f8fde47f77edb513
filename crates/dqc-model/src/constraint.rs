use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{DqcError, Result};
use crate::value::Value;

/// The check applied to one field by a compiled reference schema.
///
/// Exactly one kind per field. `Present` is the degenerate case: the
/// field is required but carries no value constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConstraintCheck {
    Exact { expected: Value },
    Tolerance { center: f64, tolerance: f64 },
    Pattern { expression: String },
    Present,
}

impl ConstraintCheck {
    /// Inclusive bounds of a tolerance check.
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            ConstraintCheck::Tolerance { center, tolerance } => {
                Some((center - tolerance, center + tolerance))
            }
            _ => None,
        }
    }

    /// Human-readable expected-value description for reports.
    pub fn describe(&self) -> String {
        match self {
            ConstraintCheck::Exact { expected } => expected.to_string(),
            ConstraintCheck::Tolerance { center, tolerance } => {
                format!("{center} ± {tolerance}")
            }
            ConstraintCheck::Pattern { expression } => format!("matches {expression}"),
            ConstraintCheck::Present => "present".to_string(),
        }
    }
}

/// A single per-field constraint within a reference schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConstraint {
    pub field: String,
    pub check: ConstraintCheck,
}

/// The compiled set of constraints for one scan/acquisition type.
///
/// Built once by the constraint compiler and immutable thereafter.
/// Field order is declaration order; names are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSchema {
    scan: String,
    constraints: Vec<FieldConstraint>,
}

impl ReferenceSchema {
    /// Build a schema, rejecting duplicate field names.
    pub fn new(scan: impl Into<String>, constraints: Vec<FieldConstraint>) -> Result<Self> {
        let scan = scan.into();
        let mut seen = BTreeSet::new();
        for constraint in &constraints {
            if !seen.insert(constraint.field.as_str()) {
                return Err(DqcError::schema(format!(
                    "duplicate field '{}' in schema for '{scan}'",
                    constraint.field
                )));
            }
        }
        Ok(Self { scan, constraints })
    }

    pub fn scan(&self) -> &str {
        &self.scan
    }

    pub fn constraints(&self) -> &[FieldConstraint] {
        &self.constraints
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}
