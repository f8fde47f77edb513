//! Constraint compiler: declarative field descriptors to a compiled
//! [`ReferenceSchema`].
//!
//! Compilation is pure and errors only on malformed input (tolerance
//! without a center, invalid pattern, unknown scan or group). Semantic
//! mismatches against real data are the evaluator's job.

use dqc_model::{ConstraintCheck, DqcError, FieldConstraint, Record, ReferenceSchema, Result};

use crate::document::{FieldSpec, SchemaDocument};
use crate::wildcard::compile_wildcard;

/// Compile one field descriptor into a concrete constraint.
pub fn compile_field(spec: &FieldSpec) -> Result<FieldConstraint> {
    let check = compile_check(spec)?;
    Ok(FieldConstraint {
        field: spec.field.clone(),
        check,
    })
}

fn compile_check(spec: &FieldSpec) -> Result<ConstraintCheck> {
    if let Some(pattern) = &spec.pattern {
        if spec.value.is_some() || spec.tolerance.is_some() {
            return Err(DqcError::schema(format!(
                "field '{}': pattern cannot be combined with value or tolerance",
                spec.field
            )));
        }
        // Validate eagerly so evaluation never sees an uncompilable pattern.
        compile_wildcard(pattern)?;
        return Ok(ConstraintCheck::Pattern {
            expression: pattern.clone(),
        });
    }
    match (&spec.value, spec.tolerance) {
        (Some(value), Some(tolerance)) => {
            let center = value.as_f64().ok_or_else(|| {
                DqcError::schema(format!(
                    "field '{}': tolerance requires a numeric value",
                    spec.field
                ))
            })?;
            validate_tolerance(&spec.field, tolerance)?;
            Ok(ConstraintCheck::Tolerance { center, tolerance })
        }
        (Some(value), None) => Ok(ConstraintCheck::Exact {
            expected: value.clone(),
        }),
        (None, Some(_)) => Err(DqcError::schema(format!(
            "field '{}': tolerance without a value",
            spec.field
        ))),
        (None, None) => Ok(ConstraintCheck::Present),
    }
}

fn validate_tolerance(field: &str, tolerance: f64) -> Result<()> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(DqcError::schema(format!(
            "field '{field}': tolerance must be a non-negative number"
        )));
    }
    Ok(())
}

/// Compile the acquisition-level constraints for one scan identifier.
pub fn compile_acquisition(doc: &SchemaDocument, scan: &str) -> Result<ReferenceSchema> {
    let acquisition = doc.acquisitions.get(scan).ok_or_else(|| {
        DqcError::schema(format!("scan '{scan}' not found in reference document"))
    })?;
    let constraints = acquisition
        .fields
        .iter()
        .map(compile_field)
        .collect::<Result<Vec<_>>>()?;
    ReferenceSchema::new(scan, constraints)
}

/// Compile constraints for a named group, merged over the acquisition's
/// own fields. Group descriptors win on duplicate field names while the
/// field keeps its original position.
pub fn compile_group(doc: &SchemaDocument, scan: &str, group: &str) -> Result<ReferenceSchema> {
    let acquisition = doc.acquisitions.get(scan).ok_or_else(|| {
        DqcError::schema(format!("scan '{scan}' not found in reference document"))
    })?;
    let group_spec = acquisition
        .groups
        .iter()
        .find(|g| g.name == group)
        .ok_or_else(|| {
            DqcError::schema(format!("group '{group}' not found in acquisition '{scan}'"))
        })?;

    let mut merged: Vec<FieldSpec> = acquisition.fields.clone();
    for field in &group_spec.fields {
        match merged.iter_mut().find(|f| f.field == field.field) {
            Some(existing) => *existing = field.clone(),
            None => merged.push(field.clone()),
        }
    }

    let constraints = merged
        .iter()
        .map(compile_field)
        .collect::<Result<Vec<_>>>()?;
    ReferenceSchema::new(scan, constraints)
}

/// Build a schema by reading expected values from a concrete reference
/// record.
///
/// Each requested field becomes an `Exact` constraint on the record's
/// value, unless an override descriptor supplies its own `value`,
/// `tolerance` (center read from the record), or `pattern`. A requested
/// field absent from the record is a schema error.
pub fn compile_from_record(
    scan: &str,
    record: &Record,
    field_names: &[String],
    overrides: &[FieldSpec],
) -> Result<ReferenceSchema> {
    let mut constraints = Vec::with_capacity(field_names.len());
    for name in field_names {
        let spec = overrides.iter().find(|s| &s.field == name);
        let check = match spec {
            Some(spec) if spec.value.is_some() || spec.pattern.is_some() => compile_check(spec)?,
            _ => {
                let value = record.get(name).ok_or_else(|| {
                    DqcError::schema(format!(
                        "field '{name}' not present in reference record for '{scan}'"
                    ))
                })?;
                match spec.and_then(|s| s.tolerance) {
                    Some(tolerance) => {
                        let center = value.as_f64().ok_or_else(|| {
                            DqcError::schema(format!(
                                "field '{name}': tolerance requires a numeric reference value"
                            ))
                        })?;
                        validate_tolerance(name, tolerance)?;
                        ConstraintCheck::Tolerance { center, tolerance }
                    }
                    None => ConstraintCheck::Exact {
                        expected: value.clone(),
                    },
                }
            }
        };
        constraints.push(FieldConstraint {
            field: name.clone(),
            check,
        });
    }
    ReferenceSchema::new(scan, constraints)
}
