//! Constraint evaluator: one record against one compiled schema.
//!
//! Mismatches are data, not errors: they accumulate as failing verdicts
//! and evaluation continues with the next field. The only error channel
//! is an internally inconsistent schema, which the compiler's contract
//! makes unreachable.

use dqc_model::{
    ComplianceReport, ComplianceVerdict, ConstraintCheck, DqcError, Record, ReferenceSchema,
    Result, Value, value_eq,
};
use dqc_schema::compile_wildcard;

/// Evaluate a record against a schema, in schema declaration order.
///
/// Passing fields are omitted from the report, so an empty report
/// denotes full compliance. Absent fields fail with `actual = None`.
pub fn evaluate(schema: &ReferenceSchema, record: &Record) -> Result<ComplianceReport> {
    let mut verdicts = Vec::new();
    for constraint in schema.constraints() {
        match record.get(&constraint.field) {
            None => verdicts.push(ComplianceVerdict {
                field: constraint.field.clone(),
                actual: None,
                expected: constraint.check.describe(),
                passed: false,
            }),
            Some(actual) => {
                if let Some(expected) = check_value(&constraint.check, actual)? {
                    verdicts.push(ComplianceVerdict {
                        field: constraint.field.clone(),
                        actual: Some(actual.clone()),
                        expected,
                        passed: false,
                    });
                }
            }
        }
    }
    Ok(ComplianceReport {
        scan: schema.scan().to_string(),
        verdicts,
    })
}

/// Apply one check. Returns the expected-value description on failure.
fn check_value(check: &ConstraintCheck, actual: &Value) -> Result<Option<String>> {
    match check {
        ConstraintCheck::Present => Ok(None),
        ConstraintCheck::Exact { expected } => {
            if value_eq(expected, actual) {
                Ok(None)
            } else {
                Ok(Some(expected.to_string()))
            }
        }
        ConstraintCheck::Tolerance { center, tolerance } => {
            let lower = center - tolerance;
            let upper = center + tolerance;
            if !lower.is_finite() || !upper.is_finite() {
                return Err(DqcError::schema(format!(
                    "non-finite tolerance bounds for center {center} ± {tolerance}"
                )));
            }
            match actual.as_f64() {
                Some(v) if v > upper => Ok(Some(format!("must be <= {upper}"))),
                Some(v) if v < lower => Ok(Some(format!("must be >= {lower}"))),
                Some(_) => Ok(None),
                None => Ok(Some(format!("{center} ± {tolerance}"))),
            }
        }
        ConstraintCheck::Pattern { expression } => {
            let regex = compile_wildcard(expression)?;
            if regex.is_match(&actual.to_string()) {
                Ok(None)
            } else {
                Ok(Some(format!("matches {expression}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqc_model::FieldConstraint;

    fn schema(constraints: Vec<(&str, ConstraintCheck)>) -> ReferenceSchema {
        ReferenceSchema::new(
            "T1_MPR",
            constraints
                .into_iter()
                .map(|(field, check)| FieldConstraint {
                    field: field.to_string(),
                    check,
                })
                .collect(),
        )
        .expect("schema")
    }

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn exact_match_uses_numeric_equality() {
        let schema = schema(vec![(
            "RepetitionTime",
            ConstraintCheck::Exact {
                expected: Value::Float(8.0),
            },
        )]);
        let ok = evaluate(&schema, &record(&[("RepetitionTime", Value::Int(8))])).expect("eval");
        assert!(ok.is_compliant());

        let bad = evaluate(
            &schema,
            &record(&[("RepetitionTime", Value::Float(7.999_999))]),
        )
        .expect("eval");
        assert_eq!(bad.failure_count(), 1);
        assert_eq!(bad.verdicts[0].expected, "8");
    }

    #[test]
    fn tolerance_failure_names_the_violated_bound() {
        let schema = schema(vec![(
            "EchoTime",
            ConstraintCheck::Tolerance {
                center: 3.0,
                tolerance: 0.1,
            },
        )]);
        let high = evaluate(&schema, &record(&[("EchoTime", Value::Float(3.2))])).expect("eval");
        assert_eq!(high.verdicts[0].expected, "must be <= 3.1");

        let low = evaluate(&schema, &record(&[("EchoTime", Value::Float(2.5))])).expect("eval");
        assert_eq!(low.verdicts[0].expected, "must be >= 2.9");
    }

    #[test]
    fn missing_field_fails_without_stopping_evaluation() {
        let schema = schema(vec![
            (
                "EchoTime",
                ConstraintCheck::Tolerance {
                    center: 3.0,
                    tolerance: 0.1,
                },
            ),
            (
                "SeriesDescription",
                ConstraintCheck::Pattern {
                    expression: "*T1*".to_string(),
                },
            ),
        ]);
        let report = evaluate(
            &schema,
            &record(&[("SeriesDescription", Value::from("T2_FLAIR"))]),
        )
        .expect("eval");
        assert_eq!(report.failure_count(), 2);
        assert_eq!(report.verdicts[0].field, "EchoTime");
        assert!(report.verdicts[0].actual.is_none());
        assert_eq!(report.verdicts[1].field, "SeriesDescription");
    }

    #[test]
    fn evaluation_is_idempotent() {
        let schema = schema(vec![(
            "SeriesDescription",
            ConstraintCheck::Pattern {
                expression: "*T1*".to_string(),
            },
        )]);
        let input = record(&[("SeriesDescription", Value::from("Another_Sequence"))]);
        let first = evaluate(&schema, &input).expect("eval");
        let second = evaluate(&schema, &input).expect("eval");
        assert_eq!(first, second);
    }

    mod boundaries {
        use super::*;
        use proptest::prelude::*;

        fn echo_schema() -> ReferenceSchema {
            schema(vec![(
                "EchoTime",
                ConstraintCheck::Tolerance {
                    center: 3.0,
                    tolerance: 0.1,
                },
            )])
        }

        proptest! {
            #[test]
            fn values_inside_the_window_pass(v in 2.9f64..=3.1f64) {
                let report = evaluate(&echo_schema(), &record(&[("EchoTime", Value::Float(v))]))
                    .expect("eval");
                prop_assert!(report.is_compliant());
            }

            #[test]
            fn values_outside_the_window_fail(eps in 1e-9f64..10.0f64) {
                let high = evaluate(
                    &echo_schema(),
                    &record(&[("EchoTime", Value::Float(3.1 + eps))]),
                )
                .expect("eval");
                prop_assert_eq!(high.failure_count(), 1);

                let low = evaluate(
                    &echo_schema(),
                    &record(&[("EchoTime", Value::Float(2.9 - eps))]),
                )
                .expect("eval");
                prop_assert_eq!(low.failure_count(), 1);
            }
        }

        #[test]
        fn bounds_themselves_pass() {
            for v in [2.9, 3.1] {
                let report = evaluate(&echo_schema(), &record(&[("EchoTime", Value::Float(v))]))
                    .expect("eval");
                assert!(report.is_compliant(), "boundary value {v} must pass");
            }
        }
    }
}
