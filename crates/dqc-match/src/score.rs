//! Field-difference scoring between an observed value and a reference
//! constraint.
//!
//! Differences are small non-negative costs: 0 means the value satisfies
//! the constraint, larger means further away. Totals over an acquisition
//! drive the one-to-one assignment in the engine.

use rapidfuzz::distance::levenshtein;

use dqc_model::{ConstraintCheck, Value, value_eq};
use dqc_schema::{compile_wildcard, is_wildcard};

/// Cap on any single field difference.
pub const MAX_DIFF_SCORE: f64 = 10.0;
/// Flat penalty for a value that fails a wildcard pattern.
const PATTERN_MISS_PENALTY: f64 = 5.0;

/// Cost of `actual` against one reference constraint.
///
/// `None` (the field is absent from the record) always costs the cap.
pub fn field_difference(check: &ConstraintCheck, actual: Option<&Value>) -> f64 {
    let Some(actual) = actual else {
        return MAX_DIFF_SCORE;
    };

    match check {
        ConstraintCheck::Present => 0.0,
        ConstraintCheck::Pattern { expression } => pattern_difference(expression, actual),
        ConstraintCheck::Tolerance { center, tolerance } => match actual.as_f64() {
            Some(observed) if (observed - center).abs() <= *tolerance => 0.0,
            Some(observed) => (observed - center).abs().min(MAX_DIFF_SCORE),
            None => MAX_DIFF_SCORE,
        },
        ConstraintCheck::Exact { expected } => {
            if value_eq(expected, actual) {
                return 0.0;
            }
            // A string expectation carrying wildcard metacharacters is
            // scored as a pattern, not by edit distance.
            if let Value::Str(expression) = expected {
                if is_wildcard(expression) {
                    return pattern_difference(expression, actual);
                }
            }
            if let (Some(e), Some(a)) = (expected.as_f64(), actual.as_f64()) {
                return (e - a).abs().min(MAX_DIFF_SCORE);
            }
            if let (Value::List(expected), Value::List(actual)) = (expected, actual) {
                return list_difference(expected, actual);
            }
            string_difference(&expected.to_string(), &actual.to_string())
        }
    }
}

fn pattern_difference(expression: &str, actual: &Value) -> f64 {
    let matched =
        compile_wildcard(expression).is_ok_and(|re| re.is_match(&actual.to_string()));
    if matched { 0.0 } else { PATTERN_MISS_PENALTY }
}

/// Element-wise Levenshtein over string forms; the shorter list is
/// padded with empty strings.
fn list_difference(expected: &[Value], actual: &[Value]) -> f64 {
    let len = expected.len().max(actual.len());
    let mut total = 0.0;
    for i in 0..len {
        let e = expected.get(i).map(Value::to_string).unwrap_or_default();
        let a = actual.get(i).map(Value::to_string).unwrap_or_default();
        total += levenshtein::distance(e.chars(), a.chars()) as f64;
    }
    total.min(MAX_DIFF_SCORE)
}

fn string_difference(expected: &str, actual: &str) -> f64 {
    (levenshtein::distance(expected.chars(), actual.chars()) as f64).min(MAX_DIFF_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn satisfied_constraints_cost_nothing() {
        assert_eq!(field_difference(&ConstraintCheck::Present, Some(&Value::Int(1))), 0.0);
        assert_eq!(
            field_difference(
                &ConstraintCheck::Exact { expected: Value::Int(8) },
                Some(&Value::Float(8.0)),
            ),
            0.0
        );
        assert_eq!(
            field_difference(
                &ConstraintCheck::Tolerance { center: 3.0, tolerance: 0.1 },
                Some(&Value::Float(2.95)),
            ),
            0.0
        );
        assert_eq!(
            field_difference(
                &ConstraintCheck::Pattern { expression: "*t1*".to_string() },
                Some(&Value::from("anat_t1_mpr")),
            ),
            0.0
        );
    }

    #[test]
    fn missing_field_costs_the_cap() {
        assert_eq!(field_difference(&ConstraintCheck::Present, None), MAX_DIFF_SCORE);
    }

    #[test]
    fn pattern_miss_costs_flat_penalty() {
        let check = ConstraintCheck::Pattern {
            expression: "*t1*".to_string(),
        };
        assert_eq!(field_difference(&check, Some(&Value::from("qsm"))), 5.0);
    }

    #[test]
    fn wildcard_strings_in_exact_expectations_score_as_patterns() {
        let check = ConstraintCheck::Exact {
            expected: Value::from("*t1*"),
        };
        assert_eq!(
            field_difference(&check, Some(&Value::from("anat_t1_mpr"))),
            0.0
        );
        assert_eq!(
            field_difference(&check, Some(&Value::from("qsm"))),
            PATTERN_MISS_PENALTY
        );
    }

    #[test]
    fn numeric_distance_is_absolute_and_capped() {
        let check = ConstraintCheck::Exact {
            expected: Value::Float(3.0),
        };
        assert_eq!(field_difference(&check, Some(&Value::Float(5.5))), 2.5);
        assert_eq!(
            field_difference(&check, Some(&Value::Float(1000.0))),
            MAX_DIFF_SCORE
        );
    }

    #[test]
    fn outside_tolerance_scores_distance_from_center() {
        let check = ConstraintCheck::Tolerance {
            center: 3.0,
            tolerance: 0.1,
        };
        let diff = field_difference(&check, Some(&Value::Float(4.0)));
        assert!((diff - 1.0).abs() < 1e-12);
    }

    #[test]
    fn string_distance_uses_levenshtein() {
        let check = ConstraintCheck::Exact {
            expected: Value::from("ORIGINAL"),
        };
        assert_eq!(field_difference(&check, Some(&Value::from("ORIGINAL"))), 0.0);
        assert_eq!(field_difference(&check, Some(&Value::from("ORIGINAL1"))), 1.0);
    }

    #[test]
    fn list_distance_pads_the_shorter_side() {
        let check = ConstraintCheck::Exact {
            expected: Value::List(vec![Value::from("A"), Value::from("B")]),
        };
        let actual = Value::List(vec![Value::from("A")]);
        assert_eq!(field_difference(&check, Some(&actual)), 1.0);
    }
}
