//! Session match engine: scores input acquisitions against reference
//! schemas and proposes a one-to-one assignment.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use dqc_model::{DataTable, Record, ReferenceSchema};

use crate::score::field_difference;

/// Total difference above which a proposed pair needs confirmation.
const AMBIGUITY_THRESHOLD: f64 = 5.0;
/// Two candidates for the same input within this margin are a tie.
const TIE_MARGIN: f64 = 1.0;

/// One scored input/reference pair.
#[derive(Debug, Clone)]
pub struct MatchCandidate {
    pub input: String,
    pub reference: String,
    pub score: f64,
}

/// The engine's proposal for one input acquisition.
///
/// `reference` is `None` when no reference was left to assign.
/// Ambiguous proposals are the ones a resolver should confirm: a high
/// total difference, a near-tie with another reference, or no proposal
/// at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSuggestion {
    pub input: String,
    pub reference: Option<String>,
    pub score: Option<f64>,
    pub ambiguous: bool,
}

/// Scores acquisitions against a fixed list of reference schemas.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    references: Vec<ReferenceSchema>,
}

impl MatchEngine {
    pub fn new(references: Vec<ReferenceSchema>) -> Self {
        Self { references }
    }

    pub fn references(&self) -> &[ReferenceSchema] {
        &self.references
    }

    /// Total field difference of one record against one reference.
    ///
    /// Sums the per-constraint costs; a record satisfying every
    /// constraint scores 0.
    pub fn score(&self, reference: &ReferenceSchema, record: &Record) -> f64 {
        reference
            .constraints()
            .iter()
            .map(|c| field_difference(&c.check, record.get(&c.field)))
            .sum()
    }

    /// Propose a one-to-one assignment for every input acquisition.
    ///
    /// Each acquisition is represented by its first row. All pairs are
    /// scored, then assigned greedily by ascending total difference
    /// (ties broken by input, then reference name, so the result is
    /// deterministic). Each input and each reference is used at most
    /// once; leftovers come back unassigned.
    pub fn suggest(&self, table: &DataTable) -> Vec<MatchSuggestion> {
        let inputs = table.acquisitions();
        let mut candidates: Vec<MatchCandidate> = Vec::new();
        let mut representatives = Vec::with_capacity(inputs.len());

        for input in &inputs {
            let rows = table.acquisition_rows(input);
            let Some(record) = rows.rows().first().cloned() else {
                continue;
            };
            for reference in &self.references {
                candidates.push(MatchCandidate {
                    input: input.clone(),
                    reference: reference.scan().to_string(),
                    score: self.score(reference, &record),
                });
            }
            representatives.push(input.clone());
        }

        candidates.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.input.cmp(&b.input))
                .then_with(|| a.reference.cmp(&b.reference))
        });

        let mut assigned_inputs: BTreeSet<String> = BTreeSet::new();
        let mut assigned_references: BTreeSet<String> = BTreeSet::new();
        let mut suggestions: Vec<MatchSuggestion> = Vec::new();

        for candidate in &candidates {
            if assigned_inputs.contains(&candidate.input)
                || assigned_references.contains(&candidate.reference)
            {
                continue;
            }
            let tied = candidates.iter().any(|other| {
                other.input == candidate.input
                    && other.reference != candidate.reference
                    && !assigned_references.contains(&other.reference)
                    && (other.score - candidate.score).abs() <= TIE_MARGIN
            });
            let ambiguous = candidate.score > AMBIGUITY_THRESHOLD || tied;
            debug!(
                input = %candidate.input,
                reference = %candidate.reference,
                score = candidate.score,
                ambiguous,
                "proposing acquisition match"
            );
            assigned_inputs.insert(candidate.input.clone());
            assigned_references.insert(candidate.reference.clone());
            suggestions.push(MatchSuggestion {
                input: candidate.input.clone(),
                reference: Some(candidate.reference.clone()),
                score: Some(candidate.score),
                ambiguous,
            });
        }

        for input in representatives {
            if !assigned_inputs.contains(&input) {
                suggestions.push(MatchSuggestion {
                    input,
                    reference: None,
                    score: None,
                    ambiguous: true,
                });
            }
        }

        suggestions.sort_by(|a, b| a.input.cmp(&b.input));
        suggestions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dqc_model::{ACQUISITION_COLUMN, ConstraintCheck, FieldConstraint, Value};

    fn reference(scan: &str, echo_time: f64) -> ReferenceSchema {
        ReferenceSchema::new(
            scan,
            vec![FieldConstraint {
                field: "EchoTime".to_string(),
                check: ConstraintCheck::Exact {
                    expected: Value::Float(echo_time),
                },
            }],
        )
        .expect("schema")
    }

    fn session(rows: &[(&str, f64)]) -> DataTable {
        DataTable::from_records(
            rows.iter()
                .map(|(acq, te)| {
                    [
                        (ACQUISITION_COLUMN.to_string(), Value::from(*acq)),
                        ("EchoTime".to_string(), Value::Float(*te)),
                    ]
                    .into_iter()
                    .collect()
                })
                .collect(),
        )
    }

    #[test]
    fn closest_reference_wins_each_input() {
        let engine = MatchEngine::new(vec![reference("T1", 3.0), reference("QSM", 20.0)]);
        let table = session(&[("scan_a", 3.1), ("scan_b", 19.5)]);

        let suggestions = engine.suggest(&table);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].input, "scan_a");
        assert_eq!(suggestions[0].reference.as_deref(), Some("T1"));
        assert_eq!(suggestions[1].reference.as_deref(), Some("QSM"));
    }

    #[test]
    fn each_reference_is_assigned_at_most_once() {
        let engine = MatchEngine::new(vec![reference("T1", 3.0)]);
        let table = session(&[("scan_a", 3.0), ("scan_b", 3.2)]);

        let suggestions = engine.suggest(&table);
        let assigned: Vec<_> = suggestions
            .iter()
            .filter(|s| s.reference.is_some())
            .collect();
        assert_eq!(assigned.len(), 1);
        // The exact match takes the only reference; the other input is
        // left unassigned and flagged for resolution.
        assert_eq!(assigned[0].input, "scan_a");
        let leftover = suggestions.iter().find(|s| s.input == "scan_b").unwrap();
        assert!(leftover.reference.is_none());
        assert!(leftover.ambiguous);
    }

    #[test]
    fn distant_matches_are_flagged_ambiguous() {
        let engine = MatchEngine::new(vec![reference("T1", 3.0)]);
        let table = session(&[("scan_a", 12.0)]);

        let suggestions = engine.suggest(&table);
        assert_eq!(suggestions[0].reference.as_deref(), Some("T1"));
        assert!(suggestions[0].ambiguous);
    }

    #[test]
    fn near_ties_are_flagged_ambiguous() {
        let engine = MatchEngine::new(vec![reference("T1A", 3.0), reference("T1B", 3.5)]);
        let table = session(&[("scan_a", 3.2)]);

        let suggestions = engine.suggest(&table);
        assert!(suggestions[0].ambiguous);
    }

    #[test]
    fn suggestion_order_is_deterministic() {
        let engine = MatchEngine::new(vec![reference("T1", 3.0), reference("QSM", 20.0)]);
        let table = session(&[("scan_b", 19.5), ("scan_a", 3.1)]);

        let first = engine.suggest(&table);
        let second = engine.suggest(&table);
        let pairs = |s: &[MatchSuggestion]| {
            s.iter()
                .map(|m| (m.input.clone(), m.reference.clone()))
                .collect::<Vec<_>>()
        };
        assert_eq!(pairs(&first), pairs(&second));
    }
}
