use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Frozen correspondence between input acquisitions and reference
/// acquisitions.
///
/// Built by the session matcher (optionally revised during interactive
/// resolution), then frozen before any compliance evaluation reads it.
/// `None` marks an acquisition the matcher (or the operator) declined
/// to map; it is excluded from evaluation and reported as unmatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionMapping {
    entries: BTreeMap<String, Option<String>>,
}

impl AcquisitionMapping {
    /// Seal a completed (possibly partial) mapping. No mutation is
    /// possible afterwards.
    pub fn freeze(entries: BTreeMap<String, Option<String>>) -> Self {
        Self { entries }
    }

    /// Reference acquisition mapped to this input acquisition, if any.
    pub fn reference_for(&self, input: &str) -> Option<&str> {
        self.entries.get(input).and_then(|r| r.as_deref())
    }

    /// Matched pairs `(input, reference)` in input order.
    pub fn matched(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(input, reference)| Some((input.as_str(), reference.as_deref()?)))
    }

    /// Input acquisitions left unmapped.
    pub fn unmatched(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, reference)| reference.is_none())
            .map(|(input, _)| input.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(input, reference)| (input.as_str(), reference.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
