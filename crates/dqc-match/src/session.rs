//! Mapping session: suggest, resolve, freeze.
//!
//! The session takes the engine's proposals, lets a resolver confirm or
//! revise the ambiguous ones, and freezes the result into an
//! [`AcquisitionMapping`]. Declining is always allowed and never fatal;
//! a declined acquisition is simply reported as unmatched downstream.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use dqc_model::{AcquisitionMapping, DataTable};

use crate::engine::{MatchEngine, MatchSuggestion};

/// What a resolver is asked about: one input acquisition, the engine's
/// proposal (if any), and the reference names still available.
#[derive(Debug, Clone)]
pub struct MatchPrompt {
    pub input: String,
    pub suggested: Option<String>,
    pub score: Option<f64>,
    pub candidates: Vec<String>,
}

/// A resolver's decision for one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Keep the engine's proposal (no proposal ⇒ stays unmatched).
    Accept,
    /// Map to the named reference instead.
    Override(String),
    /// Leave the acquisition unmatched.
    Decline,
}

/// Answers prompts for ambiguous or unassigned proposals.
pub trait Resolver {
    fn resolve(&mut self, prompt: &MatchPrompt) -> Resolution;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MatchOptions {
    /// When false, ambiguous proposals are kept as suggested and no
    /// resolver runs.
    pub interactive: bool,
}

/// In-progress acquisition mapping.
///
/// `suggest → resolve → freeze`; freezing consumes the session, so a
/// frozen mapping can never be revised.
#[derive(Debug)]
pub struct MappingSession {
    suggestions: Vec<MatchSuggestion>,
    reference_names: Vec<String>,
    options: MatchOptions,
    resolved: bool,
}

impl MappingSession {
    pub fn new(engine: &MatchEngine, table: &DataTable, options: MatchOptions) -> Self {
        let reference_names = engine
            .references()
            .iter()
            .map(|r| r.scan().to_string())
            .collect();
        Self {
            suggestions: engine.suggest(table),
            reference_names,
            options,
            resolved: false,
        }
    }

    pub fn suggestions(&self) -> &[MatchSuggestion] {
        &self.suggestions
    }

    /// Run the resolver over every ambiguous or unassigned proposal.
    ///
    /// Does nothing unless the session is interactive. An override to
    /// an unknown reference name is rejected and the entry declined.
    pub fn resolve(&mut self, resolver: &mut dyn Resolver) {
        if !self.options.interactive || self.resolved {
            return;
        }
        self.resolved = true;

        for suggestion in &mut self.suggestions {
            if !suggestion.ambiguous {
                continue;
            }
            let prompt = MatchPrompt {
                input: suggestion.input.clone(),
                suggested: suggestion.reference.clone(),
                score: suggestion.score,
                candidates: self.reference_names.clone(),
            };
            match resolver.resolve(&prompt) {
                Resolution::Accept => {
                    debug!(input = %suggestion.input, "proposal accepted");
                }
                Resolution::Override(reference) => {
                    if self.reference_names.contains(&reference) {
                        debug!(
                            input = %suggestion.input,
                            reference = %reference,
                            "proposal overridden"
                        );
                        suggestion.reference = Some(reference);
                        suggestion.score = None;
                    } else {
                        warn!(
                            input = %suggestion.input,
                            reference = %reference,
                            "override names an unknown reference, declining"
                        );
                        suggestion.reference = None;
                        suggestion.score = None;
                    }
                }
                Resolution::Decline => {
                    debug!(input = %suggestion.input, "proposal declined");
                    suggestion.reference = None;
                    suggestion.score = None;
                }
            }
        }
    }

    /// Seal the mapping. Unresolved ambiguity is kept as suggested.
    pub fn freeze(self) -> AcquisitionMapping {
        let entries: BTreeMap<String, Option<String>> = self
            .suggestions
            .into_iter()
            .map(|s| (s.input, s.reference))
            .collect();
        AcquisitionMapping::freeze(entries)
    }
}
