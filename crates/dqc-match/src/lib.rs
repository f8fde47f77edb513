//! Best-effort matching of observed session acquisitions to reference
//! schemas, with optional interactive resolution.

mod engine;
mod score;
mod session;

pub use engine::{MatchCandidate, MatchEngine, MatchSuggestion};
pub use score::{MAX_DIFF_SCORE, field_difference};
pub use session::{MappingSession, MatchOptions, MatchPrompt, Resolution, Resolver};
