mod evaluate;
mod group;
mod rules;
mod validator;

pub use evaluate::evaluate;
pub use group::group_by;
pub use rules::{DatasetRule, FieldRule, RuleResult, RuleSet, RuleSetBuilder, RuleViolation};
pub use validator::GroupedValidator;
