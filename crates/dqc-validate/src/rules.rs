//! Rule registry: an explicit, statically assembled set of field-level
//! and dataset-level validation rules.
//!
//! A validator type builds its rule set once through [`RuleSetBuilder`]
//! and never re-scans it per call. Rules signal failure by returning a
//! [`RuleViolation`] carrying a message; completing normally means the
//! rule passed.

use std::fmt;

use dqc_model::{DataTable, GroupRow};

/// A rule's described failure. Captured into a failing outcome; never
/// propagated as a crash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleViolation {
    pub message: String,
}

impl RuleViolation {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

pub type RuleResult = Result<(), RuleViolation>;

type FieldCheck = Box<dyn Fn(&[GroupRow]) -> RuleResult + Send + Sync>;
type DatasetCheck = Box<dyn Fn(&DataTable) -> RuleResult + Send + Sync>;

/// A rule over the grouped distinct combinations of its target fields,
/// run once per acquisition.
pub struct FieldRule {
    pub fields: Vec<String>,
    pub description: String,
    pub(crate) check: FieldCheck,
}

impl fmt::Debug for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRule")
            .field("fields", &self.fields)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// A rule over the whole dataset, run once per validation call.
pub struct DatasetRule {
    pub description: String,
    pub(crate) check: DatasetCheck,
}

impl fmt::Debug for DatasetRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasetRule")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// The fixed rule collection owned by a validator.
#[derive(Debug, Default)]
pub struct RuleSet {
    pub(crate) field_rules: Vec<FieldRule>,
    pub(crate) dataset_rules: Vec<DatasetRule>,
}

impl RuleSet {
    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    pub fn field_rule_count(&self) -> usize {
        self.field_rules.len()
    }

    pub fn dataset_rule_count(&self) -> usize {
        self.dataset_rules.len()
    }

    /// Field rules grouped by target field set, groups in first
    /// registration order, rules within a group in registration order.
    pub(crate) fn field_rule_groups(&self) -> Vec<(&[String], Vec<&FieldRule>)> {
        let mut groups: Vec<(&[String], Vec<&FieldRule>)> = Vec::new();
        for rule in &self.field_rules {
            match groups.iter_mut().find(|(fields, _)| *fields == rule.fields) {
                Some((_, rules)) => rules.push(rule),
                None => groups.push((rule.fields.as_slice(), vec![rule])),
            }
        }
        groups
    }
}

#[derive(Default)]
pub struct RuleSetBuilder {
    field_rules: Vec<FieldRule>,
    dataset_rules: Vec<DatasetRule>,
}

impl RuleSetBuilder {
    /// Register a field-level rule over an ordered target field set.
    /// Multiple rules may target the same set; each runs independently.
    pub fn field_rule<F>(mut self, fields: &[&str], description: &str, check: F) -> Self
    where
        F: Fn(&[GroupRow]) -> RuleResult + Send + Sync + 'static,
    {
        self.field_rules.push(FieldRule {
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            description: description.to_string(),
            check: Box::new(check),
        });
        self
    }

    /// Register a dataset-level rule over the whole session table.
    pub fn dataset_rule<F>(mut self, description: &str, check: F) -> Self
    where
        F: Fn(&DataTable) -> RuleResult + Send + Sync + 'static,
    {
        self.dataset_rules.push(DatasetRule {
            description: description.to_string(),
            check: Box::new(check),
        });
        self
    }

    pub fn build(self) -> RuleSet {
        RuleSet {
            field_rules: self.field_rules,
            dataset_rules: self.dataset_rules,
        }
    }
}
