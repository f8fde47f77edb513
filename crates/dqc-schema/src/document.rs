use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use dqc_model::{DqcError, Result, Value};

/// A declarative reference document: acquisitions keyed by scan
/// identifier, each with field descriptors and optional named groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub acquisitions: BTreeMap<String, AcquisitionSpec>,
}

impl SchemaDocument {
    /// Parse a document from JSON text. Malformed documents are schema
    /// errors: they abort before any evaluation.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| DqcError::schema(format!("invalid reference document: {e}")))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn scan_names(&self) -> impl Iterator<Item = &str> {
        self.acquisitions.keys().map(String::as_str)
    }

    /// Group names defined for one acquisition, in declaration order.
    /// Empty for unknown scans.
    pub fn group_names(&self, scan: &str) -> Vec<&str> {
        self.acquisitions
            .get(scan)
            .map(|a| a.groups.iter().map(|g| g.name.as_str()).collect())
            .unwrap_or_default()
    }
}

/// One reference acquisition entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcquisitionSpec {
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
}

/// A named group of field descriptors within an acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSpec {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldSpec>,
}

/// One declarative field descriptor.
///
/// At most one constraint form: `value` (+ optional `tolerance` for
/// numeric centers) or `pattern`. A bare `field` means "must be
/// present".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl FieldSpec {
    pub fn presence(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: None,
            tolerance: None,
            pattern: None,
        }
    }
}
