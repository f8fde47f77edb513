use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Column carrying the acquisition identity of each row.
pub const ACQUISITION_COLUMN: &str = "Acquisition";
/// Optional column carrying the group name within an acquisition.
pub const GROUP_COLUMN: &str = "Group";

/// One representative unit (e.g. one imaging instance), field name to value.
pub type Record = BTreeMap<String, Value>;

/// An ordered collection of records with a stable column list.
///
/// The typed substrate for grouped validation: columns appear in
/// first-seen order, rows keep insertion order, and reads never mutate
/// the table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataTable {
    columns: Vec<String>,
    rows: Vec<Record>,
}

impl DataTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Record>) -> Self {
        let mut table = Self::new();
        for record in records {
            table.push_row(record);
        }
        table
    }

    pub fn push_row(&mut self, record: Record) {
        for field in record.keys() {
            if !self.columns.iter().any(|c| c == field) {
                self.columns.push(field.clone());
            }
        }
        self.rows.push(record);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct acquisition identifiers in first-appearance order.
    ///
    /// When the table has no `Acquisition` column every row belongs to
    /// the single synthetic acquisition `<session>`.
    pub fn acquisitions(&self) -> Vec<String> {
        if !self.has_column(ACQUISITION_COLUMN) {
            if self.rows.is_empty() {
                return Vec::new();
            }
            return vec![SESSION_ACQUISITION.to_string()];
        }
        let mut seen = Vec::new();
        for row in &self.rows {
            let id = acquisition_id(row);
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }

    /// Rows belonging to one acquisition, as a table sharing this
    /// table's column list.
    pub fn acquisition_rows(&self, acquisition: &str) -> DataTable {
        let rows: Vec<Record> = if !self.has_column(ACQUISITION_COLUMN) {
            self.rows.clone()
        } else {
            self.rows
                .iter()
                .filter(|row| acquisition_id(row) == acquisition)
                .cloned()
                .collect()
        };
        DataTable {
            columns: self.columns.clone(),
            rows,
        }
    }
}

/// Synthetic acquisition id used for dataset-level outcomes and for
/// tables lacking an `Acquisition` column.
pub const SESSION_ACQUISITION: &str = "<session>";

fn acquisition_id(row: &Record) -> String {
    match row.get(ACQUISITION_COLUMN) {
        Some(value) if !value.is_null() => value.to_string(),
        _ => SESSION_ACQUISITION.to_string(),
    }
}
