//! Grouping utility: frequency-counted distinct combinations of a
//! chosen field set.

use std::collections::BTreeMap;

use dqc_model::{DataTable, GroupRow, Value, ValueKey};

/// Reduce a table to the distinct combinations of `fields`, with counts.
///
/// Keys are canonicalized before grouping so structurally equal values
/// land in the same group regardless of representation (`8` and `8.0`,
/// equal lists). Missing values key as `Null` rather than being
/// dropped. Groups come back in first-appearance order; the input is
/// never mutated.
pub fn group_by(table: &DataTable, fields: &[String]) -> Vec<GroupRow> {
    let mut order: Vec<Vec<ValueKey>> = Vec::new();
    let mut groups: BTreeMap<Vec<ValueKey>, GroupRow> = BTreeMap::new();

    for row in table.rows() {
        let values: Vec<Value> = fields
            .iter()
            .map(|f| row.get(f).cloned().unwrap_or(Value::Null))
            .collect();
        let key: Vec<ValueKey> = values.iter().map(Value::key).collect();
        match groups.get_mut(&key) {
            Some(group) => group.count += 1,
            None => {
                order.push(key.clone());
                groups.insert(key, GroupRow { values, count: 1 });
            }
        }
    }

    order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .collect()
}
