//! Session and record loading: JSON or CSV into the typed table.

use std::path::Path;

use anyhow::{Context, Result, bail};

use dqc_model::{DataTable, Record, Value};

/// Load a single acquisition record from a JSON object file.
pub fn load_record(path: &Path) -> Result<Record> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading record from {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing record from {}", path.display()))?;
    let serde_json::Value::Object(map) = json else {
        bail!("record file {} must contain a JSON object", path.display());
    };
    object_to_record(map)
}

/// Load session data from a JSON array of records or a CSV file.
///
/// The format is chosen by extension: `.csv` is read with headers and
/// typed field parsing, anything else is parsed as JSON.
pub fn load_session(path: &Path) -> Result<DataTable> {
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        load_session_csv(path)
    } else {
        load_session_json(path)
    }
}

fn load_session_json(path: &Path) -> Result<DataTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading session from {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("parsing session from {}", path.display()))?;
    let serde_json::Value::Array(rows) = json else {
        bail!(
            "session file {} must contain a JSON array of records",
            path.display()
        );
    };
    let mut table = DataTable::new();
    for row in rows {
        let serde_json::Value::Object(map) = row else {
            bail!("session rows in {} must be JSON objects", path.display());
        };
        table.push_row(object_to_record(map)?);
    }
    Ok(table)
}

fn load_session_csv(path: &Path) -> Result<DataTable> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("reading session from {}", path.display()))?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let mut table = DataTable::new();
    for (idx, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("reading CSV row {}", idx + 2))?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(header, field)| (header.to_string(), parse_csv_field(field)))
            .collect();
        table.push_row(record);
    }
    Ok(table)
}

fn object_to_record(map: serde_json::Map<String, serde_json::Value>) -> Result<Record> {
    map.into_iter()
        .map(|(field, value)| Ok((field.clone(), json_to_value(&field, value)?)))
        .collect()
}

fn json_to_value(field: &str, json: serde_json::Value) -> Result<Value> {
    match json {
        serde_json::Value::Null => Ok(Value::Null),
        serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Value::Int(i))
            } else if let Some(f) = n.as_f64() {
                Ok(Value::Float(f))
            } else {
                bail!("field '{field}': number {n} is out of range")
            }
        }
        serde_json::Value::String(s) => Ok(Value::Str(s)),
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(|item| json_to_value(field, item))
            .collect::<Result<Vec<_>>>()
            .map(Value::List),
        serde_json::Value::Object(_) => {
            bail!("field '{field}': nested objects are not supported")
        }
    }
}

/// Empty becomes null; integers and floats parse as numbers; everything
/// else stays a string.
fn parse_csv_field(field: &str) -> Value {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return Value::Int(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        return Value::Float(f);
    }
    Value::Str(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn unique_temp_file(name: &str, ext: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "dicom-qc-{}-{}-{}.{ext}",
            name,
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        path
    }

    #[test]
    fn json_session_keeps_types() {
        let path = unique_temp_file("session", "json");
        std::fs::write(
            &path,
            r#"[{"Acquisition": "t1_mpr", "EchoTime": 3.2, "FlipAngle": 9,
                "ImageType": ["ORIGINAL", "PRIMARY"], "SeriesDescription": null}]"#,
        )
        .unwrap();

        let table = load_session(&path).unwrap();
        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.get("EchoTime"), Some(&Value::Float(3.2)));
        assert_eq!(row.get("FlipAngle"), Some(&Value::Int(9)));
        assert_eq!(
            row.get("ImageType"),
            Some(&Value::List(vec![
                Value::from("ORIGINAL"),
                Value::from("PRIMARY")
            ]))
        );
        assert_eq!(row.get("SeriesDescription"), Some(&Value::Null));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn csv_session_parses_typed_fields() {
        let path = unique_temp_file("session", "csv");
        std::fs::write(
            &path,
            "Acquisition,EchoTime,FlipAngle,SeriesDescription\n\
             t1_mpr,3.2,9,\n",
        )
        .unwrap();

        let table = load_session(&path).unwrap();
        assert_eq!(table.len(), 1);
        let row = &table.rows()[0];
        assert_eq!(row.get("Acquisition"), Some(&Value::from("t1_mpr")));
        assert_eq!(row.get("EchoTime"), Some(&Value::Float(3.2)));
        assert_eq!(row.get("FlipAngle"), Some(&Value::Int(9)));
        assert_eq!(row.get("SeriesDescription"), Some(&Value::Null));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn record_must_be_an_object() {
        let path = unique_temp_file("record", "json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(load_record(&path).is_err());
        let _ = std::fs::remove_file(path);
    }
}
