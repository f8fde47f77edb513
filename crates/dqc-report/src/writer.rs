//! JSON report writer.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Write a payload as pretty-printed JSON with a trailing newline.
///
/// Serialization is deterministic, so writing the same payload twice
/// produces byte-identical files.
pub fn write_report_json<T: Serialize>(path: &Path, payload: &T) -> Result<()> {
    let mut bytes = serde_json::to_vec_pretty(payload).context("serializing report")?;
    bytes.push(b'\n');
    fs::write(path, bytes).with_context(|| format!("writing report to {}", path.display()))?;
    Ok(())
}
