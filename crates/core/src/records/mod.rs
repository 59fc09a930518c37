//! Loading function records handed over by an extractor.
//!
//! Records arrive as a JSON or YAML file holding either a bare list or an
//! object with a `records` list. Verdict fields may be omitted and default
//! to unverified.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::FunctionRecord;

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum RecordsFile {
    List(Vec<FunctionRecord>),
    Wrapped { records: Vec<FunctionRecord> },
}

impl RecordsFile {
    fn into_records(self) -> Vec<FunctionRecord> {
        match self {
            RecordsFile::List(records) => records,
            RecordsFile::Wrapped { records } => records,
        }
    }
}

/// Parse records from `body`, using `format` (`json`, `yaml` or `yml`).
pub fn parse_records(body: &str, format: &str) -> Result<Vec<FunctionRecord>> {
    let parsed: RecordsFile = match format {
        "json" => serde_json::from_str(body).context("Failed to parse function records JSON")?,
        "yaml" | "yml" => {
            serde_yaml::from_str(body).context("Failed to parse function records YAML")?
        }
        other => {
            return Err(anyhow!(
                "Unsupported records format '{}'; expected json, yaml, or yml",
                other
            ))
        }
    };
    Ok(parsed.into_records())
}

/// Records format implied by the extension of `path` (empty when it has none).
pub fn records_format(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or_default()
}

/// Parse the raw bytes of a records file that has already been read.
pub fn parse_records_bytes(path: &Path, bytes: &[u8]) -> Result<Vec<FunctionRecord>> {
    let body = std::str::from_utf8(bytes)
        .with_context(|| format!("Records file {} is not valid UTF-8", path.display()))?;
    parse_records(body, records_format(path))
        .with_context(|| format!("Invalid records file {}", path.display()))
}

/// Load records from a JSON or YAML file, chosen by extension.
pub fn load_records(path: &Path) -> Result<Vec<FunctionRecord>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read function records at {}", path.display()))?;
    parse_records_bytes(path, &bytes)
}

/// Serialize records as pretty JSON (used to write back concluded records).
pub fn render_records_json(records: &[FunctionRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize function records to JSON")
}
