// file: src/pipeline/rows.rs
// description: loads input rows (company plus reference address) from a JSON array
// reference: https://docs.rs/serde_json

use crate::config::PipelineConfig;
use crate::error::{EnrichError, Result};
use crate::models::InputRow;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Read `path` as a JSON array of objects, mapping the configured columns onto rows.
///
/// Entries that are not objects become empty rows so row numbering stays intact.
pub fn load_rows(path: &Path, columns: &PipelineConfig) -> Result<Vec<InputRow>> {
    let content = fs::read_to_string(path).map_err(|source| EnrichError::FileOperation {
        path: path.to_path_buf(),
        source,
    })?;

    let rows = parse_rows(&content, columns)?;
    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

pub fn parse_rows(content: &str, columns: &PipelineConfig) -> Result<Vec<InputRow>> {
    let value: Value = serde_json::from_str(content)?;

    let Value::Array(entries) = value else {
        return Err(EnrichError::Parse(
            "Input must be a JSON array of objects".to_string(),
        ));
    };

    Ok(entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(object) => row_from_object(object, columns),
            _ => {
                warn!("Row {} is not an object", index + 1);
                InputRow::default()
            }
        })
        .collect())
}

fn row_from_object(object: &Map<String, Value>, columns: &PipelineConfig) -> InputRow {
    let cell = |column: &str| object.get(column).and_then(cell_text);

    InputRow {
        company_name: cell(&columns.company_column),
        reference_address: cell(&columns.address_column),
        reference_postal_code: cell(&columns.postal_code_column),
    }
}

fn cell_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}
