//! Record export to CSV, TSV and JSON.
//!
//! Records are opaque JSON values; exports treat each top-level object
//! key as a column. The header row lists keys in first-seen order
//! across all records. Non-object records are included in the JSON
//! export but skipped by the tabular formats.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use crate::error::Result;

// ============================================================================
// Export Functions
// ============================================================================

/// Exports records as CSV with every cell quoted.
///
/// Embedded quotes are doubled per RFC 4180. Returns an empty string
/// when no record contributes a column.
#[must_use]
pub fn to_csv(records: &[Value]) -> String {
    let headers = collect_headers(records);
    if headers.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|header| quote_csv(header))
            .collect::<Vec<_>>()
            .join(","),
    );

    for record in records {
        if let Value::Object(map) = record {
            lines.push(
                headers
                    .iter()
                    .map(|header| quote_csv(&cell_text(map.get(header).unwrap_or(&Value::Null))))
                    .collect::<Vec<_>>()
                    .join(","),
            );
        }
    }

    lines.join("\n")
}

/// Exports records as TSV.
///
/// Tabs and newlines inside cells are flattened to spaces.
#[must_use]
pub fn to_tsv(records: &[Value]) -> String {
    let headers = collect_headers(records);
    if headers.is_empty() {
        return String::new();
    }

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|header| flatten_tsv(header))
            .collect::<Vec<_>>()
            .join("\t"),
    );

    for record in records {
        if let Value::Object(map) = record {
            lines.push(
                headers
                    .iter()
                    .map(|header| flatten_tsv(&cell_text(map.get(header).unwrap_or(&Value::Null))))
                    .collect::<Vec<_>>()
                    .join("\t"),
            );
        }
    }

    lines.join("\n")
}

/// Exports records as pretty-printed JSON.
///
/// # Errors
///
/// Returns a serialization error (not expected for plain values).
pub fn to_json(records: &[Value]) -> Result<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

// ============================================================================
// Helpers
// ============================================================================

/// Collects top-level object keys in first-seen order.
fn collect_headers(records: &[Value]) -> Vec<String> {
    let mut headers: Vec<String> = Vec::new();
    for record in records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !headers.iter().any(|existing| existing == key) {
                    headers.push(key.clone());
                }
            }
        }
    }
    headers
}

/// Renders one cell value as text.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Quotes a CSV cell, doubling embedded quotes.
fn quote_csv(cell: &str) -> String {
    format!("\"{}\"", cell.replace('"', "\"\""))
}

/// Flattens tabs and newlines for a TSV cell.
fn flatten_tsv(cell: &str) -> String {
    cell.replace(['\t', '\n'], " ").replace('\r', "")
}

// ============================================================================
// Tests
// ============================================================================
