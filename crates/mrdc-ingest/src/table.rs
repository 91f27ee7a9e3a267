use std::path::Path;

use csv::ReaderBuilder;
use serde_json::Value;

use crate::error::{IngestError, Result};

/// A raw dataset as read from disk: header names plus string cells, no type
/// interpretation yet. Rows are padded or truncated to the header width.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a dataset file, dispatching on extension. CSV and JSON are the two
/// source formats the pipeline consumes.
pub fn read_table(path: &Path) -> Result<RawTable> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => read_csv_table(path),
        Some("json") => read_json_table(path),
        _ => Err(IngestError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// Read a CSV dataset. The first non-empty row is the header; later rows are
/// padded with empty cells when short and truncated when long
/// (exported data occasionally carries ragged trailing cells).
pub fn read_csv_table(path: &Path) -> Result<RawTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut headers: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        match &headers {
            None => {
                headers = Some(record.iter().map(normalize_header).collect());
            }
            Some(names) => {
                let mut row = Vec::with_capacity(names.len());
                for idx in 0..names.len() {
                    let value = record.get(idx).unwrap_or("");
                    row.push(normalize_cell(value));
                }
                rows.push(row);
            }
        }
    }

    Ok(RawTable {
        headers: headers.unwrap_or_default(),
        rows,
    })
}

/// Read a JSON dataset: a top-level array of flat objects. Column order
/// follows sorted key order; scalar values are stringified, nulls become
/// empty cells.
pub fn read_json_table(path: &Path) -> Result<RawTable> {
    let raw = std::fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw).map_err(|source| IngestError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let Value::Array(items) = value else {
        return Err(IngestError::Shape {
            path: path.to_path_buf(),
            message: "expected a top-level array of objects".to_string(),
        });
    };

    let mut headers: Vec<String> = Vec::new();
    for item in &items {
        let Value::Object(object) = item else {
            return Err(IngestError::Shape {
                path: path.to_path_buf(),
                message: "expected every array element to be an object".to_string(),
            });
        };
        for key in object.keys() {
            if !headers.iter().any(|h| h == key) {
                headers.push(key.clone());
            }
        }
    }

    let mut rows = Vec::with_capacity(items.len());
    for item in &items {
        let Value::Object(object) = item else {
            unreachable!("checked above");
        };
        let row = headers
            .iter()
            .map(|key| match object.get(key) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => normalize_cell(s),
                Some(other) => other.to_string(),
            })
            .collect();
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}
