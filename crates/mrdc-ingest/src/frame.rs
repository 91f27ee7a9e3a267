use polars::prelude::{Column, DataFrame};
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::table::RawTable;

/// Placeholder tokens upstream systems write where a value is absent. They
/// become real nulls during frame building so the cleaners see one kind of
/// missing.
pub fn is_missing_token(value: &str) -> bool {
    matches!(
        value.trim().to_uppercase().as_str(),
        "" | "NULL" | "N/A" | "NAN" | "<NA>" | "NONE"
    )
}

/// Build a string-typed frame from a raw table. Every column comes out as
/// `Option<String>` with missing tokens mapped to null; typing is the
/// cleaners' job.
pub fn table_to_frame(table: &RawTable) -> Result<DataFrame> {
    let mut columns = Vec::with_capacity(table.headers.len());
    let mut nulled = 0usize;
    for (idx, header) in table.headers.iter().enumerate() {
        let values: Vec<Option<String>> = table
            .rows
            .iter()
            .map(|row| {
                let cell = row.get(idx).map(String::as_str).unwrap_or("");
                if is_missing_token(cell) {
                    nulled += 1;
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        columns.push(Column::new(header.as_str().into(), values));
    }
    let df = DataFrame::new(columns).map_err(|source| IngestError::Frame { source })?;
    debug!(
        rows = df.height(),
        columns = df.width(),
        nulled_cells = nulled,
        "built raw frame"
    );
    Ok(df)
}
