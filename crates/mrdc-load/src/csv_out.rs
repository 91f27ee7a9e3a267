//! CSV output for cleaned frames.

use std::path::{Path, PathBuf};

use mrdc_ingest::any_to_string;
use mrdc_model::Entity;
use polars::prelude::{AnyValue, DataFrame};
use tracing::info;

use crate::error::{LoadError, Result};

/// Output file for an entity's cleaned rows, `users.csv` style.
pub fn dataset_path(dir: &Path, entity: Entity) -> PathBuf {
    dir.join(format!("{}.csv", entity.dataset_stem()))
}

/// Writes the frame to `path` with a header row. Null cells become empty
/// fields; floats drop trailing zeros so values survive a round trip
/// through the cleaner unchanged.
pub fn write_csv(df: &DataFrame, path: &Path) -> Result<()> {
    let csv_err = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;

    let names = df.get_column_names();
    writer
        .write_record(names.iter().map(|n| n.as_str()))
        .map_err(csv_err)?;

    let columns = df.get_columns();
    for idx in 0..df.height() {
        let record: Vec<String> = columns
            .iter()
            .map(|col| any_to_string(col.get(idx).unwrap_or(AnyValue::Null)))
            .collect();
        writer.write_record(&record).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| csv_err(source.into()))?;

    info!(path = %path.display(), rows = df.height(), "wrote csv");
    Ok(())
}
