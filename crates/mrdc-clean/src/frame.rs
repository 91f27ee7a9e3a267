use std::path::{Path, PathBuf};

use mrdc_model::Entity;
use polars::prelude::DataFrame;

/// A raw or cleaned dataset tied to the entity it holds.
#[derive(Debug, Clone)]
pub struct EntityFrame {
    pub entity: Entity,
    pub data: DataFrame,
    /// File the rows were ingested from, when known.
    pub source: Option<PathBuf>,
}

impl EntityFrame {
    pub fn new(entity: Entity, data: DataFrame) -> Self {
        Self {
            entity,
            data,
            source: None,
        }
    }

    pub fn with_source(entity: Entity, data: DataFrame, source: PathBuf) -> Self {
        Self {
            entity,
            data,
            source: Some(source),
        }
    }

    pub fn record_count(&self) -> usize {
        self.data.height()
    }

    /// Table the cleaned rows load into.
    pub fn table_name(&self) -> &'static str {
        self.entity.table_name()
    }

    /// Stem for output files, `users` style.
    pub fn dataset_stem(&self) -> &'static str {
        self.entity.dataset_stem()
    }

    /// Label for log lines: the source file name when known, otherwise the
    /// entity id.
    pub fn source_label(&self) -> String {
        self.source
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.entity.as_str().to_string())
    }
}
