use mrdc_model::Entity;
use polars::error::PolarsError;
use thiserror::Error;

/// Failures that abort a cleaning call. Per-row data problems never surface
/// here; they are resolved inside the cleaner by dropping or repairing the
/// row.
#[derive(Debug, Error)]
pub enum CleanError {
    /// A raw source is missing a column the cleaner operates on.
    #[error("{entity}: required column {column:?} is missing from the raw data")]
    MissingColumn { entity: Entity, column: String },

    /// A stage received input an earlier stage guaranteed could not occur.
    /// Signals a pipeline bug, not a data quality issue.
    #[error("{entity}: contract violation in {stage}: {detail}")]
    Contract {
        entity: Entity,
        stage: &'static str,
        detail: String,
    },

    #[error("frame operation failed: {0}")]
    Frame(#[from] PolarsError),
}

pub type Result<T> = std::result::Result<T, CleanError>;
