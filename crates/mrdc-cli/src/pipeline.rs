//! Staged entity pipeline.
//!
//! Every entity passes through the same three stages, strictly in order:
//!
//! 1. **Ingest**: read the raw CSV/JSON dataset into a string frame
//! 2. **Clean**: run the entity's cleaner against the shared context
//! 3. **Load**: write the cleaned frame as a CSV file and replace its
//!    warehouse table
//!
//! [`run_all`] drives every dataset a data directory holds. One entity's
//! failure never stops its siblings; failures are captured per entity in
//! the run summary and decide the process exit code.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use mrdc_clean::{CleanContext, EntityFrame, clean_frame};
use mrdc_ingest::{discover_datasets, read_table, table_to_frame};
use mrdc_load::{SqliteWarehouse, dataset_path, write_csv};
use mrdc_model::{Entity, EntityOutcome, OutputFormat, RunSummary};

/// Where a run writes its outputs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory for cleaned CSV files.
    pub output_dir: PathBuf,
    /// SQLite warehouse file.
    pub database: PathBuf,
    /// Formats to write; a dry run writes none of them.
    pub formats: Vec<OutputFormat>,
    /// Clean and report without writing anything.
    pub dry_run: bool,
}

/// Output destinations for one run, opened before the first entity so a
/// bad output location fails fast instead of after minutes of cleaning.
pub struct OutputSink {
    output_dir: PathBuf,
    csv: bool,
    warehouse: Option<SqliteWarehouse>,
}

impl OutputSink {
    pub fn open(config: &PipelineConfig) -> Result<Self> {
        let csv = !config.dry_run && config.formats.contains(&OutputFormat::Csv);
        let sqlite = !config.dry_run && config.formats.contains(&OutputFormat::Sqlite);
        if csv || sqlite {
            fs::create_dir_all(&config.output_dir).with_context(|| {
                format!("create output directory {}", config.output_dir.display())
            })?;
        }
        let warehouse = if sqlite {
            let warehouse = SqliteWarehouse::open(&config.database)
                .with_context(|| format!("open warehouse {}", config.database.display()))?;
            Some(warehouse)
        } else {
            None
        };
        Ok(Self {
            output_dir: config.output_dir.clone(),
            csv,
            warehouse,
        })
    }

    /// Writes a cleaned frame to the selected destinations. Returns the CSV
    /// path when one was written.
    pub fn write(&mut self, frame: &EntityFrame) -> Result<Option<PathBuf>> {
        let mut written = None;
        if self.csv {
            let path = dataset_path(&self.output_dir, frame.entity);
            write_csv(&frame.data, &path).with_context(|| format!("write {}", path.display()))?;
            written = Some(path);
        }
        if let Some(warehouse) = self.warehouse.as_mut() {
            warehouse
                .replace_entity(frame.entity, &frame.data)
                .with_context(|| format!("load table {}", frame.table_name()))?;
        }
        Ok(written)
    }
}

/// Reads the entity's dataset into a raw string frame.
pub fn ingest_entity(entity: Entity, path: &Path) -> Result<EntityFrame> {
    let table = read_table(path).with_context(|| format!("read {}", path.display()))?;
    let data =
        table_to_frame(&table).with_context(|| format!("build frame from {}", path.display()))?;
    Ok(EntityFrame::with_source(entity, data, path.to_path_buf()))
}

/// Runs the entity's cleaner over an ingested frame.
pub fn clean_entity(frame: EntityFrame, ctx: &CleanContext) -> Result<EntityFrame> {
    let EntityFrame {
        entity,
        data,
        source,
    } = frame;
    let cleaned = clean_frame(entity, data, ctx).with_context(|| format!("clean {entity}"))?;
    Ok(EntityFrame {
        entity,
        data: cleaned,
        source,
    })
}

/// One entity end to end. Failures land in the outcome instead of
/// propagating, so sibling entities keep running.
pub fn process_entity(
    entity: Entity,
    path: &Path,
    ctx: &CleanContext,
    sink: &mut OutputSink,
) -> EntityOutcome {
    let span = info_span!("entity", entity = %entity, source = %path.display());
    let _guard = span.enter();
    let start = Instant::now();
    let mut outcome = EntityOutcome {
        entity,
        rows_in: 0,
        rows_out: 0,
        output: None,
        error: None,
    };

    let raw = match ingest_entity(entity, path) {
        Ok(frame) => frame,
        Err(error) => return fail(outcome, &error),
    };
    outcome.rows_in = raw.record_count();

    let cleaned = match clean_entity(raw, ctx) {
        Ok(frame) => frame,
        Err(error) => return fail(outcome, &error),
    };
    outcome.rows_out = cleaned.record_count();

    match sink.write(&cleaned) {
        Ok(output) => outcome.output = output,
        Err(error) => return fail(outcome, &error),
    }

    info!(
        rows_in = outcome.rows_in,
        rows_out = outcome.rows_out,
        dropped = outcome.rows_dropped(),
        duration_ms = start.elapsed().as_millis(),
        "entity complete"
    );
    outcome
}

fn fail(mut outcome: EntityOutcome, error: &anyhow::Error) -> EntityOutcome {
    warn!(error = format!("{error:#}"), "entity failed");
    outcome.error = Some(format!("{error:#}"));
    outcome
}

/// Cleans every dataset found in `data_dir`, dimensions before the fact
/// table, and returns the per-entity outcomes.
pub fn run_all(data_dir: &Path, ctx: &CleanContext, config: &PipelineConfig) -> Result<RunSummary> {
    let span = info_span!("run", data_dir = %data_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let datasets = discover_datasets(data_dir)
        .with_context(|| format!("discover datasets in {}", data_dir.display()))?;
    if datasets.is_empty() {
        warn!("no entity datasets found");
        return Ok(RunSummary::default());
    }

    let mut sink = OutputSink::open(config)?;
    let mut summary = RunSummary::default();
    for (entity, path) in datasets {
        summary
            .outcomes
            .push(process_entity(entity, &path, ctx, &mut sink));
    }

    let rows_out: usize = summary.outcomes.iter().map(|o| o.rows_out).sum();
    info!(
        entities = summary.outcomes.len(),
        failures = summary.failure_count(),
        rows_out,
        duration_ms = start.elapsed().as_millis(),
        "run complete"
    );
    Ok(summary)
}
