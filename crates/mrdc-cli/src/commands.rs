use std::path::Path;

use anyhow::{Context, Result};
use comfy_table::Table;

use mrdc_cli::pipeline::{OutputSink, PipelineConfig, process_entity, run_all};
use mrdc_clean::{AgePolicy, CleanContext};
use mrdc_model::{OutputFormat, RunSummary};
use mrdc_standards::load_default_card_lengths;

use crate::cli::{CleanArgs, OutputArgs, OutputFormatArg, RunArgs};
use crate::summary::apply_table_style;

/// `clean`: one entity from an explicit file.
pub fn run_clean(args: &CleanArgs) -> Result<RunSummary> {
    let ctx = build_context(&args.output)?;
    let config = pipeline_config(&args.output, &args.file);
    let mut sink = OutputSink::open(&config)?;
    let outcome = process_entity(args.entity, &args.file, &ctx, &mut sink);
    Ok(RunSummary {
        outcomes: vec![outcome],
    })
}

/// `run`: every dataset a data directory holds.
pub fn run_pipeline(args: &RunArgs) -> Result<RunSummary> {
    let ctx = build_context(&args.output)?;
    let config = pipeline_config(&args.output, &args.data_dir);
    run_all(&args.data_dir, &ctx, &config)
}

/// `standards`: print the provider length table driving card validation.
pub fn run_standards() -> Result<()> {
    let registry = load_default_card_lengths().context("load card length standards")?;
    let mut table = Table::new();
    table.set_header(vec!["Provider", "Digits"]);
    apply_table_style(&mut table);
    for (provider, length) in registry.providers() {
        table.add_row(vec![provider.to_string(), length.to_string()]);
    }
    println!("{table}");
    Ok(())
}

fn build_context(output: &OutputArgs) -> Result<CleanContext> {
    let mut ctx = CleanContext::load_default().context("load card length standards")?;
    if output.bounded_age {
        ctx = ctx.with_age_policy(AgePolicy::Bounded);
    }
    Ok(ctx)
}

/// Resolves output locations relative to the input: a file's siblings go to
/// `<parent>/output`, a directory's to `<dir>/output`.
fn pipeline_config(output: &OutputArgs, input: &Path) -> PipelineConfig {
    let base = if input.is_dir() {
        input.to_path_buf()
    } else {
        input
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf()
    };
    let output_dir = output
        .output_dir
        .clone()
        .unwrap_or_else(|| base.join("output"));
    let database = output
        .database
        .clone()
        .unwrap_or_else(|| output_dir.join("sales_data.db"));
    PipelineConfig {
        output_dir,
        database,
        formats: format_outputs(output.format),
        dry_run: output.dry_run,
    }
}

fn format_outputs(format: OutputFormatArg) -> Vec<OutputFormat> {
    match format {
        OutputFormatArg::Csv => vec![OutputFormat::Csv],
        OutputFormatArg::Sqlite => vec![OutputFormat::Sqlite],
        OutputFormatArg::Both => vec![OutputFormat::Csv, OutputFormat::Sqlite],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn output_args() -> OutputArgs {
        OutputArgs {
            output_dir: None,
            database: None,
            format: OutputFormatArg::Both,
            dry_run: false,
            bounded_age: false,
        }
    }

    #[test]
    fn defaults_nest_under_the_input_directory() {
        let config = pipeline_config(&output_args(), Path::new("/data/raw/users.csv"));
        assert_eq!(config.output_dir, PathBuf::from("/data/raw/output"));
        assert_eq!(
            config.database,
            PathBuf::from("/data/raw/output/sales_data.db")
        );
        assert_eq!(
            config.formats,
            vec![OutputFormat::Csv, OutputFormat::Sqlite]
        );
    }

    #[test]
    fn bare_file_names_fall_back_to_the_working_directory() {
        let config = pipeline_config(&output_args(), Path::new("users.csv"));
        assert_eq!(config.output_dir, PathBuf::from("./output"));
    }

    #[test]
    fn explicit_flags_win_over_defaults() {
        let mut args = output_args();
        args.output_dir = Some(PathBuf::from("/tmp/cleaned"));
        args.database = Some(PathBuf::from("/tmp/retail.db"));
        let config = pipeline_config(&args, Path::new("/data/raw"));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/cleaned"));
        assert_eq!(config.database, PathBuf::from("/tmp/retail.db"));
    }
}
