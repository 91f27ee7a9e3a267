//! CLI argument definitions for the retail data pipeline.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use mrdc_model::Entity;

#[derive(Parser)]
#[command(
    name = "mrdc",
    version,
    about = "Multinational retail data centralisation pipeline",
    long_about = "Clean multi-source retail datasets and load them into a star schema.\n\n\
                  Reads raw CSV/JSON entity datasets, applies per-entity cleaning and\n\
                  normalization rules, and writes cleaned CSV files plus a SQLite\n\
                  warehouse of dimension and fact tables."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean one entity's dataset and load the result.
    Clean(CleanArgs),

    /// Clean every entity dataset found in a data directory.
    Run(RunArgs),

    /// Print the card provider length table in effect.
    Standards,
}

#[derive(Parser)]
pub struct CleanArgs {
    /// Entity the dataset holds (user, card, store, product, order, event).
    #[arg(value_name = "ENTITY")]
    pub entity: Entity,

    /// Raw dataset file (.csv or .json).
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Directory holding raw entity datasets (users.csv, events.json, ...).
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Output and policy flags shared by `clean` and `run`.
#[derive(Parser)]
pub struct OutputArgs {
    /// Directory for cleaned CSV files (default: <input>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// SQLite warehouse file (default: <output dir>/sales_data.db).
    #[arg(long = "database", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Output format to write.
    #[arg(long = "format", value_enum, default_value = "both")]
    pub format: OutputFormatArg,

    /// Clean and report without writing any output.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Require user ages between 16 and 120.
    ///
    /// The default keeps the historical permissive rule, which accepts any
    /// parseable date of birth.
    #[arg(long = "bounded-age")]
    pub bounded_age: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Sqlite,
    Both,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
