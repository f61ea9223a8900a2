use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::chart::ChartKind;
use crate::config::LOCAL_CONFIG_NAME;

/// Output format for listing commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per record
    #[default]
    Text,
    /// JSON array
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "equipment-report")]
#[command(author, version, about = "Summarize equipment CSV files and compose PDF reports")]
#[command(long_about = "Summarize equipment CSV datasets, keep recent uploads, and compose \
    chart-illustrated PDF reports.\n\n\
    Exit codes:\n  \
    0 - Success\n  \
    1 - Rejected input (unreadable CSV, missing columns, unknown dataset)\n  \
    2 - Configuration or runtime error")]
pub struct Cli {
    /// Increase log verbosity (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Skip loading configuration file
    #[arg(long, global = true, conflicts_with = "config")]
    pub no_config: bool,

    /// Dataset store directory (overrides config)
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a CSV file without storing it
    Summarize(SummarizeArgs),

    /// Summarize a CSV file and store it
    Upload(UploadArgs),

    /// List recently stored datasets
    History(HistoryArgs),

    /// Show the summary and preview rows of a stored dataset
    Show(ShowArgs),

    /// Generate a PDF report for a stored dataset
    Report(ReportArgs),

    /// Generate a PDF report from a JSON report request
    Compose(ComposeArgs),

    /// Generate a default configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct SummarizeArgs {
    /// CSV file to summarize
    pub input: PathBuf,

    /// Write JSON to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct UploadArgs {
    /// CSV file to store
    pub input: PathBuf,

    /// Owner used for retention and history filtering
    #[arg(long)]
    pub owner: Option<String>,

    /// Stored file name (defaults to the input file name)
    #[arg(long)]
    pub name: Option<String>,
}

#[derive(Parser, Debug)]
pub struct HistoryArgs {
    /// Only list datasets of this owner
    #[arg(long)]
    pub owner: Option<String>,

    /// Maximum number of datasets to list
    #[arg(long, default_value_t = 5)]
    pub limit: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Dataset id
    pub id: u64,
}

#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Dataset id
    pub id: u64,

    /// Chart type for the type distribution chart
    #[arg(long, value_enum, default_value = "bar")]
    pub chart_type: ChartKind,

    /// Output PDF path (defaults to report_dataset_<id>.pdf)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name printed as the report author
    #[arg(long)]
    pub generated_by: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ComposeArgs {
    /// JSON request file, or `-` for stdin
    pub request: PathBuf,

    /// Output PDF path (defaults to the request's filename)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Name printed as the report author
    #[arg(long)]
    pub generated_by: Option<String>,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output path for the configuration file
    #[arg(short, long, default_value = LOCAL_CONFIG_NAME)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
