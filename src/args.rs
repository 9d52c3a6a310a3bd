//! CLI argument definitions shared by the `report` and `generate` commands.

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// Output format of the capacity report.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportFormat {
    /// One row per object with the capacity columns
    #[default]
    Csv,
    /// Full processed objects, including columns
    Json,
}

/// Arguments for `report`.
#[derive(Args, Clone, Debug)]
pub struct ReportArgs {
    /// Directory of schema dump files (every file is processed)
    #[arg(long, default_value = "schemas")]
    pub schema_dir: PathBuf,

    /// Report file to write
    #[arg(long, short = 'o', default_value = "out/table_stats_from_schema.csv")]
    pub output: PathBuf,

    /// Report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Csv)]
    pub format: ReportFormat,

    /// YAML file with sizing and generation settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for `generate`.
#[derive(Args, Clone, Debug)]
pub struct GenerateArgs {
    /// Schema dump file to generate statements for
    #[arg(long, short = 's')]
    pub schema: PathBuf,

    /// Keyspace the statements target (overrides the config file)
    #[arg(long, env = "TARGET_KEYSPACE")]
    pub target_keyspace: Option<String>,

    /// Number of records to generate per table
    #[arg(long, default_value = "1000")]
    pub row_count: u64,

    /// Random seed for deterministic generation (same seed = same data)
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Specific tables to generate, as NAME or KEYSPACE.NAME (comma-separated, empty = all)
    #[arg(long, value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Emit CREATE TYPE and CREATE TABLE statements before the records
    #[arg(long)]
    pub create: bool,

    /// YAML file with sizing and generation settings
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write statements to this file instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}
