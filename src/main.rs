//! Command-line interface for cql-loadtest
//!
//! # Usage Examples
//!
//! ## Capacity Report
//! ```bash
//! # CSV report over every dump file in ./schemas
//! cql-loadtest report --schema-dir schemas
//!
//! # Full object dump as JSON, with custom ranges
//! cql-loadtest report --schema-dir schemas --format json \
//!   --output out/objects.json --config sizing.yaml
//! ```
//!
//! ## Statement Generation
//! ```bash
//! # CREATE statements plus 1000 records per table, to stdout
//! cql-loadtest generate --schema schemas/shop.cql --target-keyspace loadtest --create
//!
//! # Two tables only, reproducible with a fixed seed
//! cql-loadtest generate --schema schemas/shop.cql --tables orders,shop.customers \
//!   --row-count 50 --seed 7 --output out/shop.cql
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use cql_loadtest::{
    write_csv, write_json, write_statements, GenerateArgs, GenerateOptions, ReportArgs,
    ReportFormat,
};
use cql_schema::{SchemaConfig, SchemaProcessor};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Parser)]
#[command(name = "cql-loadtest")]
#[command(about = "Size CQL schema dumps and generate load-test statements for them")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the capacity report for every schema dump in a directory
    Report {
        #[command(flatten)]
        args: ReportArgs,
    },

    /// Generate CREATE and INSERT/UPDATE statements for one schema dump
    Generate {
        #[command(flatten)]
        args: GenerateArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report { args } => run_report(args).await,
        Commands::Generate { args } => run_generate(args).await,
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<SchemaConfig> {
    match path {
        Some(path) => SchemaConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {path:?}")),
        None => Ok(SchemaConfig::default()),
    }
}

fn create_output(path: &Path) -> anyhow::Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {parent:?}"))?;
    }
    let file = File::create(path).with_context(|| format!("Failed to create {path:?}"))?;
    Ok(BufWriter::new(file))
}

async fn run_report(args: ReportArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let processor = SchemaProcessor::try_new(config).context("Invalid configuration")?;

    let processed = processor
        .process_dir(&args.schema_dir)
        .await
        .with_context(|| format!("Failed to read schema directory {:?}", args.schema_dir))?;

    let mut failures = 0;
    for (path, schema) in &processed {
        failures += schema.failures.len();
        tracing::info!(
            "{}: {} objects {:?}",
            path.display(),
            schema.objects.len(),
            schema.counts_by_type()
        );
    }
    let objects = processed.iter().flat_map(|(_, schema)| &schema.objects);

    let writer = create_output(&args.output)?;
    let rows = match args.format {
        ReportFormat::Csv => write_csv(objects, writer),
        ReportFormat::Json => write_json(objects, writer),
    }
    .with_context(|| format!("Failed to write report to {:?}", args.output))?;

    tracing::info!(
        "Report complete: {rows} objects from {} files ({failures} statements skipped) written to {}",
        processed.len(),
        args.output.display()
    );
    Ok(())
}

async fn run_generate(args: GenerateArgs) -> anyhow::Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(keyspace) = args.target_keyspace {
        config = config.with_target_keyspace(keyspace);
    }
    let processed = SchemaProcessor::try_new(config.clone())
        .context("Invalid configuration")?
        .process_file(&args.schema)
        .await
        .with_context(|| format!("Failed to process schema file {:?}", args.schema))?;

    let options = GenerateOptions {
        row_count: args.row_count,
        seed: args.seed,
        tables: args.tables,
        create: args.create,
    };

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(create_output(path)?),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    let summary = write_statements(&processed, &config, &options, writer)
        .context("Failed to write statements")?;

    tracing::info!(
        "Generation complete: {} tables, {} CREATE statements, {} records written, {} records failed (target keyspace '{}')",
        summary.tables,
        summary.create_statements,
        summary.records_written,
        summary.records_failed,
        config.target_keyspace
    );
    Ok(())
}
