//! Statement generation for the `generate` command.

use cql_schema::{ObjectType, ProcessedSchema, SchemaConfig, SchemaObject};
use loadtest_generator::{create_statement, create_statements, RecordGenerator};
use std::io::Write;
use tracing::{debug, error, info, warn};

/// What to generate from one processed dump.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub row_count: u64,
    pub seed: u64,
    /// Table filter as NAME or KEYSPACE.NAME; empty selects every table
    pub tables: Vec<String>,
    /// Emit CREATE statements for types and the selected tables first
    pub create: bool,
}

/// Counts from one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub tables: usize,
    pub create_statements: usize,
    pub records_written: u64,
    pub records_failed: u64,
}

/// Tables matching `filter` (case-insensitive), in dump order.
pub fn select_tables<'a>(processed: &'a ProcessedSchema, filter: &[String]) -> Vec<&'a SchemaObject> {
    if filter.is_empty() {
        return processed.tables().collect();
    }

    let wanted: Vec<String> = filter.iter().map(|t| t.trim().to_uppercase()).collect();
    for name in &wanted {
        let known = processed
            .tables()
            .any(|t| t.name.as_deref() == Some(name.as_str()) || t.qualified_name() == *name);
        if !known {
            warn!("Table '{name}' not found in schema");
        }
    }

    processed
        .tables()
        .filter(|t| {
            wanted
                .iter()
                .any(|w| t.name.as_deref() == Some(w.as_str()) || t.qualified_name() == *w)
        })
        .collect()
}

/// Write `;`-terminated statements, one per line.
///
/// A record that fails to generate is logged and skipped; only IO errors
/// stop the run.
pub fn write_statements<W: Write>(
    processed: &ProcessedSchema,
    config: &SchemaConfig,
    options: &GenerateOptions,
    mut writer: W,
) -> std::io::Result<GenerateSummary> {
    let target = config.target_keyspace.as_str();
    let tables = select_tables(processed, &options.tables);
    let mut summary = GenerateSummary {
        tables: tables.len(),
        ..GenerateSummary::default()
    };

    if options.create {
        for statement in create_statements(&processed.objects, ObjectType::Type, target) {
            writeln!(writer, "{statement};")?;
            summary.create_statements += 1;
        }
        for statement in tables.iter().filter_map(|t| create_statement(t, target)) {
            writeln!(writer, "{statement};")?;
            summary.create_statements += 1;
        }
    }

    let catalog = processed.udt_catalog();
    let mut generator = RecordGenerator::new(config.clone(), options.seed);
    for table in tables {
        info!(
            "Generating {} records for table '{}'",
            options.row_count,
            table.qualified_name()
        );
        for result in generator.records(table, &catalog, options.row_count) {
            match result {
                Ok(record) => {
                    writeln!(writer, "{};", record.to_cql(table, target))?;
                    summary.records_written += 1;
                    if summary.records_written % 10000 == 0 {
                        debug!("Written {} records", summary.records_written);
                    }
                }
                Err(e) => {
                    error!("Skipping record: {e}");
                    summary.records_failed += 1;
                }
            }
        }
    }
    writer.flush()?;

    Ok(summary)
}
