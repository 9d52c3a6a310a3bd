//! cql-loadtest library
//!
//! Sizing reports and load-test statement generation for CQL schema dumps
//! (the `;`-separated output of `DESCRIBE SCHEMA`).
//!
//! # Crates
//!
//! - `cql_schema` - dump parsing, type sizes and capacity metrics
//! - `loadtest_generator` - synthetic CQL literals and record statements
//!
//! # CLI Usage
//!
//! ```bash
//! # Capacity report over every dump in ./schemas
//! cql-loadtest report --schema-dir schemas --output out/table_stats_from_schema.csv
//!
//! # 500 INSERTs per table, preceded by the CREATE statements
//! TARGET_KEYSPACE=loadtest cql-loadtest generate --schema schemas/prod.cql \
//!   --row-count 500 --create --output out/prod.cql
//! ```

pub mod args;
pub mod generate;
pub mod report;

pub use args::{GenerateArgs, ReportArgs, ReportFormat};
pub use generate::{select_tables, write_statements, GenerateOptions, GenerateSummary};
pub use report::{write_csv, write_json, ReportError, ReportRow};
