//! CQL schema dump parsing and capacity estimation for cql-loadtest.
//!
//! This crate reads the `;`-separated output of `DESCRIBE SCHEMA` and turns
//! it into size-annotated [`SchemaObject`]s:
//!
//! - [`SchemaProcessor`] - splits a dump, skips ignored keyspaces and
//!   dispatches each statement
//! - [`parser`] - header and column-list parsing for single statements
//! - [`TypeSizeTable`] - byte sizes for primitives and registered UDTs
//! - [`SchemaConfig`] - ranges, unit sizes and the ignore list
//!
//! # Architecture
//!
//! ```text
//! schema dump (text)
//!        │ split on ';'
//!        ▼
//! ┌──────────────────┐    CREATE TYPE    ┌───────────────┐
//! │ SchemaProcessor  │ ────────────────▶ │ TypeSizeTable │
//! └────────┬─────────┘    (register)     └───────┬───────┘
//!          │ per statement                       │ resolve
//!          ▼                                     │
//!    parse_table_or_type / parse_object ◀────────┘
//!          │
//!          ▼
//!    SchemaObject { columns, size, metrics }
//! ```
//!
//! # Example
//!
//! ```rust
//! use cql_schema::{ObjectType, SchemaProcessor};
//!
//! let processed = SchemaProcessor::default()
//!     .process("CREATE TABLE ks1.t1 (id uuid PRIMARY KEY, name text);");
//!
//! let table = &processed.objects[0];
//! assert_eq!(table.object_type, ObjectType::Table);
//! assert_eq!(table.size, 216);
//! ```

pub mod config;
pub mod error;
pub mod parser;
pub mod processor;
pub mod schema;
pub mod type_expr;
pub mod types;

// Re-exports for convenience
pub use config::{LengthRange, SchemaConfig, DEFAULT_IGNORED_KEYSPACES};
pub use error::SchemaError;
pub use parser::{
    column_definition_fragment, parse_object, parse_table_or_type, qualify_udt_references,
    rewrite_namespace,
};
pub use processor::{split_statements, ProcessedSchema, SchemaProcessor, StatementFailure};
pub use schema::{CapacityMetrics, ClusteringOrder, Column, ObjectType, SchemaObject, UdtCatalog};
pub use types::{CqlType, TypeSizeTable, Wrapper};
