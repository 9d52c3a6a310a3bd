//! Record generator for the cql-loadtest framework.
//!
//! This crate turns the tables of a processed schema dump into CQL
//! statements filled with synthetic values. The generator uses a seeded RNG
//! so runs with the same seed and schema produce the same records (apart
//! from date, time and timeuuid values, which follow the clock).
//!
//! # Architecture
//!
//! ```text
//! ProcessedSchema (cql-schema)
//!        │ tables + UdtCatalog
//!        ▼
//! ┌──────────────────┐
//! │ RecordGenerator  │
//! │                  │
//! │  - config        │
//! │  - rng (StdRng)  │
//! │  - index         │
//! └────────┬─────────┘
//!          │ generate_value per column
//!          ▼
//!    GeneratedRecord { table, index, values }
//!          │ to_cql
//!          ▼
//!    INSERT INTO target.KS_NAME (...) VALUES (...)
//! ```
//!
//! # Example
//!
//! ```rust
//! use cql_schema::{SchemaConfig, SchemaProcessor};
//! use loadtest_generator::RecordGenerator;
//!
//! let processed = SchemaProcessor::default()
//!     .process("CREATE TABLE ks1.t1 (id uuid PRIMARY KEY, tags set<int>);");
//! let catalog = processed.udt_catalog();
//! let table = &processed.objects[0];
//!
//! let mut generator = RecordGenerator::new(SchemaConfig::default(), 42);
//! let record = generator.next_record(table, &catalog).unwrap();
//! println!("{}", record.to_cql(table, "app"));
//! ```
//!
//! # Literals
//!
//! - text, ascii, varchar - quoted hex; `COD_` columns get a short payload
//! - blob - `textAsBlob('<hex>')`
//! - integers, decimals, booleans - bare numbers and `true`/`false`
//! - date, time, timestamp - quoted, from the current UTC time
//! - uuid, timeuuid - bare v4 and v1 identifiers
//! - map, set, list, tuple, UDT - `{ k : v }`, `{ a,b }`, `[ a,b ]`, `( a,b )`, `{ F : v }`

pub mod generator;
pub mod generators;
pub mod statement;

// Re-exports for convenience
pub use generator::{GeneratedRecord, GeneratorError, RecordGenerator, RecordIterator};
pub use generators::{generate_value, ValueContext};
pub use statement::{create_statement, create_statements};
