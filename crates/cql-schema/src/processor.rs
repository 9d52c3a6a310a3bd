//! Schema processor: turns a whole dump into [`SchemaObject`]s.
//!
//! Statements are processed strictly in dump order with one
//! [`TypeSizeTable`] per run. A `CREATE TYPE` is registered as soon as it
//! is parsed, so a type or table that refers to a type defined further
//! down the dump keeps a zero size for that reference; there is no second
//! resolution pass.
//!
//! The dump is split on every `;`, including ones inside quoted literals.
//! Dumps produced by `DESCRIBE SCHEMA` do not contain such literals in the
//! statements this crate reads.

use crate::config::SchemaConfig;
use crate::error::SchemaError;
use crate::parser::{excerpt, parse_object, parse_table_or_type};
use crate::schema::{ObjectType, SchemaObject, UdtCatalog};
use crate::types::TypeSizeTable;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A statement that could not be turned into an object.
#[derive(Debug)]
pub struct StatementFailure {
    /// Position of the statement in the dump (0-based)
    pub index: usize,
    /// First line of the statement
    pub excerpt: String,
    pub error: SchemaError,
}

/// Result of processing one dump.
#[derive(Debug)]
pub struct ProcessedSchema {
    /// Objects in dump order
    pub objects: Vec<SchemaObject>,
    /// Statements that were dropped
    pub failures: Vec<StatementFailure>,
    /// Type sizes after the last statement
    pub type_sizes: TypeSizeTable,
}

impl ProcessedSchema {
    pub fn tables(&self) -> impl Iterator<Item = &SchemaObject> {
        self.objects
            .iter()
            .filter(|o| o.object_type == ObjectType::Table)
    }

    pub fn types(&self) -> impl Iterator<Item = &SchemaObject> {
        self.objects
            .iter()
            .filter(|o| o.object_type == ObjectType::Type)
    }

    /// Lookup of the user-defined types in this dump.
    pub fn udt_catalog(&self) -> UdtCatalog<'_> {
        UdtCatalog::new(&self.objects)
    }

    /// Number of objects per kind.
    pub fn counts_by_type(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for object in &self.objects {
            *counts.entry(object.object_type.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

/// Processes schema dumps with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct SchemaProcessor {
    config: SchemaConfig,
}

impl SchemaProcessor {
    /// Processor for `config` as given.
    ///
    /// The config is not validated here. A zero capacity unit leaves every
    /// object without metrics; use [`SchemaProcessor::try_new`] to reject
    /// such configs up front.
    pub fn new(config: SchemaConfig) -> Self {
        Self { config }
    }

    /// Processor for a config that passes [`SchemaConfig::validate`].
    pub fn try_new(config: SchemaConfig) -> Result<Self, SchemaError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Process one dump. Bad statements are recorded, never fatal.
    pub fn process(&self, dump: &str) -> ProcessedSchema {
        let mut type_sizes = TypeSizeTable::new(&self.config);
        let mut objects = Vec::new();
        let mut failures = Vec::new();

        for (index, statement) in split_statements(dump).enumerate() {
            let prefix = statement.split('.').next().unwrap_or_default();
            if let Some(keyspace) = self.config.is_ignored(prefix) {
                debug!("Skipping statement {index} in ignored keyspace '{keyspace}'");
                continue;
            }

            match self.process_statement(statement, &mut type_sizes) {
                Ok(object) => objects.push(object),
                Err(error) => {
                    warn!("Ignoring statement {index}: {error}");
                    failures.push(StatementFailure {
                        index,
                        excerpt: excerpt(statement),
                        error,
                    });
                }
            }
        }

        ProcessedSchema {
            objects,
            failures,
            type_sizes,
        }
    }

    fn process_statement(
        &self,
        statement: &str,
        type_sizes: &mut TypeSizeTable,
    ) -> Result<SchemaObject, SchemaError> {
        let head: Vec<String> = statement
            .split_whitespace()
            .take(2)
            .map(str::to_uppercase)
            .collect();

        match (head.first().map(String::as_str), head.get(1).map(String::as_str)) {
            (Some("CREATE"), Some("TABLE")) => {
                parse_table_or_type(statement, type_sizes, &self.config)
            }
            (Some("CREATE"), Some("TYPE")) => {
                let object = parse_table_or_type(statement, type_sizes, &self.config)?;
                if let Some(name) = &object.name {
                    type_sizes.register_udt(&object.keyspace, name, object.size);
                    debug!("Registered type {} ({} bytes)", object.qualified_name(), object.size);
                }
                Ok(object)
            }
            _ => parse_object(statement),
        }
    }

    /// Read and process one dump file.
    pub async fn process_file<P: AsRef<Path>>(&self, path: P) -> Result<ProcessedSchema, SchemaError> {
        let path = path.as_ref();
        info!("Reading file: {}", path.display());
        let dump = tokio::fs::read_to_string(path).await?;
        let processed = self.process(&dump);
        info!(
            "Processed {}: {} objects, {} failures",
            path.display(),
            processed.objects.len(),
            processed.failures.len()
        );
        Ok(processed)
    }

    /// Process every file of a directory in path order, each with its own type table.
    pub async fn process_dir<P: AsRef<Path>>(
        &self,
        dir: P,
    ) -> Result<Vec<(PathBuf, ProcessedSchema)>, SchemaError> {
        let mut entries = tokio::fs::read_dir(dir.as_ref()).await?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            let processed = self.process_file(&path).await?;
            results.push((path, processed));
        }
        Ok(results)
    }
}

/// Non-blank statements of a dump, split on `;`.
pub fn split_statements(dump: &str) -> impl Iterator<Item = &str> {
    dump.split(';').filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_statements_skips_blanks() {
        let parts: Vec<&str> = split_statements("CREATE KEYSPACE a;\n\n;CREATE KEYSPACE b;\n").collect();
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_split_statements_is_naive_about_quotes() {
        let parts: Vec<&str> =
            split_statements("CREATE TABLE ks.t (id int PRIMARY KEY) WITH comment = 'a;b';").collect();
        assert_eq!(parts.len(), 2);
    }

    #[test]
    fn test_process_keeps_dump_order() {
        let dump = r#"
CREATE KEYSPACE ks1 WITH replication = {'class': 'SimpleStrategy', 'replication_factor': '1'};
CREATE TABLE ks1.t1 (id uuid PRIMARY KEY, name text);
CREATE TYPE ks1.addr (city text);
CREATE INDEX t1_name_idx ON ks1.t1 (name);
"#;
        let processed = SchemaProcessor::default().process(dump);
        let kinds: Vec<ObjectType> = processed.objects.iter().map(|o| o.object_type).collect();
        assert_eq!(
            kinds,
            vec![
                ObjectType::Keyspace,
                ObjectType::Table,
                ObjectType::Type,
                ObjectType::Index
            ]
        );
        assert_eq!(processed.tables().count(), 1);
        assert_eq!(processed.types().count(), 1);
        assert_eq!(processed.counts_by_type().get("TABLE"), Some(&1));
        assert!(processed.failures.is_empty());
    }

    #[test]
    fn test_lowercase_keywords_dispatch() {
        let processed =
            SchemaProcessor::default().process("create type ks1.addr (city text, zip text);");
        assert_eq!(processed.objects.len(), 1);
        assert_eq!(processed.type_sizes.get("KS1.ADDR"), Some(400));
    }

    #[test]
    fn test_forward_reference_stays_zero() {
        let dump = r#"
CREATE TYPE ks1.outer (inner frozen<ks1.inner>, note text);
CREATE TYPE ks1.inner (a int, b int);
"#;
        let processed = SchemaProcessor::default().process(dump);
        assert_eq!(processed.type_sizes.get("KS1.INNER"), Some(8));
        // inner was not registered yet when outer was sized
        assert_eq!(processed.type_sizes.get("KS1.OUTER"), Some(200));
    }

    #[test]
    fn test_failure_is_recorded() {
        let dump = "CREATE TABLE ks1.t1 (id uuid PRIMARY KEY);\nCREATE AGGREGATE ks1.avg (int) SFUNC f STYPE int;";
        let processed = SchemaProcessor::default().process(dump);
        assert_eq!(processed.objects.len(), 1);
        assert_eq!(processed.failures.len(), 1);
        assert_eq!(processed.failures[0].index, 1);
        assert!(matches!(
            processed.failures[0].error,
            SchemaError::UnparseableStatement(_)
        ));
    }

    #[test]
    fn test_zero_write_unit_leaves_metrics_empty() {
        let config = SchemaConfig {
            write_unit_bytes: 0,
            ..SchemaConfig::default()
        };
        assert!(matches!(
            SchemaProcessor::try_new(config.clone()),
            Err(SchemaError::InvalidConfig(_))
        ));

        let processed = SchemaProcessor::new(config).process("CREATE TABLE ks.t (id int PRIMARY KEY);");
        assert_eq!(processed.objects.len(), 1);
        assert_eq!(processed.objects[0].size, 4);
        assert!(processed.objects[0].metrics.is_none());
    }

    #[tokio::test]
    async fn test_process_file_and_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("b.cql"),
            "CREATE TABLE ks2.t (id int PRIMARY KEY);",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("a.cql"),
            "CREATE TYPE ks1.addr (city text);\nCREATE TABLE ks1.t (id int PRIMARY KEY, home frozen<ks1.addr>);",
        )
        .unwrap();

        let processor = SchemaProcessor::default();
        let single = processor.process_file(dir.path().join("a.cql")).await.unwrap();
        assert_eq!(single.objects.len(), 2);

        let results = processor.process_dir(dir.path()).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].0.ends_with("a.cql"));
        assert_eq!(results[0].1.objects[1].size, 204);
        // Each file starts from a fresh type table
        assert_eq!(results[1].1.type_sizes.get("KS1.ADDR"), None);
    }

    #[tokio::test]
    async fn test_process_file_missing() {
        let result = SchemaProcessor::default()
            .process_file("/nonexistent/schema.cql")
            .await;
        assert!(matches!(result, Err(SchemaError::Io(_))));
    }
}
