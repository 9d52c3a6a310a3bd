//! Record generator producing one CQL literal per column.

use crate::generators::{generate_value, ValueContext};
use crate::statement;
use cql_schema::{SchemaConfig, SchemaError, SchemaObject, UdtCatalog};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Type name is neither a primitive nor a known user-defined type
    #[error("Unresolved type: {0}")]
    UnresolvedType(String),

    /// Type expression could not be split into wrapper and parts
    #[error("Malformed type expression: {0}")]
    MalformedType(String),

    /// Wrapper nesting exceeded the supported depth
    #[error("Type nesting deeper than {0} levels")]
    RecursionLimit(usize),

    /// Config rejected by `SchemaConfig::validate`
    #[error("Invalid generator config: {0}")]
    Config(#[from] SchemaError),

    /// Object has no typed columns to generate
    #[error("No columns to generate for {0}")]
    NoColumns(String),

    /// Failure while generating a single column
    #[error("Failed to generate {table}.{column} ({type_expr}): {source}")]
    Column {
        table: String,
        column: String,
        type_expr: String,
        source: Box<GeneratorError>,
    },
}

/// One generated record: `(column, literal)` pairs in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRecord {
    /// `KEYSPACE.NAME` of the source table
    pub table: String,
    pub index: u64,
    pub values: Vec<(String, String)>,
}

impl GeneratedRecord {
    /// Literal generated for a column.
    pub fn get(&self, column: &str) -> Option<&str> {
        let column = column.to_uppercase();
        self.values
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Render as an INSERT, or as a counter UPDATE for counter tables.
    pub fn to_cql(&self, table: &SchemaObject, target_keyspace: &str) -> String {
        if table.is_counter {
            statement::counter_update_statement(self, table, target_keyspace)
        } else {
            statement::insert_statement(self, table, target_keyspace)
        }
    }
}

/// Record generator over processed schema objects.
///
/// Values are drawn from a seeded RNG, so two generators with the same
/// seed produce the same records (clock-based literals aside).
pub struct RecordGenerator {
    config: SchemaConfig,
    rng: StdRng,
    /// Index of the next record
    index: u64,
}

impl RecordGenerator {
    /// Create a new record generator with the given config and seed.
    ///
    /// The config is taken as is. Length ranges with `min > max` are drawn
    /// between their ends; [`RecordGenerator::try_new`] rejects them instead.
    pub fn new(config: SchemaConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            index: 0,
        }
    }

    /// Create a record generator, validating the config first.
    pub fn try_new(config: SchemaConfig, seed: u64) -> Result<Self, GeneratorError> {
        config.validate()?;
        Ok(Self::new(config, seed))
    }

    /// Get the current record index.
    pub fn current_index(&self) -> u64 {
        self.index
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Generate the next record for `table`.
    ///
    /// A failed record still consumes its index.
    pub fn next_record(
        &mut self,
        table: &SchemaObject,
        catalog: &UdtCatalog<'_>,
    ) -> Result<GeneratedRecord, GeneratorError> {
        let index = self.index;
        self.index += 1;

        let ctx = ValueContext::new(&self.config, catalog, &table.keyspace);
        let mut values = Vec::with_capacity(table.columns.len());
        for column in table.columns.iter().filter(|c| c.has_type()) {
            let value = generate_value(&mut self.rng, ctx, &column.name, &column.definition)
                .map_err(|source| GeneratorError::Column {
                    table: table.qualified_name(),
                    column: column.name.clone(),
                    type_expr: column.definition.clone(),
                    source: Box::new(source),
                })?;
            values.push((column.name.clone(), value));
        }

        if values.is_empty() {
            return Err(GeneratorError::NoColumns(table.qualified_name()));
        }

        Ok(GeneratedRecord {
            table: table.qualified_name(),
            index,
            values,
        })
    }

    /// Generate `count` records for `table`.
    ///
    /// Returns an iterator that lazily generates records.
    pub fn records<'a>(
        &'a mut self,
        table: &'a SchemaObject,
        catalog: &'a UdtCatalog<'a>,
        count: u64,
    ) -> RecordIterator<'a> {
        RecordIterator {
            generator: self,
            table,
            catalog,
            remaining: count,
        }
    }
}

/// Iterator that lazily generates records.
pub struct RecordIterator<'a> {
    generator: &'a mut RecordGenerator,
    table: &'a SchemaObject,
    catalog: &'a UdtCatalog<'a>,
    remaining: u64,
}

impl Iterator for RecordIterator<'_> {
    type Item = Result<GeneratedRecord, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        Some(self.generator.next_record(self.table, self.catalog))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RecordIterator<'_> {}
