//! Parsed schema objects and their capacity metrics.

use crate::config::SchemaConfig;
use crate::types::Wrapper;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Object Kinds
// ============================================================================

/// Kind of object a `CREATE` statement defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectType {
    #[serde(rename = "TABLE")]
    Table,
    #[serde(rename = "TYPE")]
    Type,
    #[serde(rename = "MATERIALIZED VIEW")]
    MaterializedView,
    #[serde(rename = "KEYSPACE")]
    Keyspace,
    #[serde(rename = "INDEX")]
    Index,
    #[serde(rename = "CUSTOM INDEX")]
    CustomIndex,
}

impl ObjectType {
    /// Multi-word kinds come first so `CUSTOM INDEX` is not read as `INDEX`.
    pub const MATCH_ORDER: [ObjectType; 6] = [
        ObjectType::MaterializedView,
        ObjectType::CustomIndex,
        ObjectType::Index,
        ObjectType::Type,
        ObjectType::Table,
        ObjectType::Keyspace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Table => "TABLE",
            ObjectType::Type => "TYPE",
            ObjectType::MaterializedView => "MATERIALIZED VIEW",
            ObjectType::Keyspace => "KEYSPACE",
            ObjectType::Index => "INDEX",
            ObjectType::CustomIndex => "CUSTOM INDEX",
        }
    }

    /// Tables and types carry a column list.
    pub fn has_columns(&self) -> bool {
        matches!(self, ObjectType::Table | ObjectType::Type)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clustering direction from `WITH CLUSTERING ORDER BY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClusteringOrder {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

// ============================================================================
// Columns
// ============================================================================

/// A column of a table, or a field of a user-defined type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Upper-cased column name
    pub name: String,

    /// Full type expression, e.g. `FROZEN<MAP<TEXT,LIST<INT>>>`
    pub definition: String,

    /// Leaf type names used for sizing, wrappers removed
    pub component_types: Vec<String>,

    /// Estimated size in bytes
    pub size: u64,

    pub is_primary_key: bool,
    pub is_partition_key: bool,
    pub is_clustering_key: bool,
    pub clustering_order: Option<ClusteringOrder>,
    pub is_counter: bool,
    pub is_static: bool,
    pub is_frozen: bool,
    pub is_set: bool,
    pub is_list: bool,
    pub is_map: bool,
    pub is_tuple: bool,
}

impl Column {
    /// New column with no type yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn set_wrapper_flag(&mut self, wrapper: Wrapper) {
        match wrapper {
            Wrapper::List => self.is_list = true,
            Wrapper::Set => self.is_set = true,
            Wrapper::Map => self.is_map = true,
            Wrapper::Tuple => self.is_tuple = true,
            Wrapper::Frozen => self.is_frozen = true,
        }
    }

    /// Whether the column is typed (a name with no type is a parse leftover).
    pub fn has_type(&self) -> bool {
        !self.definition.is_empty()
    }
}

// ============================================================================
// Capacity Metrics
// ============================================================================

/// Write/read capacity units derived from a record size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityMetrics {
    /// Write units consumed by one record: `ceil(size / write_unit_bytes)`
    pub write_units_per_record: u64,
    /// Records that fit in one write unit: `floor(write_unit_bytes / size)`
    pub records_per_write_unit: u64,
    /// Records that fit in one read unit: `floor(read_unit_bytes / size)`
    pub records_per_read_unit: u64,
    /// Set when a record needs a whole write unit or more
    pub oversize_warning: bool,
}

impl CapacityMetrics {
    /// Metrics for a record of `size` bytes; `None` for zero-sized records
    /// and for configs with a zero-byte capacity unit.
    pub fn from_size(size: u64, config: &SchemaConfig) -> Option<Self> {
        if size == 0 || config.write_unit_bytes == 0 || config.read_unit_bytes == 0 {
            return None;
        }
        let records_per_write_unit = config.write_unit_bytes / size;
        Some(Self {
            write_units_per_record: size.div_ceil(config.write_unit_bytes),
            records_per_write_unit,
            records_per_read_unit: config.read_unit_bytes / size,
            oversize_warning: records_per_write_unit <= 1,
        })
    }
}

// ============================================================================
// Schema Objects
// ============================================================================

/// One parsed `CREATE` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaObject {
    pub object_type: ObjectType,

    /// Upper-cased keyspace
    pub keyspace: String,

    /// Upper-cased object name (keyspaces have none)
    pub name: Option<String>,

    /// Columns in declaration order (tables and types only)
    pub columns: Vec<Column>,

    /// Column-definition fragment rewritten for the target keyspace
    pub col_definition: String,

    /// Sum of the column sizes in bytes
    pub size: u64,

    /// Whether any column is a counter
    pub is_counter: bool,

    /// Capacity units for one record (tables and types with a size)
    pub metrics: Option<CapacityMetrics>,
}

impl SchemaObject {
    /// Object without columns (keyspaces, indexes, views).
    pub fn new(object_type: ObjectType, keyspace: impl Into<String>, name: Option<String>) -> Self {
        Self {
            object_type,
            keyspace: keyspace.into(),
            name,
            columns: Vec::new(),
            col_definition: String::new(),
            size: 0,
            is_counter: false,
            metrics: None,
        }
    }

    /// `KEYSPACE.NAME`, or just the keyspace when there is no name.
    pub fn qualified_name(&self) -> String {
        match &self.name {
            Some(name) => format!("{}.{}", self.keyspace, name),
            None => self.keyspace.clone(),
        }
    }

    /// Name under the target keyspace: `target.KEYSPACE_NAME`.
    pub fn target_name(&self, target_keyspace: &str) -> String {
        match &self.name {
            Some(name) => format!("{target_keyspace}.{}_{name}", self.keyspace),
            None => format!("{target_keyspace}.{}", self.keyspace),
        }
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        let name = name.to_uppercase();
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| c.is_primary_key)
    }

    /// Sum the column sizes and derive the capacity metrics.
    pub fn finalize_size(&mut self, config: &SchemaConfig) {
        self.size = self.columns.iter().map(|c| c.size).sum();
        self.is_counter = self.columns.iter().any(|c| c.is_counter);
        self.metrics = CapacityMetrics::from_size(self.size, config);
    }
}

/// User-defined types of one processed dump, keyed by `KEYSPACE.NAME`.
#[derive(Debug, Clone, Default)]
pub struct UdtCatalog<'a> {
    types: HashMap<String, &'a SchemaObject>,
}

impl<'a> UdtCatalog<'a> {
    /// Catalog of every TYPE object in `objects`; later duplicates win.
    pub fn new(objects: impl IntoIterator<Item = &'a SchemaObject>) -> Self {
        let types = objects
            .into_iter()
            .filter(|o| o.object_type == ObjectType::Type)
            .map(|o| (o.qualified_name().to_uppercase(), o))
            .collect();
        Self { types }
    }

    /// Look up a type by `KEYSPACE.NAME`, retrying a bare name in `default_keyspace`.
    pub fn get(&self, type_name: &str, default_keyspace: &str) -> Option<&'a SchemaObject> {
        let upper = type_name.to_uppercase();
        self.types.get(&upper).copied().or_else(|| {
            if upper.contains('.') {
                None
            } else {
                let qualified = format!("{default_keyspace}.{upper}").to_uppercase();
                self.types.get(&qualified).copied()
            }
        })
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_metrics_small_record() {
        let config = SchemaConfig::default();
        let metrics = CapacityMetrics::from_size(216, &config).unwrap();

        assert_eq!(metrics.write_units_per_record, 1);
        assert_eq!(metrics.records_per_write_unit, 4);
        assert_eq!(metrics.records_per_read_unit, 18);
        assert!(!metrics.oversize_warning);
    }

    #[test]
    fn test_capacity_metrics_oversize() {
        let config = SchemaConfig::default();

        let exact = CapacityMetrics::from_size(1000, &config).unwrap();
        assert_eq!(exact.write_units_per_record, 1);
        assert_eq!(exact.records_per_write_unit, 1);
        assert!(exact.oversize_warning);

        let large = CapacityMetrics::from_size(2500, &config).unwrap();
        assert_eq!(large.write_units_per_record, 3);
        assert_eq!(large.records_per_write_unit, 0);
        assert_eq!(large.records_per_read_unit, 1);
        assert!(large.oversize_warning);
    }

    #[test]
    fn test_capacity_metrics_zero_size() {
        assert!(CapacityMetrics::from_size(0, &SchemaConfig::default()).is_none());
    }

    #[test]
    fn test_capacity_metrics_zero_unit() {
        let config = SchemaConfig {
            read_unit_bytes: 0,
            ..SchemaConfig::default()
        };
        assert!(CapacityMetrics::from_size(216, &config).is_none());
    }

    #[test]
    fn test_target_name() {
        let table = SchemaObject::new(ObjectType::Table, "KS1", Some("T1".to_string()));
        assert_eq!(table.qualified_name(), "KS1.T1");
        assert_eq!(table.target_name("app"), "app.KS1_T1");

        let keyspace = SchemaObject::new(ObjectType::Keyspace, "KS1", None);
        assert_eq!(keyspace.qualified_name(), "KS1");
    }

    #[test]
    fn test_udt_catalog_lookup() {
        let udt = SchemaObject::new(ObjectType::Type, "KS1", Some("ADDR".to_string()));
        let table = SchemaObject::new(ObjectType::Table, "KS1", Some("T1".to_string()));
        let objects = vec![udt, table];
        let catalog = UdtCatalog::new(&objects);

        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("KS1.ADDR", "KS2").is_some());
        assert!(catalog.get("ks1.addr", "KS2").is_some());
        assert!(catalog.get("ADDR", "KS1").is_some());
        assert!(catalog.get("ADDR", "KS2").is_none());
        assert!(catalog.get("KS1.T1", "KS1").is_none());
    }

    #[test]
    fn test_object_type_serde_names() {
        let json = serde_json::to_string(&ObjectType::MaterializedView).unwrap();
        assert_eq!(json, "\"MATERIALIZED VIEW\"");
    }
}
