//! Tuning knobs shared by the schema processor and the value generators.
//!
//! Every run gets its own [`SchemaConfig`]; nothing here is process-wide.
//! The YAML form uses the same field names, and any field left out falls
//! back to its default:
//!
//! ```yaml
//! target_keyspace: app
//! ignored_keyspaces: [system, system_auth]
//! string_length_range: { min: 5, max: 200 }
//! collection_length_range: { min: 1, max: 5 }
//! write_unit_bytes: 1000
//! ```

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

/// Keyspaces that belong to the database itself or to its tooling.
pub const DEFAULT_IGNORED_KEYSPACES: &[&str] = &[
    "OpsCenter",
    "solr_admin",
    "dse_insights_local",
    "dse_system",
    "system_auth",
    "system_traces",
    "system",
    "dse_system_local",
    "system_distributed",
    "system_schema",
    "dse_perf",
    "dse_insights",
    "dse_security",
    "dse_leases",
    "HiveMetaStore",
    "dsefs",
    "DSE_ANALYTICS",
    "scylla_manager",
];

/// Inclusive `[min, max]` range. Sizing uses `max`; generation draws from the range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRange {
    pub min: usize,
    pub max: usize,
}

impl LengthRange {
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Inclusive range between the two ends, lowest first even when
    /// `min > max` slipped past validation.
    pub fn bounds(&self) -> RangeInclusive<usize> {
        self.min.min(self.max)..=self.max.max(self.min)
    }
}

/// Configuration for one schema-processing and generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Keyspace the regenerated objects are created in.
    pub target_keyspace: String,

    /// Keyspaces whose statements are skipped (case-insensitive substring match).
    pub ignored_keyspaces: Vec<String>,

    /// Length of generated text values; `max` is the text size estimate.
    pub string_length_range: LengthRange,

    /// Element count of generated sets, lists and maps; `max` is the
    /// cardinality factor applied to set and list sizes.
    pub collection_length_range: LengthRange,

    /// Byte length of generated blobs; `max` is the blob size estimate.
    pub blob_length_range: LengthRange,

    /// Bytes covered by one write capacity unit.
    pub write_unit_bytes: u64,

    /// Bytes covered by one read capacity unit.
    pub read_unit_bytes: u64,

    /// Columns starting with this prefix get short payloads.
    pub code_column_prefix: String,

    /// Payload bytes for text and blob columns matching `code_column_prefix`.
    pub code_payload_bytes: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            target_keyspace: "app".to_string(),
            ignored_keyspaces: DEFAULT_IGNORED_KEYSPACES
                .iter()
                .map(|ks| ks.to_string())
                .collect(),
            string_length_range: LengthRange::new(5, 200),
            collection_length_range: LengthRange::new(1, 5),
            blob_length_range: LengthRange::new(200, 1000),
            write_unit_bytes: 1000,
            read_unit_bytes: 4000,
            code_column_prefix: "COD_".to_string(),
            code_payload_bytes: 10,
        }
    }
}

impl SchemaConfig {
    /// Load config from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let config: SchemaConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Override the target keyspace.
    pub fn with_target_keyspace(mut self, keyspace: impl Into<String>) -> Self {
        self.target_keyspace = keyspace.into();
        self
    }

    /// Check ranges and unit sizes.
    pub fn validate(&self) -> Result<(), SchemaError> {
        for (name, range) in [
            ("string_length_range", self.string_length_range),
            ("collection_length_range", self.collection_length_range),
            ("blob_length_range", self.blob_length_range),
        ] {
            if range.min > range.max {
                return Err(SchemaError::InvalidConfig(format!(
                    "{name}: min {} is greater than max {}",
                    range.min, range.max
                )));
            }
        }
        if self.write_unit_bytes == 0 || self.read_unit_bytes == 0 {
            return Err(SchemaError::InvalidConfig(
                "write_unit_bytes and read_unit_bytes must be positive".to_string(),
            ));
        }
        if self.target_keyspace.is_empty() {
            return Err(SchemaError::InvalidConfig(
                "target_keyspace must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether the statement prefix names an ignored keyspace.
    pub fn is_ignored(&self, prefix: &str) -> Option<&str> {
        let prefix = prefix.to_uppercase();
        self.ignored_keyspaces
            .iter()
            .find(|ks| prefix.contains(&ks.to_uppercase()))
            .map(String::as_str)
    }

    /// Whether a column gets the short "code" payload.
    pub fn is_code_column(&self, column: &str) -> bool {
        !self.code_column_prefix.is_empty()
            && column
                .to_uppercase()
                .starts_with(&self.code_column_prefix.to_uppercase())
    }
}
