//! Error types for schema parsing.

use thiserror::Error;

/// Errors that can occur while reading or parsing a schema dump.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// No known object kind (TABLE, TYPE, INDEX, ...) in the statement header.
    #[error("Unparseable statement: {0}")]
    UnparseableStatement(String),

    /// The statement was classified but its header is unusable
    /// (e.g. a table without a `keyspace.name` reference).
    #[error("Malformed {object_type} statement: {reason}")]
    MalformedStatement { object_type: String, reason: String },

    /// Error reading a schema or config file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a YAML config.
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Config values that cannot be used (e.g. `min > max`).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SchemaError {
    pub(crate) fn malformed(object_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedStatement {
            object_type: object_type.into(),
            reason: reason.into(),
        }
    }
}
