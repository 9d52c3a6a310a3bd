//! Primitive CQL types and the byte-size table used for capacity estimates.
//!
//! Sizes follow the CQL type reference. Variable-width types (text, blob)
//! are sized by the configured maximum length, so estimates err on the
//! large side.

use crate::config::SchemaConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Primitive CQL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CqlType {
    Ascii,
    BigInt,
    Blob,
    Boolean,
    Counter,
    Date,
    Decimal,
    Double,
    Duration,
    Float,
    Inet,
    Int,
    SmallInt,
    Text,
    Time,
    Timestamp,
    TimeUuid,
    TinyInt,
    Uuid,
    VarChar,
    VarInt,
}

impl CqlType {
    pub const ALL: [CqlType; 21] = [
        CqlType::Ascii,
        CqlType::BigInt,
        CqlType::Blob,
        CqlType::Boolean,
        CqlType::Counter,
        CqlType::Date,
        CqlType::Decimal,
        CqlType::Double,
        CqlType::Duration,
        CqlType::Float,
        CqlType::Inet,
        CqlType::Int,
        CqlType::SmallInt,
        CqlType::Text,
        CqlType::Time,
        CqlType::Timestamp,
        CqlType::TimeUuid,
        CqlType::TinyInt,
        CqlType::Uuid,
        CqlType::VarChar,
        CqlType::VarInt,
    ];

    /// Upper-case CQL keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            CqlType::Ascii => "ASCII",
            CqlType::BigInt => "BIGINT",
            CqlType::Blob => "BLOB",
            CqlType::Boolean => "BOOLEAN",
            CqlType::Counter => "COUNTER",
            CqlType::Date => "DATE",
            CqlType::Decimal => "DECIMAL",
            CqlType::Double => "DOUBLE",
            CqlType::Duration => "DURATION",
            CqlType::Float => "FLOAT",
            CqlType::Inet => "INET",
            CqlType::Int => "INT",
            CqlType::SmallInt => "SMALLINT",
            CqlType::Text => "TEXT",
            CqlType::Time => "TIME",
            CqlType::Timestamp => "TIMESTAMP",
            CqlType::TimeUuid => "TIMEUUID",
            CqlType::TinyInt => "TINYINT",
            CqlType::Uuid => "UUID",
            CqlType::VarChar => "VARCHAR",
            CqlType::VarInt => "VARINT",
        }
    }

    /// Estimated size in bytes.
    pub fn size(&self, config: &SchemaConfig) -> u64 {
        match self {
            CqlType::Ascii | CqlType::Text | CqlType::VarChar => {
                config.string_length_range.max as u64
            }
            CqlType::Blob => config.blob_length_range.max as u64,
            CqlType::Boolean | CqlType::TinyInt => 1,
            CqlType::SmallInt => 2,
            CqlType::Duration | CqlType::Float | CqlType::Int => 4,
            CqlType::BigInt
            | CqlType::Counter
            | CqlType::Date
            | CqlType::Decimal
            | CqlType::Double
            | CqlType::Time
            | CqlType::Timestamp
            | CqlType::VarInt => 8,
            CqlType::Inet | CqlType::TimeUuid | CqlType::Uuid => 16,
        }
    }
}

impl fmt::Display for CqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CqlType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        CqlType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| format!("Unknown CQL type: {s}"))
    }
}

/// Wrapper keywords that compose other types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Wrapper {
    List,
    Set,
    Map,
    Tuple,
    Frozen,
}

impl Wrapper {
    pub const ALL: [Wrapper; 5] = [
        Wrapper::List,
        Wrapper::Set,
        Wrapper::Map,
        Wrapper::Tuple,
        Wrapper::Frozen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Wrapper::List => "LIST",
            Wrapper::Set => "SET",
            Wrapper::Map => "MAP",
            Wrapper::Tuple => "TUPLE",
            Wrapper::Frozen => "FROZEN",
        }
    }

    /// Parse a wrapper keyword (case-insensitive).
    pub fn parse(keyword: &str) -> Option<Self> {
        let upper = keyword.trim().to_uppercase();
        Wrapper::ALL.iter().copied().find(|w| w.as_str() == upper)
    }
}

/// Byte sizes by type name: primitives plus `KEYSPACE.TYPE` entries for
/// user-defined types registered during one run.
///
/// Entries are only ever added, so a size resolved once stays valid for
/// the rest of the run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSizeTable {
    sizes: HashMap<String, u64>,
}

impl TypeSizeTable {
    /// Table holding only the primitive sizes for this config.
    pub fn new(config: &SchemaConfig) -> Self {
        let sizes = CqlType::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), t.size(config)))
            .collect();
        Self { sizes }
    }

    /// Record the size of a user-defined type under `KEYSPACE.NAME`.
    pub fn register_udt(&mut self, keyspace: &str, name: &str, size: u64) {
        let key = format!("{keyspace}.{name}").to_uppercase();
        self.sizes.insert(key, size);
    }

    /// Exact lookup by type name.
    pub fn get(&self, type_name: &str) -> Option<u64> {
        self.sizes.get(&type_name.to_uppercase()).copied()
    }

    /// Look up a type, retrying an unqualified name inside `default_keyspace`.
    pub fn resolve(&self, type_name: &str, default_keyspace: &str) -> Option<u64> {
        self.get(type_name).or_else(|| {
            if type_name.contains('.') {
                None
            } else {
                self.get(&format!("{default_keyspace}.{type_name}"))
            }
        })
    }

    /// Whether `keyspace` has a user-defined type called `name`.
    pub fn has_udt(&self, keyspace: &str, name: &str) -> bool {
        !name.contains('.') && self.get(&format!("{keyspace}.{name}")).is_some()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Names of the registered user-defined types.
    pub fn udt_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .sizes
            .keys()
            .filter(|k| k.contains('.'))
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }
}
