//! Capacity report over processed schema dumps.
//!
//! The CSV form has one row per object:
//!
//! ```text
//! objtype,keyspace,name,size,WRUPerRec,rowsPerWRU,rowsPerRRU,rowsSizeWarning,columns
//! TABLE,KS1,T1,216,1,4,18,false,2
//! KEYSPACE,KS1,,,,,,,
//! ```
//!
//! Objects without a size or a column list leave those fields empty.

use cql_schema::SchemaObject;
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

/// Errors that can occur while writing a report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One CSV report row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "objtype")]
    pub object_type: &'static str,
    pub keyspace: String,
    pub name: Option<String>,
    pub size: Option<u64>,
    #[serde(rename = "WRUPerRec")]
    pub write_units_per_record: Option<u64>,
    #[serde(rename = "rowsPerWRU")]
    pub records_per_write_unit: Option<u64>,
    #[serde(rename = "rowsPerRRU")]
    pub records_per_read_unit: Option<u64>,
    #[serde(rename = "rowsSizeWarning")]
    pub oversize_warning: Option<bool>,
    pub columns: Option<usize>,
}

impl From<&SchemaObject> for ReportRow {
    fn from(object: &SchemaObject) -> Self {
        let metrics = object.metrics;
        Self {
            object_type: object.object_type.as_str(),
            keyspace: object.keyspace.clone(),
            name: object.name.clone(),
            size: (object.size > 0).then_some(object.size),
            write_units_per_record: metrics.map(|m| m.write_units_per_record),
            records_per_write_unit: metrics.map(|m| m.records_per_write_unit),
            records_per_read_unit: metrics.map(|m| m.records_per_read_unit),
            oversize_warning: metrics.map(|m| m.oversize_warning),
            columns: object
                .object_type
                .has_columns()
                .then_some(object.columns.len()),
        }
    }
}

/// Write the CSV report, header included. Returns the number of rows.
pub fn write_csv<'a, W: Write>(
    objects: impl IntoIterator<Item = &'a SchemaObject>,
    writer: W,
) -> Result<usize, ReportError> {
    let mut writer = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for object in objects {
        writer.serialize(ReportRow::from(object))?;
        rows += 1;
    }
    if rows == 0 {
        writer.write_record(REPORT_HEADER)?;
    }
    writer.flush()?;
    Ok(rows)
}

/// Write the objects as a pretty-printed JSON array. Returns the number of objects.
pub fn write_json<'a, W: Write>(
    objects: impl IntoIterator<Item = &'a SchemaObject>,
    mut writer: W,
) -> Result<usize, ReportError> {
    let objects: Vec<&SchemaObject> = objects.into_iter().collect();
    serde_json::to_writer_pretty(&mut writer, &objects)?;
    writeln!(writer)?;
    Ok(objects.len())
}

/// Header written when there are no rows to derive it from.
pub const REPORT_HEADER: [&str; 9] = [
    "objtype",
    "keyspace",
    "name",
    "size",
    "WRUPerRec",
    "rowsPerWRU",
    "rowsPerRRU",
    "rowsSizeWarning",
    "columns",
];
