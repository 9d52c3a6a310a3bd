//! CQL statement rendering for recreated objects and generated records.
//!
//! Every object is recreated in the target keyspace under the name
//! `KEYSPACE_NAME`, so several source keyspaces can share one target.

use crate::generator::GeneratedRecord;
use cql_schema::{ObjectType, SchemaObject};

/// `CREATE TABLE|TYPE IF NOT EXISTS target.KS_NAME (...)`.
///
/// Only tables and types are recreated; other objects return `None`.
pub fn create_statement(object: &SchemaObject, target_keyspace: &str) -> Option<String> {
    if !object.object_type.has_columns() || object.col_definition.is_empty() {
        return None;
    }
    Some(format!(
        "CREATE {} IF NOT EXISTS {} {}",
        object.object_type,
        object.target_name(target_keyspace),
        object.col_definition
    ))
}

/// `INSERT INTO target.KS_NAME (c1,c2) VALUES (v1,v2)`.
pub fn insert_statement(
    record: &GeneratedRecord,
    table: &SchemaObject,
    target_keyspace: &str,
) -> String {
    let (columns, values): (Vec<&str>, Vec<&str>) = record
        .values
        .iter()
        .map(|(column, value)| (column.as_str(), value.as_str()))
        .unzip();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table.target_name(target_keyspace),
        columns.join(","),
        values.join(",")
    )
}

/// Counter tables only accept increments:
/// `UPDATE target.KS_NAME SET c = c + v WHERE pk1 = v1 AND pk2 = v2`.
pub fn counter_update_statement(
    record: &GeneratedRecord,
    table: &SchemaObject,
    target_keyspace: &str,
) -> String {
    let mut increments = Vec::new();
    let mut conditions = Vec::new();
    for (name, value) in &record.values {
        let is_key = table
            .get_column(name)
            .map(|c| c.is_primary_key)
            .unwrap_or(false);
        if is_key {
            conditions.push(format!("{name} = {value}"));
        } else {
            increments.push(format!("{name} = {name} + {value}"));
        }
    }
    format!(
        "UPDATE {} SET {} WHERE {}",
        table.target_name(target_keyspace),
        increments.join(", "),
        conditions.join(" AND ")
    )
}

/// Objects of `object_type` that can be recreated, in dump order.
pub fn create_statements<'a>(
    objects: &'a [SchemaObject],
    object_type: ObjectType,
    target_keyspace: &'a str,
) -> impl Iterator<Item = String> + 'a {
    objects
        .iter()
        .filter(move |o| o.object_type == object_type)
        .filter_map(move |o| create_statement(o, target_keyspace))
}
