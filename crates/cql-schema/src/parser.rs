//! DDL object parser.
//!
//! Handles the statement shapes produced by `DESCRIBE SCHEMA`, not CQL in
//! general. Two entry points:
//!
//! - [`parse_object`] reads only the statement header (kind, keyspace, name)
//!   and is used for keyspaces, indexes and materialized views.
//! - [`parse_table_or_type`] additionally walks the column list, sizes each
//!   column against a [`TypeSizeTable`] and derives the capacity metrics.

use crate::config::SchemaConfig;
use crate::error::SchemaError;
use crate::schema::{ClusteringOrder, Column, ObjectType, SchemaObject};
use crate::type_expr::{shape_of, strip_whitespace_in_brackets};
use crate::types::{TypeSizeTable, Wrapper};
use tracing::debug;

/// Markers that end the header clause of a statement.
const HEADER_TERMINATORS: [&str; 4] = [" WITH", " AS ", "(", " ON "];

// ============================================================================
// Header Parsing
// ============================================================================

/// Parse the header of any `CREATE` statement into a column-less object.
pub fn parse_object(statement: &str) -> Result<SchemaObject, SchemaError> {
    let normalized = collapse_whitespace(statement).to_uppercase();
    let header = normalized[..header_end(&normalized)].trim();
    let header = header.strip_prefix("CREATE").unwrap_or(header).trim();

    let object_type =
        classify(header).ok_or_else(|| SchemaError::UnparseableStatement(excerpt(statement)))?;
    let rest = strip_if_not_exists(header[object_type.as_str().len()..].trim());

    match object_type {
        ObjectType::Keyspace => {
            let keyspace = rest.split_whitespace().next().map(unquote).unwrap_or_default();
            if keyspace.is_empty() {
                return Err(SchemaError::malformed(object_type.as_str(), "missing keyspace name"));
            }
            Ok(SchemaObject::new(object_type, keyspace, None))
        }
        ObjectType::Index | ObjectType::CustomIndex => {
            let name = rest.split_whitespace().next().map(unquote);
            let target = index_target(&normalized).ok_or_else(|| {
                SchemaError::malformed(object_type.as_str(), "missing ON keyspace.table target")
            })?;
            let (keyspace, _table) = split_qualified(target).ok_or_else(|| {
                SchemaError::malformed(object_type.as_str(), "index target is not keyspace.table")
            })?;
            Ok(SchemaObject::new(object_type, keyspace, name))
        }
        _ => {
            let qualified = rest.split_whitespace().next().unwrap_or_default();
            let (keyspace, name) = split_qualified(qualified).ok_or_else(|| {
                SchemaError::malformed(
                    object_type.as_str(),
                    format!("expected keyspace.name, found '{qualified}'"),
                )
            })?;
            Ok(SchemaObject::new(object_type, keyspace, Some(name)))
        }
    }
}

/// Offset of the first header terminator. Word markers must end on a word
/// boundary, so `WITHDRAWALS_IDX` does not end the header at ` WITH`.
fn header_end(normalized: &str) -> usize {
    HEADER_TERMINATORS
        .iter()
        .filter_map(|marker| {
            normalized
                .match_indices(marker)
                .map(|(i, _)| i)
                .find(|&i| {
                    !marker.ends_with(is_identifier_char)
                        || !normalized[i + marker.len()..].starts_with(is_identifier_char)
                })
        })
        .min()
        .unwrap_or(normalized.len())
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn classify(header: &str) -> Option<ObjectType> {
    ObjectType::MATCH_ORDER.into_iter().find(|t| {
        header
            .strip_prefix(t.as_str())
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
    })
}

/// Table reference of `... ON ks.table (...)`.
fn index_target(normalized: &str) -> Option<&str> {
    let after_on = &normalized[normalized.find(" ON ")? + 4..];
    let end = after_on
        .find(|c: char| c == '(' || c.is_whitespace())
        .unwrap_or(after_on.len());
    let target = after_on[..end].trim();
    (!target.is_empty()).then_some(target)
}

fn strip_if_not_exists(rest: &str) -> &str {
    rest.strip_prefix("IF NOT EXISTS").map(str::trim).unwrap_or(rest)
}

fn split_qualified(qualified: &str) -> Option<(String, String)> {
    let (keyspace, name) = qualified.split_once('.')?;
    let (keyspace, name) = (unquote(keyspace), unquote(name));
    if keyspace.is_empty() || name.is_empty() {
        return None;
    }
    Some((keyspace, name))
}

fn unquote(identifier: &str) -> String {
    identifier.trim().trim_matches('"').to_uppercase()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First line of a statement, for error messages.
pub(crate) fn excerpt(statement: &str) -> String {
    const MAX: usize = 80;
    let line = statement.trim().lines().next().unwrap_or_default().trim();
    match line.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &line[..cut]),
        None => line.to_string(),
    }
}

// ============================================================================
// Column-Definition Fragment
// ============================================================================

/// The part of a statement that can be re-issued after `CREATE <kind> <name>`.
///
/// Tables run from the first `(` to the first ` AND ` outside quotes; the
/// `WITH ...` tail is kept only when it carries a clustering order. Types
/// run to the end of the statement.
pub fn column_definition_fragment(statement: &str, object_type: ObjectType) -> String {
    let upper = statement.trim().to_uppercase();
    let Some(start) = upper.find('(') else {
        return String::new();
    };
    let body = &upper[start..];
    if object_type == ObjectType::Type {
        return body.trim().to_string();
    }

    let mut fragment = match find_keyword_outside_quotes(body, "AND") {
        Some(end) => &body[..end],
        None => body,
    };
    if fragment.contains("WITH") && !fragment.contains("CLUSTERING") {
        if let Some(end) = find_keyword_outside_quotes(fragment, "WITH") {
            fragment = &fragment[..end];
        }
    }
    fragment.trim().to_string()
}

/// Byte offset of `keyword` delimited by whitespace on both sides.
fn find_keyword_outside_quotes(text: &str, keyword: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut in_quote = false;
    for (i, c) in text.char_indices() {
        if c == '\'' {
            in_quote = !in_quote;
            continue;
        }
        if in_quote || !c.is_whitespace() {
            continue;
        }
        let after = i + c.len_utf8();
        if text[after..].starts_with(keyword)
            && bytes
                .get(after + keyword.len())
                .is_some_and(|b| b.is_ascii_whitespace())
        {
            return Some(i);
        }
    }
    None
}

/// Prefix bare UDT names registered in `keyspace` with `KEYSPACE.`.
///
/// Only type positions of the first parenthesized group are touched: the word
/// after a column name and anything inside `<...>`. Column names, quoted text
/// and the `WITH` tail are left alone.
pub fn qualify_udt_references(fragment: &str, keyspace: &str, type_sizes: &TypeSizeTable) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut word = String::new();
    let mut depth = 0usize;
    let mut angle = 0usize;
    let mut word_in_column = 0usize;
    let mut in_quote = false;
    let mut done = false;

    let flush = |word: &mut String, out: &mut String, type_position: bool| {
        if word.is_empty() {
            return;
        }
        if type_position && !word.contains('.') && type_sizes.has_udt(keyspace, word) {
            out.push_str(keyspace);
            out.push('.');
        }
        out.push_str(word);
        word.clear();
    };

    for c in fragment.chars() {
        if done || in_quote {
            out.push(c);
            in_quote = in_quote && c != '\'';
            continue;
        }
        if is_identifier_char(c) || c == '.' || c == '"' {
            word.push(c);
            continue;
        }
        let type_position = depth == 1 && (angle > 0 || word_in_column == 1);
        let was_word = !word.is_empty();
        flush(&mut word, &mut out, type_position);
        if was_word && depth == 1 && angle == 0 {
            word_in_column += 1;
        }
        match c {
            '\'' => in_quote = true,
            '(' => {
                depth += 1;
                word_in_column = 0;
            }
            ')' => {
                depth = depth.saturating_sub(1);
                done = depth == 0;
            }
            '<' => angle += 1,
            '>' => angle = angle.saturating_sub(1),
            ',' if depth == 1 && angle == 0 => word_in_column = 0,
            _ => {}
        }
        out.push(c);
    }
    let type_position = depth == 1 && (angle > 0 || word_in_column == 1);
    flush(&mut word, &mut out, type_position);
    out
}

/// Move references to `keyspace` under `target`: `KS.X` becomes `target.KS_X`.
pub fn rewrite_namespace(fragment: &str, keyspace: &str, target: &str) -> String {
    fragment.replace(&format!("{keyspace}."), &format!("{target}.{keyspace}_"))
}

// ============================================================================
// Table / Type Parsing
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Open,
    Close,
    Comma,
}

/// Split into words and `(` `)` `,`; brackets and quoted strings stay inside words.
fn tokenize(text: &str) -> Vec<Token> {
    fn flush(word: &mut String, tokens: &mut Vec<Token>) {
        if !word.is_empty() {
            tokens.push(Token::Word(std::mem::take(word)));
        }
    }

    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut angle = 0usize;
    let mut in_quote = false;

    for c in text.chars() {
        if in_quote {
            word.push(c);
            in_quote = c != '\'';
            continue;
        }
        match c {
            '\'' => {
                in_quote = true;
                word.push(c);
            }
            '<' => {
                angle += 1;
                word.push(c);
            }
            '>' => {
                angle = angle.saturating_sub(1);
                word.push(c);
            }
            ',' if angle > 0 => word.push(c),
            '(' | ')' | ',' => {
                flush(&mut word, &mut tokens);
                tokens.push(match c {
                    '(' => Token::Open,
                    ')' => Token::Close,
                    _ => Token::Comma,
                });
            }
            c if c.is_whitespace() => flush(&mut word, &mut tokens),
            _ => word.push(c),
        }
    }
    flush(&mut word, &mut tokens);
    tokens
}

/// Part of the statement the walker is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Column,
    PrimaryKey,
    ClusteringKey,
}

/// Position inside one column definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Name,
    Type,
    Modifiers,
}

/// Parse a `CREATE TABLE` or `CREATE TYPE` statement with its columns.
///
/// Column sizes resolve against `type_sizes`; unknown types count as zero.
pub fn parse_table_or_type(
    statement: &str,
    type_sizes: &TypeSizeTable,
    config: &SchemaConfig,
) -> Result<SchemaObject, SchemaError> {
    let normalized = strip_whitespace_in_brackets(&collapse_whitespace(statement).to_uppercase());
    let tokens = tokenize(&normalized);
    let words: Vec<&str> = tokens
        .iter()
        .take(6)
        .map(|t| match t {
            Token::Word(w) => w.as_str(),
            _ => "",
        })
        .collect();

    let object_type = match words.get(1).copied() {
        Some("TABLE") => ObjectType::Table,
        Some("TYPE") => ObjectType::Type,
        _ => return Err(SchemaError::UnparseableStatement(excerpt(statement))),
    };
    let name_index = if words.get(2..5) == Some(&["IF", "NOT", "EXISTS"][..]) {
        5
    } else {
        2
    };
    let qualified = words.get(name_index).copied().unwrap_or_default();
    let (keyspace, name) = split_qualified(qualified).ok_or_else(|| {
        SchemaError::malformed(
            object_type.as_str(),
            format!("expected keyspace.name, found '{qualified}'"),
        )
    })?;

    let mut object = SchemaObject::new(object_type, keyspace.clone(), Some(name));
    let fragment = column_definition_fragment(statement, object_type);
    object.col_definition = rewrite_namespace(
        &qualify_udt_references(&fragment, &keyspace, type_sizes),
        &keyspace,
        &config.target_keyspace,
    );
    object.columns = walk_columns(&tokens[name_index + 1..], &object.qualified_name());

    for column in &mut object.columns {
        size_column(column, type_sizes, &keyspace, config);
    }
    object.finalize_size(config);
    Ok(object)
}

/// Single pass over the tokens after the object name.
fn walk_columns(tokens: &[Token], object_name: &str) -> Vec<Column> {
    let mut columns: Vec<Column> = Vec::new();
    let mut block = Block::Column;
    let mut expect = Expect::Name;
    let mut depth = 0usize;
    let mut key_depth = 0usize;
    let mut key_element = 0usize;
    let mut last_clustering: Option<String> = None;

    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Word(w) if w == "PRIMARY" && depth == 1 && block == Block::Column => {
                if matches!(tokens.get(i + 1), Some(Token::Word(k)) if k == "KEY") {
                    i += 1;
                }
                match expect {
                    Expect::Modifiers => {
                        if let Some(column) = columns.last_mut() {
                            column.is_primary_key = true;
                            column.is_partition_key = true;
                        }
                    }
                    Expect::Name => {
                        block = Block::PrimaryKey;
                        key_depth = depth + 1;
                        key_element = 0;
                    }
                    Expect::Type => {
                        debug!("{object_name}: PRIMARY KEY where a column type was expected");
                    }
                }
            }
            Token::Word(w) if w == "CLUSTERING" && depth == 0 => {
                block = Block::ClusteringKey;
            }
            Token::Open => depth += 1,
            Token::Close => {
                depth = depth.saturating_sub(1);
                if block == Block::PrimaryKey && depth < key_depth {
                    block = Block::Column;
                    expect = Expect::Name;
                }
            }
            Token::Comma => match block {
                Block::Column if depth == 1 => {
                    if expect == Expect::Type {
                        debug!("{object_name}: column definition without a type, skipping");
                    }
                    expect = Expect::Name;
                }
                Block::PrimaryKey if depth == key_depth => key_element += 1,
                _ => {}
            },
            Token::Word(w) => match block {
                Block::Column if depth == 1 => match expect {
                    Expect::Name => {
                        columns.push(Column::new(unquote(w)));
                        expect = Expect::Type;
                    }
                    Expect::Type => {
                        if let Some(column) = columns.last_mut() {
                            column.definition = w.clone();
                        }
                        expect = Expect::Modifiers;
                    }
                    Expect::Modifiers => {
                        if w == "STATIC" {
                            if let Some(column) = columns.last_mut() {
                                column.is_static = true;
                            }
                        } else {
                            debug!("{object_name}: ignoring unexpected token '{w}'");
                        }
                    }
                },
                Block::PrimaryKey if depth >= key_depth => {
                    let key = unquote(w);
                    match columns.iter_mut().find(|c| c.name == key) {
                        Some(column) => {
                            column.is_primary_key = true;
                            if key_element == 0 {
                                column.is_partition_key = true;
                            } else {
                                column.is_clustering_key = true;
                            }
                        }
                        None => debug!("{object_name}: primary key column '{key}' not declared"),
                    }
                }
                Block::ClusteringKey if depth >= 1 => match w.as_str() {
                    "ASC" | "DESC" => {
                        let order = if w == "ASC" {
                            ClusteringOrder::Asc
                        } else {
                            ClusteringOrder::Desc
                        };
                        if let Some(name) = &last_clustering {
                            if let Some(column) = columns.iter_mut().find(|c| &c.name == name) {
                                column.clustering_order = Some(order);
                            }
                        }
                    }
                    _ => last_clustering = Some(unquote(w)),
                },
                _ => {}
            },
        }
        i += 1;
    }

    columns.retain(|c| {
        if !c.has_type() {
            debug!("{object_name}: dropping untyped column '{}'", c.name);
        }
        c.has_type()
    });
    columns
}

/// Flag wrappers and counters, and estimate the column size.
fn size_column(column: &mut Column, type_sizes: &TypeSizeTable, keyspace: &str, config: &SchemaConfig) {
    let shape = shape_of(&column.definition);
    for wrapper in &shape.wrappers {
        column.set_wrapper_flag(*wrapper);
    }
    column.is_counter = shape.leaves.iter().any(|t| t == "COUNTER");

    let mut size: u64 = shape
        .leaves
        .iter()
        .map(|leaf| {
            type_sizes.resolve(leaf, keyspace).unwrap_or_else(|| {
                debug!("Type '{leaf}' of column '{}' not resolved yet, sized as 0", column.name);
                0
            })
        })
        .sum();

    let cardinality = config.collection_length_range.max as u64;
    if shape.wrappers.contains(&Wrapper::Set) {
        size *= cardinality;
    }
    if shape.wrappers.contains(&Wrapper::List) {
        size *= cardinality;
    }
    column.component_types = shape.leaves;
    column.size = size;
}
