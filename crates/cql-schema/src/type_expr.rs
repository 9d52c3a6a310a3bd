//! Helpers for textual type expressions such as `FROZEN<MAP<TEXT,LIST<INT>>>`.
//!
//! Expressions are handled as strings so that user-defined type references
//! can stay unresolved until something needs them.

use crate::types::Wrapper;

/// Split on commas that are not nested inside `<...>`.
///
/// Each part is trimmed; an empty input yields no parts.
pub fn split_top_level(expr: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in expr.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(expr[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    let last = expr[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    parts
}

/// Split `WRAP<inner>` into `("WRAP", "inner")`.
///
/// Returns `None` for leaf types and for expressions whose brackets do not
/// close at the very end.
pub fn unwrap_outer(expr: &str) -> Option<(&str, &str)> {
    let expr = expr.trim();
    let open = expr.find('<')?;
    if open == 0 || !expr.ends_with('>') {
        return None;
    }
    Some((expr[..open].trim(), &expr[open + 1..expr.len() - 1]))
}

/// Leaf type names and wrapper keywords found in an expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeShape {
    pub leaves: Vec<String>,
    pub wrappers: Vec<Wrapper>,
}

/// Walk an expression collecting its leaves (in order) and wrappers.
pub fn shape_of(expr: &str) -> TypeShape {
    let mut shape = TypeShape::default();
    collect_shape(expr, &mut shape);
    shape
}

fn collect_shape(expr: &str, shape: &mut TypeShape) {
    match unwrap_outer(expr) {
        Some((keyword, inner)) => {
            if let Some(wrapper) = Wrapper::parse(keyword) {
                if !shape.wrappers.contains(&wrapper) {
                    shape.wrappers.push(wrapper);
                }
            }
            for part in split_top_level(inner) {
                collect_shape(part, shape);
            }
        }
        None => {
            let leaf = expr.trim();
            if !leaf.is_empty() {
                shape.leaves.push(leaf.to_string());
            }
        }
    }
}

/// Drop whitespace inside `<...>` so a type never spans several tokens.
pub fn strip_whitespace_in_brackets(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut depth = 0usize;
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth > 0 => continue,
            _ => {}
        }
        out.push(c);
    }
    out
}
