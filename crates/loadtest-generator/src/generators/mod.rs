//! CQL literal generation for column type expressions.
//!
//! [`generate_value`] peels one wrapper per call (`MAP`, `SET`, `LIST`,
//! `TUPLE`, `FROZEN`) until it reaches a primitive or a user-defined type.
//! Primitive literals come from the submodules.

pub mod numeric;
pub mod text;
pub mod timestamp;
pub mod uuid;

use crate::generator::GeneratorError;
use chrono::Utc;
use cql_schema::type_expr::{split_top_level, unwrap_outer};
use cql_schema::{CqlType, SchemaConfig, UdtCatalog, Wrapper};
use rand::Rng;

/// Deepest wrapper nesting accepted before giving up.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Everything a value needs besides the RNG.
#[derive(Debug, Clone, Copy)]
pub struct ValueContext<'a> {
    pub config: &'a SchemaConfig,
    pub catalog: &'a UdtCatalog<'a>,
    /// Keyspace used for bare UDT names.
    pub keyspace: &'a str,
}

impl<'a> ValueContext<'a> {
    pub fn new(config: &'a SchemaConfig, catalog: &'a UdtCatalog<'a>, keyspace: &'a str) -> Self {
        Self {
            config,
            catalog,
            keyspace,
        }
    }
}

/// Generate a CQL literal for `type_expr`.
///
/// `column` is a naming hint for primitives (code columns get short text).
pub fn generate_value<R: Rng>(
    rng: &mut R,
    ctx: ValueContext<'_>,
    column: &str,
    type_expr: &str,
) -> Result<String, GeneratorError> {
    generate_nested(rng, ctx, column, type_expr, 0)
}

fn generate_nested<R: Rng>(
    rng: &mut R,
    ctx: ValueContext<'_>,
    column: &str,
    type_expr: &str,
    depth: usize,
) -> Result<String, GeneratorError> {
    if depth > MAX_NESTING_DEPTH {
        return Err(GeneratorError::RecursionLimit(MAX_NESTING_DEPTH));
    }
    let expr = type_expr.trim();
    if expr.is_empty() {
        return Err(GeneratorError::MalformedType(type_expr.to_string()));
    }

    if expr.contains('<') {
        let (keyword, inner) =
            unwrap_outer(expr).ok_or_else(|| GeneratorError::MalformedType(expr.to_string()))?;
        return generate_wrapped(rng, ctx, column, Wrapper::parse(keyword), inner, depth);
    }

    if let Ok(cql_type) = expr.parse::<CqlType>() {
        return Ok(generate_primitive(rng, ctx.config, column, cql_type));
    }

    generate_udt(rng, ctx, expr, depth)
}

fn generate_wrapped<R: Rng>(
    rng: &mut R,
    ctx: ValueContext<'_>,
    column: &str,
    wrapper: Option<Wrapper>,
    inner: &str,
    depth: usize,
) -> Result<String, GeneratorError> {
    let depth = depth + 1;
    match wrapper {
        Some(Wrapper::Map) => {
            let parts = split_top_level(inner);
            let [key_type, value_type] = parts.as_slice() else {
                return Err(GeneratorError::MalformedType(format!("MAP<{inner}>")));
            };
            let count = draw_cardinality(rng, ctx.config);
            let mut entries = Vec::with_capacity(count);
            for _ in 0..count {
                let key = generate_nested(rng, ctx, column, key_type, depth)?;
                let value = generate_nested(rng, ctx, column, value_type, depth)?;
                entries.push(format!("{key} : {value}"));
            }
            Ok(enclose('{', &entries.join(" , "), '}'))
        }
        Some(Wrapper::Set) => {
            let count = draw_cardinality(rng, ctx.config);
            let mut elements: Vec<String> = Vec::with_capacity(count);
            for _ in 0..count {
                let element = generate_nested(rng, ctx, column, inner, depth)?;
                if !elements.contains(&element) {
                    elements.push(element);
                }
            }
            Ok(enclose('{', &elements.join(","), '}'))
        }
        Some(Wrapper::List) => {
            let count = draw_cardinality(rng, ctx.config);
            let mut elements = Vec::with_capacity(count);
            for _ in 0..count {
                elements.push(generate_nested(rng, ctx, column, inner, depth)?);
            }
            Ok(enclose('[', &elements.join(","), ']'))
        }
        Some(Wrapper::Tuple) => {
            let components = split_top_level(inner);
            let mut elements = Vec::with_capacity(components.len());
            for component in components {
                elements.push(generate_nested(rng, ctx, column, component, depth)?);
            }
            Ok(enclose('(', &elements.join(","), ')'))
        }
        Some(Wrapper::Frozen) | None => generate_nested(rng, ctx, column, inner, depth),
    }
}

fn generate_udt<R: Rng>(
    rng: &mut R,
    ctx: ValueContext<'_>,
    type_name: &str,
    depth: usize,
) -> Result<String, GeneratorError> {
    let udt = ctx
        .catalog
        .get(type_name, ctx.keyspace)
        .ok_or_else(|| GeneratorError::UnresolvedType(type_name.to_string()))?;

    // bare names inside the type resolve against the type's own keyspace
    let member_ctx = ValueContext {
        keyspace: &udt.keyspace,
        ..ctx
    };
    let mut members = Vec::with_capacity(udt.columns.len());
    for member in udt.columns.iter().filter(|c| c.has_type()) {
        let value = generate_nested(rng, member_ctx, &member.name, &member.definition, depth + 1)?;
        members.push(format!("{} : {value}", member.name));
    }
    Ok(enclose('{', &members.join(" , "), '}'))
}

/// Literal for a single primitive.
pub fn generate_primitive<R: Rng>(
    rng: &mut R,
    config: &SchemaConfig,
    column: &str,
    cql_type: CqlType,
) -> String {
    match cql_type {
        CqlType::Ascii | CqlType::Text | CqlType::VarChar => {
            text::generate_text(rng, config, column)
        }
        CqlType::Blob => text::generate_blob(rng, config, column),
        CqlType::BigInt | CqlType::Counter => numeric::generate_int_below(rng, numeric::BIGINT_MAX),
        CqlType::Int | CqlType::VarInt => numeric::generate_int_below(rng, numeric::INT_MAX),
        CqlType::SmallInt | CqlType::TinyInt => {
            numeric::generate_int_below(rng, numeric::SMALL_INT_MAX)
        }
        CqlType::Decimal | CqlType::Double | CqlType::Float => {
            numeric::generate_fixed_point(rng, 4)
        }
        CqlType::Boolean => rng.gen_bool(0.5).to_string(),
        CqlType::Date => timestamp::date_literal(Utc::now()),
        CqlType::Time => timestamp::time_literal(Utc::now()),
        CqlType::Timestamp => timestamp::timestamp_literal(Utc::now()),
        CqlType::Duration => timestamp::generate_duration(rng),
        CqlType::Inet => numeric::generate_ipv4(rng),
        CqlType::Uuid => uuid::generate_uuid_v4(rng).to_string(),
        CqlType::TimeUuid => uuid::generate_time_uuid(rng).to_string(),
    }
}

fn draw_cardinality<R: Rng>(rng: &mut R, config: &SchemaConfig) -> usize {
    let range = config.collection_length_range;
    rng.gen_range(range.bounds())
}

fn enclose(open: char, body: &str, close: char) -> String {
    if body.is_empty() {
        format!("{open}{close}")
    } else {
        format!("{open} {body} {close}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cql_schema::{LengthRange, SchemaProcessor};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generate(expr: &str) -> String {
        let config = SchemaConfig::default();
        let catalog = UdtCatalog::default();
        let ctx = ValueContext::new(&config, &catalog, "KS1");
        let mut rng = StdRng::seed_from_u64(42);
        generate_value(&mut rng, ctx, "COL", expr).unwrap()
    }

    #[test]
    fn test_primitive_lexical_forms() {
        assert!(generate("TEXT").starts_with('\''));
        assert!(generate("BLOB").starts_with("textAsBlob('"));
        assert!(matches!(generate("BOOLEAN").as_str(), "true" | "false"));
        assert!(generate("INT").parse::<i64>().unwrap() < 1000);
        assert!(generate("TINYINT").parse::<i64>().unwrap() < 8);
        assert!(generate("BIGINT").parse::<i64>().unwrap() < 1_000_000_000_000_000);
        assert!(generate("DOUBLE").parse::<f64>().is_ok());
        for expr in ["UUID", "TIMEUUID"] {
            let value = generate(expr);
            let groups: Vec<usize> = value.split('-').map(str::len).collect();
            assert_eq!(groups, vec![8, 4, 4, 4, 12], "{expr}: {value}");
            assert!(value.chars().all(|c| c == '-' || c.is_ascii_hexdigit()));
            assert!(::uuid::Uuid::parse_str(&value).is_ok());
        }
        assert_eq!(generate("DATE").len(), "'2024-01-01'".len());
        assert!(generate("TIMESTAMP").ends_with("Z'"));
        assert!(generate("DURATION").ends_with('s'));
    }

    #[test]
    fn test_lowercase_expression() {
        assert!(generate("list<int>").starts_with('['));
    }

    #[test]
    fn test_list_has_exact_cardinality() {
        let config = SchemaConfig {
            collection_length_range: LengthRange::new(3, 3),
            ..SchemaConfig::default()
        };
        let catalog = UdtCatalog::default();
        let ctx = ValueContext::new(&config, &catalog, "KS1");
        let mut rng = StdRng::seed_from_u64(1);

        let value = generate_value(&mut rng, ctx, "COL", "LIST<BOOLEAN>").unwrap();
        let body = value.strip_prefix("[ ").unwrap().strip_suffix(" ]").unwrap();
        assert_eq!(body.split(',').count(), 3);
    }

    #[test]
    fn test_set_elements_are_unique() {
        let config = SchemaConfig {
            collection_length_range: LengthRange::new(5, 5),
            ..SchemaConfig::default()
        };
        let catalog = UdtCatalog::default();
        let ctx = ValueContext::new(&config, &catalog, "KS1");
        let mut rng = StdRng::seed_from_u64(3);

        // five booleans collapse to at most two distinct elements
        let value = generate_value(&mut rng, ctx, "COL", "SET<BOOLEAN>").unwrap();
        let body = value.strip_prefix("{ ").unwrap().strip_suffix(" }").unwrap();
        let elements: Vec<&str> = body.split(',').collect();
        assert!(!elements.is_empty() && elements.len() <= 2);
        assert!(elements.len() == 1 || elements[0] != elements[1]);
    }

    #[test]
    fn test_map_keeps_duplicate_keys() {
        let config = SchemaConfig {
            collection_length_range: LengthRange::new(4, 4),
            ..SchemaConfig::default()
        };
        let catalog = UdtCatalog::default();
        let ctx = ValueContext::new(&config, &catalog, "KS1");
        let mut rng = StdRng::seed_from_u64(5);

        let value = generate_value(&mut rng, ctx, "COL", "MAP<BOOLEAN,INT>").unwrap();
        assert!(value.starts_with("{ ") && value.ends_with(" }"));
        assert_eq!(value.matches(" : ").count(), 4);
    }

    #[test]
    fn test_map_requires_two_parts() {
        let config = SchemaConfig::default();
        let catalog = UdtCatalog::default();
        let ctx = ValueContext::new(&config, &catalog, "KS1");
        let mut rng = StdRng::seed_from_u64(5);

        let result = generate_value(&mut rng, ctx, "COL", "MAP<INT>");
        assert!(matches!(result, Err(GeneratorError::MalformedType(_))));
    }

    #[test]
    fn test_tuple_has_one_value_per_component() {
        let value = generate("TUPLE<INT,BOOLEAN,UUID>");
        let body = value.strip_prefix("( ").unwrap().strip_suffix(" )").unwrap();
        let parts: Vec<&str> = body.split(',').collect();
        assert_eq!(parts.len(), 3);
        assert!(matches!(parts[1], "true" | "false"));
    }

    #[test]
    fn test_frozen_is_transparent() {
        let config = SchemaConfig::default();
        let catalog = UdtCatalog::default();
        let ctx = ValueContext::new(&config, &catalog, "KS1");

        let mut rng1 = StdRng::seed_from_u64(9);
        let mut rng2 = StdRng::seed_from_u64(9);
        assert_eq!(
            generate_value(&mut rng1, ctx, "COL", "FROZEN<LIST<INT>>").unwrap(),
            generate_value(&mut rng2, ctx, "COL", "LIST<INT>").unwrap()
        );
    }

    #[test]
    fn test_deep_nesting_terminates() {
        let expr = format!("{}INT{}", "LIST<".repeat(10), ">".repeat(10));
        let config = SchemaConfig {
            collection_length_range: LengthRange::new(1, 1),
            ..SchemaConfig::default()
        };
        let catalog = UdtCatalog::default();
        let ctx = ValueContext::new(&config, &catalog, "KS1");
        let mut rng = StdRng::seed_from_u64(0);

        let value = generate_value(&mut rng, ctx, "COL", &expr).unwrap();
        assert_eq!(value.matches('[').count(), 10);
    }

    #[test]
    fn test_nesting_limit() {
        let depth = MAX_NESTING_DEPTH + 2;
        let expr = format!("{}INT{}", "FROZEN<".repeat(depth), ">".repeat(depth));

        let config = SchemaConfig::default();
        let catalog = UdtCatalog::default();
        let ctx = ValueContext::new(&config, &catalog, "KS1");
        let mut rng = StdRng::seed_from_u64(0);

        let result = generate_value(&mut rng, ctx, "COL", &expr);
        assert!(matches!(result, Err(GeneratorError::RecursionLimit(_))));
    }

    #[test]
    fn test_unclosed_wrapper_is_malformed() {
        let config = SchemaConfig::default();
        let catalog = UdtCatalog::default();
        let ctx = ValueContext::new(&config, &catalog, "KS1");
        let mut rng = StdRng::seed_from_u64(0);

        let result = generate_value(&mut rng, ctx, "COL", "LIST<INT");
        assert!(matches!(result, Err(GeneratorError::MalformedType(_))));
    }

    #[test]
    fn test_udt_value() {
        let processed = SchemaProcessor::default().process(
            "CREATE TYPE ks1.geo (lat double, lon double); CREATE TYPE ks1.addr (COD_CITY text, position frozen<geo>);",
        );
        let catalog = processed.udt_catalog();
        let config = SchemaConfig::default();
        let ctx = ValueContext::new(&config, &catalog, "KS1");
        let mut rng = StdRng::seed_from_u64(11);

        let value = generate_value(&mut rng, ctx, "HOME", "FROZEN<KS1.ADDR>").unwrap();
        assert!(value.starts_with("{ COD_CITY : '"));
        assert!(value.contains(" , POSITION : { LAT : "));
        assert!(value.contains(" , LON : "));

        // code column payload is 10 bytes of hex
        let city = value
            .strip_prefix("{ COD_CITY : '")
            .and_then(|rest| rest.split('\'').next())
            .unwrap();
        assert_eq!(city.len(), 20);
    }

    #[test]
    fn test_bare_udt_uses_default_keyspace() {
        let processed = SchemaProcessor::default().process("CREATE TYPE ks1.geo (lat double);");
        let catalog = processed.udt_catalog();
        let config = SchemaConfig::default();
        let mut rng = StdRng::seed_from_u64(11);

        let ctx = ValueContext::new(&config, &catalog, "KS1");
        assert!(generate_value(&mut rng, ctx, "G", "GEO").is_ok());

        let other = ValueContext::new(&config, &catalog, "KS2");
        let result = generate_value(&mut rng, other, "G", "GEO");
        assert!(matches!(result, Err(GeneratorError::UnresolvedType(_))));
    }

    #[test]
    fn test_empty_collection() {
        let config = SchemaConfig {
            collection_length_range: LengthRange::new(0, 0),
            ..SchemaConfig::default()
        };
        let catalog = UdtCatalog::default();
        let ctx = ValueContext::new(&config, &catalog, "KS1");
        let mut rng = StdRng::seed_from_u64(0);

        assert_eq!(generate_value(&mut rng, ctx, "C", "LIST<INT>").unwrap(), "[]");
        assert_eq!(generate_value(&mut rng, ctx, "C", "SET<INT>").unwrap(), "{}");
    }
}
