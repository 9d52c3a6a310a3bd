//! Text and blob literal generators.
//!
//! Payloads are hex-encoded random bytes, so literals never contain a quote.

use cql_schema::SchemaConfig;
use rand::Rng;

/// Generate a quoted text literal.
///
/// Code columns get a fixed short payload; others get half a drawn string
/// length in random bytes (two hex characters each).
pub fn generate_text<R: Rng>(rng: &mut R, config: &SchemaConfig, column: &str) -> String {
    let bytes = if config.is_code_column(column) {
        config.code_payload_bytes
    } else {
        let range = config.string_length_range;
        rng.gen_range(range.bounds()) / 2
    };
    format!("'{}'", random_hex(rng, bytes))
}

/// Generate a blob literal: `textAsBlob('<hex>')`.
pub fn generate_blob<R: Rng>(rng: &mut R, config: &SchemaConfig, column: &str) -> String {
    let bytes = if config.is_code_column(column) {
        config.code_payload_bytes
    } else {
        let range = config.blob_length_range;
        rng.gen_range(range.bounds())
    };
    format!("textAsBlob('{}')", random_hex(rng, bytes))
}

fn random_hex<R: Rng>(rng: &mut R, len: usize) -> String {
    let mut buf = vec![0u8; len];
    rng.fill(buf.as_mut_slice());
    hex::encode(buf)
}
