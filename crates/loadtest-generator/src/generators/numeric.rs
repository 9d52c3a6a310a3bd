//! Numeric and network address literal generators.

use rand::Rng;

/// Upper bound (exclusive) for BIGINT and COUNTER values.
pub const BIGINT_MAX: i64 = 1_000_000_000_000_000;

/// Upper bound (exclusive) for INT and VARINT values.
pub const INT_MAX: i64 = 1000;

/// Upper bound (exclusive) for SMALLINT and TINYINT values.
pub const SMALL_INT_MAX: i64 = 8;

/// Upper bound (exclusive) for floating and decimal values.
pub const FLOAT_MAX: f64 = 10_000_000.0;

/// Generate a random integer in `[0, max)`.
pub fn generate_int_below<R: Rng>(rng: &mut R, max: i64) -> String {
    rng.gen_range(0..max).to_string()
}

/// Generate a dotted-quad IPv4 address, quoted.
pub fn generate_ipv4<R: Rng>(rng: &mut R) -> String {
    let [a, b, c, d]: [u8; 4] = rng.gen();
    format!("'{a}.{b}.{c}.{d}'")
}

/// Generate a fixed-point number in `[0, FLOAT_MAX)` with `scale` decimals.
pub fn generate_fixed_point<R: Rng>(rng: &mut R, scale: usize) -> String {
    let value = rng.gen_range(0.0..FLOAT_MAX);
    format!("{value:.scale$}")
}
