//! Date, time, timestamp and duration literal generators.
//!
//! Date and time values are taken from the clock at generation time, so
//! they are NOT deterministic across runs.

use chrono::{DateTime, Utc};
use rand::Rng;

/// `'YYYY-MM-DD'` for the given instant.
pub fn date_literal(now: DateTime<Utc>) -> String {
    now.format("'%Y-%m-%d'").to_string()
}

/// `'HH:MM:SS.mmm'` for the given instant.
pub fn time_literal(now: DateTime<Utc>) -> String {
    now.format("'%H:%M:%S%.3f'").to_string()
}

/// `'YYYY-MM-DDTHH:MM:SS.mmmZ'` for the given instant.
pub fn timestamp_literal(now: DateTime<Utc>) -> String {
    now.format("'%Y-%m-%dT%H:%M:%S%.3fZ'").to_string()
}

/// Generate a CQL duration literal such as `3h25m7s`.
pub fn generate_duration<R: Rng>(rng: &mut R) -> String {
    let hours = rng.gen_range(0..24);
    let minutes = rng.gen_range(0..60);
    let seconds = rng.gen_range(0..60);
    format!("{hours}h{minutes}m{seconds}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixed_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap()
    }

    #[test]
    fn test_date_literal() {
        let literal = date_literal(fixed_instant());
        assert_eq!(literal, "'2024-03-09'");
        NaiveDate::parse_from_str(literal.trim_matches('\''), "%Y-%m-%d").unwrap();
    }

    #[test]
    fn test_time_literal() {
        let literal = time_literal(fixed_instant());
        assert_eq!(literal, "'07:05:01.000'");
        NaiveTime::parse_from_str(literal.trim_matches('\''), "%H:%M:%S%.3f").unwrap();
    }

    #[test]
    fn test_timestamp_literal_is_rfc3339() {
        let literal = timestamp_literal(fixed_instant());
        assert_eq!(literal, "'2024-03-09T07:05:01.000Z'");
        DateTime::parse_from_rfc3339(literal.trim_matches('\'')).unwrap();
    }

    #[test]
    fn test_generate_duration() {
        let mut rng = StdRng::seed_from_u64(42);
        let literal = generate_duration(&mut rng);

        let (hours, rest) = literal.split_once('h').unwrap();
        let (minutes, rest) = rest.split_once('m').unwrap();
        let seconds = rest.strip_suffix('s').unwrap();
        assert!(hours.parse::<u32>().unwrap() < 24);
        assert!(minutes.parse::<u32>().unwrap() < 60);
        assert!(seconds.parse::<u32>().unwrap() < 60);
    }
}
