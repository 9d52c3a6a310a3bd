//! UUID and TIMEUUID literal generators.
//!
//! CQL takes UUIDs as bare constants, so the literals are unquoted.

use chrono::Utc;
use rand::Rng;
use uuid::{Builder, Context, Timestamp, Uuid};

/// Random UUID v4 drawn from `rng`, so a seeded run repeats its keys.
pub fn generate_uuid_v4<R: Rng>(rng: &mut R) -> Uuid {
    Builder::from_random_bytes(rng.gen()).into_uuid()
}

/// Time-based UUID v1 for the current time.
///
/// Clock sequence and node are random; the node has the multicast bit set
/// so it can never collide with a real MAC address.
pub fn generate_time_uuid<R: Rng>(rng: &mut R) -> Uuid {
    let now = Utc::now();
    let context = Context::new(rng.gen());
    let timestamp = Timestamp::from_unix(
        &context,
        now.timestamp().max(0) as u64,
        now.timestamp_subsec_nanos(),
    );

    let mut node: [u8; 6] = rng.gen();
    node[0] |= 0x01;
    Uuid::new_v1(timestamp, &node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::{Variant, Version};

    #[test]
    fn test_uuid_v4_is_random_rfc4122() {
        let mut rng = StdRng::seed_from_u64(11);
        let first = generate_uuid_v4(&mut rng);
        let second = generate_uuid_v4(&mut rng);

        assert_eq!(first.get_version(), Some(Version::Random));
        assert_eq!(first.get_variant(), Variant::RFC4122);
        assert_ne!(first, second);
        assert_eq!(Uuid::parse_str(&first.to_string()).unwrap(), first);
    }

    #[test]
    fn test_uuid_v4_repeats_for_a_seed() {
        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (generate_uuid_v4(&mut rng), generate_uuid_v4(&mut rng))
        };
        assert_eq!(draw(3), draw(3));
        assert_ne!(draw(3), draw(4));
    }

    #[test]
    fn test_time_uuid_version_and_node() {
        let mut rng = StdRng::seed_from_u64(7);
        let value = generate_time_uuid(&mut rng);

        assert_eq!(value.get_version(), Some(Version::Mac));
        assert_eq!(value.get_variant(), Variant::RFC4122);
        let node = &value.as_bytes()[10..];
        assert_eq!(node[0] & 0x01, 0x01);
    }

    #[test]
    fn test_time_uuid_carries_current_time() {
        let mut rng = StdRng::seed_from_u64(7);
        let value = generate_time_uuid(&mut rng);

        let (secs, _nanos) = value.get_timestamp().unwrap().to_unix();
        let now = Utc::now().timestamp() as u64;
        assert!(now.abs_diff(secs) <= 5);
    }
}
