//! Locally generated identifiers and fake chain values.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Random identifier for tree nodes and tabs (16 hex chars).
pub fn new_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let bytes: [u8; 8] = rng.r#gen();
    hex::encode(bytes)
}

/// Random 0x-prefixed felt (252-bit field element) in hex.
///
/// Used for contract addresses and transaction hashes.
pub fn random_felt<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut bytes: [u8; 32] = rng.r#gen();
    clamp_to_felt(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

/// Deterministic class hash for a compiled source.
pub fn class_hash(source: &str) -> String {
    let mut bytes: [u8; 32] = Sha256::digest(source.as_bytes()).into();
    clamp_to_felt(&mut bytes);
    format!("0x{}", hex::encode(bytes))
}

/// Shorten a 0x hex value for display (`0x1234…abcd`).
pub fn short_hex(value: &str) -> String {
    if value.len() > 14 {
        format!("{}…{}", &value[..6], &value[value.len() - 4..])
    } else {
        value.to_string()
    }
}

// Felts are < 2^251 + 17 * 2^192 + 1; keeping the top five bits clear stays in range.
fn clamp_to_felt(bytes: &mut [u8; 32]) {
    bytes[0] &= 0x07;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_new_id_shape() {
        let mut rng = StdRng::seed_from_u64(1);
        let id = new_id(&mut rng);
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, new_id(&mut rng));
    }

    #[test]
    fn test_random_felt_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let felt = random_felt(&mut rng);
            assert!(felt.starts_with("0x"));
            assert_eq!(felt.len(), 66);
            let top = u8::from_str_radix(&felt[2..4], 16).unwrap();
            assert!(top <= 0x07);
        }
    }

    #[test]
    fn test_class_hash_is_deterministic() {
        assert_eq!(class_hash("mod a {}"), class_hash("mod a {}"));
        assert_ne!(class_hash("mod a {}"), class_hash("mod b {}"));
    }

    #[test]
    fn test_short_hex() {
        assert_eq!(short_hex("0x1234"), "0x1234");
        assert_eq!(
            short_hex("0x0123456789abcdef0123456789abcdef"),
            "0x0123…cdef"
        );
    }
}
