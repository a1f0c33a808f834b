//! Keyed, domain-separated combination of two digests.
//!
//! # Construction
//!
//! ```text
//! combined = BLAKE3_keyed(K, LABEL || be32(|a|) || a || be32(|b|) || b)
//! ```
//!
//! The length prefixes make the encoding injective, so `("x", "xy")` and
//! `("xy", "x")` never hash the same byte string. The label binds the output
//! to this scheme and version.

use super::hash::{check_size, finalize, DigestError};
use blake3::Hasher;
use subtle::ConstantTimeEq;

/// Domain separator for the combine step.
pub const DOMAIN_LABEL: &[u8] = b"optical-capture-combine-v1";

/// Context used to stretch or compress keys that are not 32 bytes long.
const KEY_NORMALIZE_CONTEXT: &str = "optical-capture 2024 combine key normalization v1";

const BLAKE3_KEY_LEN: usize = blake3::KEY_LEN;

/// Produces the 32-byte BLAKE3 key for `key`.
///
/// A key of exactly 32 bytes is used as-is; any other length goes through
/// BLAKE3 key derivation under a fixed context.
fn normalize_key(key: &[u8]) -> [u8; BLAKE3_KEY_LEN] {
    match <[u8; BLAKE3_KEY_LEN]>::try_from(key) {
        Ok(exact) => exact,
        Err(_) => blake3::derive_key(KEY_NORMALIZE_CONTEXT, key),
    }
}

fn length_prefix(part: &[u8]) -> Result<[u8; 4], DigestError> {
    u32::try_from(part.len())
        .map(u32::to_be_bytes)
        .map_err(|_| DigestError::InputTooLong(part.len()))
}

fn combine_raw(
    a: &[u8],
    b: &[u8],
    key: Option<&[u8]>,
    digest_size: usize,
) -> Result<Vec<u8>, DigestError> {
    let key = match key {
        Some(k) if !k.is_empty() => k,
        _ => return Err(DigestError::MissingKey),
    };
    check_size(digest_size)?;

    let mut hasher = Hasher::new_keyed(&normalize_key(key));
    hasher.update(DOMAIN_LABEL);
    hasher.update(&length_prefix(a)?);
    hasher.update(a);
    hasher.update(&length_prefix(b)?);
    hasher.update(b);

    Ok(finalize(&hasher, digest_size))
}

/// Combines `a` and `b` under `key`, returning lowercase hex.
///
/// Fails with [`DigestError::MissingKey`] when `key` is `None` or empty.
pub fn combine_keyed(
    a: &[u8],
    b: &[u8],
    key: Option<&[u8]>,
    digest_size: usize,
) -> Result<String, DigestError> {
    combine_raw(a, b, key, digest_size).map(hex::encode)
}

/// Recomputes [`combine_keyed`] and compares it to `expected_hex` in constant time.
///
/// Returns `Ok(false)` on mismatch. Only a malformed `expected_hex` (wrong
/// length or non-hex characters) or an unusable key/size is an error.
pub fn verify_combined(
    expected_hex: &str,
    a: &[u8],
    b: &[u8],
    key: Option<&[u8]>,
    digest_size: usize,
) -> Result<bool, DigestError> {
    check_size(digest_size)?;

    let want = digest_size * 2;
    if expected_hex.len() != want {
        return Err(DigestError::MalformedInput(format!(
            "expected {want} hex characters, got {}",
            expected_hex.len()
        )));
    }
    let expected =
        hex::decode(expected_hex).map_err(|e| DigestError::MalformedInput(e.to_string()))?;

    let actual = combine_raw(a, b, key, digest_size)?;
    let matches = bool::from(actual.as_slice().ct_eq(expected.as_slice()));

    tracing::debug!(matches, digest_size, "Verified combined digest");
    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::DEFAULT_DIGEST_SIZE;
    use proptest::prelude::*;

    const KEY: [u8; 32] = [0x42; 32];

    fn combine(a: &[u8], b: &[u8], key: &[u8]) -> String {
        combine_keyed(a, b, Some(key), DEFAULT_DIGEST_SIZE).unwrap()
    }

    #[test]
    fn test_combine_output_shape() {
        let hex = combine(b"image", b"meta", &KEY);
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let short = combine_keyed(b"image", b"meta", Some(&KEY[..]), 16).unwrap();
        assert_eq!(short.len(), 32);
    }

    #[test]
    fn test_combine_matches_reference_construction() {
        let mut input = Vec::new();
        input.extend_from_slice(DOMAIN_LABEL);
        input.extend_from_slice(&1u32.to_be_bytes());
        input.extend_from_slice(b"a");
        input.extend_from_slice(&2u32.to_be_bytes());
        input.extend_from_slice(b"bc");
        let expected = blake3::keyed_hash(&KEY, &input).to_hex().to_string();

        assert_eq!(combine(b"a", b"bc", &KEY), expected);
    }

    #[test]
    fn test_length_prefix_prevents_split_ambiguity() {
        assert_ne!(combine(b"x", b"xy", &KEY), combine(b"xy", b"x", &KEY));
        assert_ne!(combine(b"x", b"xy", &KEY), combine(b"xx", b"y", &KEY));
        assert_ne!(combine(b"", b"ab", &KEY), combine(b"ab", b"", &KEY));
    }

    #[test]
    fn test_missing_key() {
        assert!(matches!(
            combine_keyed(b"a", b"b", None, DEFAULT_DIGEST_SIZE),
            Err(DigestError::MissingKey)
        ));
        assert!(matches!(
            combine_keyed(b"a", b"b", Some(b"".as_slice()), DEFAULT_DIGEST_SIZE),
            Err(DigestError::MissingKey)
        ));
        assert!(matches!(
            verify_combined(&"0".repeat(64), b"a", b"b", None, DEFAULT_DIGEST_SIZE),
            Err(DigestError::MissingKey)
        ));
    }

    #[test]
    fn test_non_standard_key_lengths_are_usable_and_distinct() {
        let short = combine(b"a", b"b", &[7u8; 16]);
        let long = combine(b"a", b"b", &[7u8; 64]);
        assert_eq!(short.len(), 64);
        assert_ne!(short, long);
        assert_ne!(short, combine(b"a", b"b", &KEY));
    }

    #[test]
    fn test_verify_round_trip_and_mismatch() {
        let hex = combine(b"image", b"meta", &KEY);
        assert!(verify_combined(&hex, b"image", b"meta", Some(&KEY[..]), 32).unwrap());
        assert!(verify_combined(&hex.to_uppercase(), b"image", b"meta", Some(&KEY[..]), 32).unwrap());
        assert!(!verify_combined(&hex, b"image", b"other", Some(&KEY[..]), 32).unwrap());
        assert!(!verify_combined(&hex, b"image", b"meta", Some(&[0x43u8; 32][..]), 32).unwrap());
    }

    #[test]
    fn test_malformed_expected_hex() {
        let odd = "a".repeat(63);
        assert!(matches!(
            verify_combined(&odd, b"a", b"b", Some(&KEY[..]), 32),
            Err(DigestError::MalformedInput(_))
        ));

        let non_hex = "zz".repeat(32);
        assert!(matches!(
            verify_combined(&non_hex, b"a", b"b", Some(&KEY[..]), 32),
            Err(DigestError::MalformedInput(_))
        ));

        let wrong_length = "ab".repeat(16);
        assert!(matches!(
            verify_combined(&wrong_length, b"a", b"b", Some(&KEY[..]), 32),
            Err(DigestError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_sizes_share_a_prefix() {
        let short = combine_keyed(b"image", b"meta", Some(&KEY[..]), 16).unwrap();
        let long = combine_keyed(b"image", b"meta", Some(&KEY[..]), 32).unwrap();
        assert_eq!(short, long[..32]);

        // Verification at the short size accepts only the short form.
        assert!(verify_combined(&short, b"image", b"meta", Some(&KEY[..]), 16).unwrap());
        assert!(matches!(
            verify_combined(&short, b"image", b"meta", Some(&KEY[..]), 32),
            Err(DigestError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_unsupported_size() {
        assert!(matches!(
            combine_keyed(b"a", b"b", Some(&KEY[..]), 0),
            Err(DigestError::UnsupportedSize(0))
        ));
    }

    proptest! {
        #[test]
        fn prop_verify_accepts_own_output(
            a in proptest::collection::vec(any::<u8>(), 0..128),
            b in proptest::collection::vec(any::<u8>(), 0..128),
            key in proptest::array::uniform32(any::<u8>()),
        ) {
            let hex = combine(&a, &b, &key);
            prop_assert!(verify_combined(&hex, &a, &b, Some(&key[..]), 32).unwrap());
        }

        #[test]
        fn prop_single_byte_mutation_changes_output(
            a in proptest::collection::vec(any::<u8>(), 1..64),
            b in proptest::collection::vec(any::<u8>(), 1..64),
            key in proptest::array::uniform32(any::<u8>()),
            which in 0usize..3,
            index in any::<prop::sample::Index>(),
            flip in 1u8..=255,
        ) {
            let original = combine(&a, &b, &key);

            let (mut a2, mut b2, mut key2) = (a.clone(), b.clone(), key);
            match which {
                0 => { let i = index.index(a2.len()); a2[i] ^= flip; }
                1 => { let i = index.index(b2.len()); b2[i] ^= flip; }
                _ => { let i = index.index(key2.len()); key2[i] ^= flip; }
            }

            prop_assert_ne!(original, combine(&a2, &b2, &key2));
        }

        #[test]
        fn prop_swap_changes_output(
            a in proptest::collection::vec(any::<u8>(), 0..32),
            b in proptest::collection::vec(any::<u8>(), 0..32),
        ) {
            prop_assume!(a != b);
            prop_assert_ne!(combine(&a, &b, &KEY), combine(&b, &a, &KEY));
        }
    }
}
