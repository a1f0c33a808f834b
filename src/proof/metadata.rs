//! Capture freshness metadata: a random nonce and a wall-clock timestamp.

use rand_core::{OsRng, RngCore};
use thiserror::Error;

/// Nonce length in bytes.
pub const NONCE_LEN: usize = 16;

const METADATA_PREFIX: &[u8] = b"nonce:";
const METADATA_SEPARATOR: &[u8] = b"|ts:";

/// Errors that can occur while parsing stored metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Not 32 hex characters.
    #[error("invalid nonce: {0}")]
    InvalidNonce(String),
}

/// A 16-byte value drawn fresh for every capture. Not secret.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Draws a nonce from the OS entropy source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Wraps raw nonce bytes.
    pub fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Parses a nonce previously printed with [`Nonce::to_hex`].
    pub fn from_hex(s: &str) -> Result<Self, MetadataError> {
        let mut bytes = [0u8; NONCE_LEN];
        hex::decode_to_slice(s.trim(), &mut bytes)
            .map_err(|e| MetadataError::InvalidNonce(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Raw nonce bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }

    /// Lowercase hex, as printed by the CLI.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl std::fmt::Debug for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Nonce({})", self.to_hex())
    }
}

/// Nonce and Unix timestamp (seconds) bound into a capture digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureMetadata {
    nonce: Nonce,
    timestamp: i64,
}

impl CaptureMetadata {
    /// Rebuilds metadata from stored values, e.g. for verification.
    pub fn new(nonce: Nonce, timestamp: i64) -> Self {
        Self { nonce, timestamp }
    }

    /// Fresh nonce, current UTC time.
    pub fn fresh() -> Self {
        Self::new(Nonce::generate(), chrono::Utc::now().timestamp())
    }

    /// The capture nonce.
    #[inline]
    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    /// Unix timestamp in seconds.
    #[inline]
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Canonical byte encoding:
    /// `"nonce:" || nonce (16 raw bytes) || "|ts:" || decimal timestamp`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let ts = self.timestamp.to_string();
        let mut out =
            Vec::with_capacity(METADATA_PREFIX.len() + NONCE_LEN + METADATA_SEPARATOR.len() + ts.len());
        out.extend_from_slice(METADATA_PREFIX);
        out.extend_from_slice(&self.nonce.0);
        out.extend_from_slice(METADATA_SEPARATOR);
        out.extend_from_slice(ts.as_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counting_nonce() -> Nonce {
        let mut bytes = [0u8; NONCE_LEN];
        for (i, b) in bytes.iter_mut().enumerate() {
            *b = i as u8;
        }
        Nonce::from_bytes(bytes)
    }

    #[test]
    fn test_metadata_encoding() {
        let metadata = CaptureMetadata::new(counting_nonce(), 1_700_000_000);

        let mut expected = b"nonce:".to_vec();
        expected.extend(0u8..16);
        expected.extend_from_slice(b"|ts:1700000000");

        assert_eq!(metadata.to_bytes(), expected);
    }

    #[test]
    fn test_nonce_hex_round_trip() {
        let nonce = counting_nonce();
        assert_eq!(nonce.to_hex(), "000102030405060708090a0b0c0d0e0f");
        assert_eq!(Nonce::from_hex(&nonce.to_hex()).unwrap(), nonce);
    }

    #[test]
    fn test_nonce_from_bad_hex() {
        assert!(Nonce::from_hex("0001").is_err());
        assert!(Nonce::from_hex(&"zz".repeat(16)).is_err());
    }

    #[test]
    fn test_fresh_nonces_differ() {
        let a = CaptureMetadata::fresh();
        let b = CaptureMetadata::fresh();
        assert_ne!(a.nonce(), b.nonce());
        assert!(a.timestamp() > 1_600_000_000);
    }
}
