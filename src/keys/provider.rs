//! Key sourcing: environment lookup or fresh OS randomness.
//!
//! "Not configured" and "configured but invalid" are separate outcomes.
//! An unset (or blank) variable yields `Ok(None)` so the caller may fall back
//! to an ephemeral key; a value that does not decode is a hard
//! [`KeyError::Decode`] and must never be papered over.

use super::secret::SecretKey;
use base64::{engine::general_purpose, Engine as _};
use rand_core::{OsRng, RngCore};
use std::env::{self, VarError};
use thiserror::Error;

/// Default environment variable holding the base64 secret key.
pub const DEFAULT_KEY_ENV: &str = "OPTICAL_CAPTURE_KEY";

/// Errors that can occur while loading or generating keys.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The key source holds a value that is not a usable key.
    #[error("key source {source_name} is set but not valid base64: {reason}")]
    Decode {
        /// Environment variable the value came from.
        source_name: String,
        /// Why decoding failed.
        reason: String,
    },
    /// Requested key length is zero.
    #[error("invalid key length: {0} (must be at least 1 byte)")]
    InvalidLength(usize),
}

/// Decodes a configured key value.
///
/// Blank input is treated as "not configured" and returns `Ok(None)`.
pub fn decode_key(source_name: &str, value: &str) -> Result<Option<SecretKey>, KeyError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let bytes = general_purpose::STANDARD
        .decode(trimmed)
        .map_err(|e| KeyError::Decode {
            source_name: source_name.to_string(),
            reason: e.to_string(),
        })?;

    // Non-blank text that decodes to nothing is still a malformed key.
    SecretKey::from_bytes(bytes)
        .map(Some)
        .ok_or_else(|| KeyError::Decode {
            source_name: source_name.to_string(),
            reason: "decodes to zero bytes".to_string(),
        })
}

/// Loads a base64 key from the environment variable `source_name`.
pub fn load_key(source_name: &str) -> Result<Option<SecretKey>, KeyError> {
    match env::var(source_name) {
        Ok(value) => {
            let key = decode_key(source_name, &value)?;
            if let Some(ref k) = key {
                tracing::debug!(source = source_name, key_len = k.len(), "Loaded key");
            }
            Ok(key)
        }
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(KeyError::Decode {
            source_name: source_name.to_string(),
            reason: "value is not valid unicode".to_string(),
        }),
    }
}

/// Generates `length` bytes of key material from the OS entropy source.
pub fn generate_key(length: usize) -> Result<SecretKey, KeyError> {
    let mut bytes = vec![0u8; length];
    OsRng.fill_bytes(&mut bytes);
    SecretKey::from_bytes(bytes).ok_or(KeyError::InvalidLength(length))
}
