//! Unkeyed BLAKE3 content digests.
//!
//! Output is read through the BLAKE3 extendable-output reader so that
//! callers can ask for any digest size in [`MIN_DIGEST_SIZE`]..=[`MAX_DIGEST_SIZE`].

use blake3::Hasher;
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use thiserror::Error;

/// Default digest size in bytes.
pub const DEFAULT_DIGEST_SIZE: usize = 32;

/// Smallest supported digest size in bytes.
pub const MIN_DIGEST_SIZE: usize = 1;

/// Largest supported digest size in bytes.
pub const MAX_DIGEST_SIZE: usize = 64;

/// Read size used by [`hash_stream`].
pub const STREAM_CHUNK_SIZE: usize = 8192;

/// Errors that can occur while computing or checking digests.
#[derive(Debug, Error)]
pub enum DigestError {
    /// Digest size outside 1-64 bytes.
    #[error("unsupported digest size {0} (must be 1-64 bytes)")]
    UnsupportedSize(usize),
    /// Keyed combination was asked for without a key.
    #[error("a non-empty key is required for keyed combination")]
    MissingKey,
    /// The expected digest is not hex of the right length.
    #[error("malformed expected digest: {0}")]
    MalformedInput(String),
    /// An input is longer than its 32-bit length prefix can describe.
    #[error("input of {0} bytes exceeds the 32-bit length prefix")]
    InputTooLong(usize),
    /// Reading the input stream failed.
    #[error("failed to read digest input: {0}")]
    Io(#[from] std::io::Error),
}

/// A fixed-length digest.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// Returns the digest bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the digest size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for digests produced by this module.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

pub(crate) fn check_size(digest_size: usize) -> Result<(), DigestError> {
    if (MIN_DIGEST_SIZE..=MAX_DIGEST_SIZE).contains(&digest_size) {
        Ok(())
    } else {
        Err(DigestError::UnsupportedSize(digest_size))
    }
}

/// Reads `digest_size` bytes of output from a finished hasher.
pub(crate) fn finalize(hasher: &Hasher, digest_size: usize) -> Vec<u8> {
    let mut out = vec![0u8; digest_size];
    hasher.finalize_xof().fill(&mut out);
    out
}

/// Hashes `data` into a digest of `digest_size` bytes.
pub fn hash_bytes(data: &[u8], digest_size: usize) -> Result<Digest, DigestError> {
    check_size(digest_size)?;
    let mut hasher = Hasher::new();
    hasher.update(data);
    Ok(Digest(finalize(&hasher, digest_size)))
}

/// Hashes everything readable from `source` in bounded chunks.
///
/// The result is identical to [`hash_bytes`] over the full content.
pub fn hash_stream<R: Read>(mut source: R, digest_size: usize) -> Result<Digest, DigestError> {
    check_size(digest_size)?;
    let mut hasher = Hasher::new();
    let mut buf = [0u8; STREAM_CHUNK_SIZE];
    let mut total = 0usize;

    loop {
        let n = match source.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        hasher.update(&buf[..n]);
        total += n;
    }

    tracing::trace!(bytes = total, digest_size, "Hashed stream");
    Ok(Digest(finalize(&hasher, digest_size)))
}

/// Hashes the file at `path` with [`hash_stream`].
pub fn hash_file(path: impl AsRef<Path>, digest_size: usize) -> Result<Digest, DigestError> {
    let file = File::open(path.as_ref())?;
    hash_stream(file, digest_size)
}
