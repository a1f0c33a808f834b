//! Content digests and the keyed combine/verify scheme.
//!
//! Unkeyed BLAKE3 digests fingerprint the captured image and the capture
//! metadata. The two fingerprints are then bound together under a secret
//! key with a domain-separated, length-prefixed keyed hash. Every function
//! here is pure: the same inputs always give the same output.
//!
//! Sizes from 1 to 64 bytes are read from the BLAKE3 output stream. The
//! size is not an input to the hash, so a shorter digest is a prefix of a
//! longer one over the same input (and, for [`combine_keyed`], the same
//! key). BLAKE2b mixes the output length into its parameter block and has
//! no such relation. A digest therefore does not commit to its own length:
//! callers that accept more than one size must carry the size alongside it.

mod combine;
mod hash;

pub use combine::{combine_keyed, verify_combined, DOMAIN_LABEL};
pub use hash::{
    hash_bytes, hash_file, hash_stream, Digest, DigestError, DEFAULT_DIGEST_SIZE,
    MAX_DIGEST_SIZE, MIN_DIGEST_SIZE, STREAM_CHUNK_SIZE,
};
