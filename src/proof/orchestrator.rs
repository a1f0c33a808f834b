//! Single-shot capture-and-combine pipeline.
//!
//! ```text
//! frame → PNG on disk → image digest ─┐
//! nonce + timestamp → metadata digest ┼→ keyed combine → hex
//! env key | ephemeral key ────────────┘
//! ```

use base64::{engine::general_purpose, Engine as _};
use std::fs;
use std::path::{Path, PathBuf};

use super::{CaptureMetadata, ProofError};
use crate::capture::{encode_png, Camera, ScopedCamera};
use crate::digest::{
    combine_keyed, hash_bytes, hash_file, verify_combined, Digest, DigestError,
    DEFAULT_DIGEST_SIZE,
};
use crate::keys::{generate_key, load_key, KeyError, SecretKey, DEFAULT_KEY_ENV, DEFAULT_KEY_LEN};

/// Default location of the captured image.
pub const DEFAULT_IMAGE_PATH: &str = "output/captured_image.png";

/// Run parameters for [`CaptureOrchestrator`].
#[derive(Debug, Clone)]
pub struct ProofSettings {
    /// Where the PNG is written before it is digested.
    pub image_path: PathBuf,
    /// Environment variable consulted for the base64 key.
    pub key_env: String,
    /// Digest size in bytes for every digest of the run.
    pub digest_size: usize,
}

impl Default for ProofSettings {
    fn default() -> Self {
        Self {
            image_path: PathBuf::from(DEFAULT_IMAGE_PATH),
            key_env: DEFAULT_KEY_ENV.to_string(),
            digest_size: DEFAULT_DIGEST_SIZE,
        }
    }
}

/// Where the key used for a run came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrigin {
    /// Supplied directly by the caller.
    Provided,
    /// Decoded from the configured environment variable.
    Environment,
    /// Generated for this run only; not reproducible.
    Ephemeral,
}

impl KeyOrigin {
    /// True when the key exists only for this run and must be recorded to verify later.
    pub fn is_ephemeral(self) -> bool {
        self == KeyOrigin::Ephemeral
    }
}

/// Digests produced for one capture.
#[derive(Debug, Clone)]
pub struct CaptureDigests {
    /// Digest of the PNG bytes as written to disk.
    pub image: Digest,
    /// Digest of the canonical nonce and timestamp bytes.
    pub metadata: Digest,
    /// Lowercase hex keyed combination of `image` and `metadata`.
    pub combined: String,
}

/// Result of a full capture-and-combine run.
#[derive(Debug)]
pub struct CaptureProof {
    /// Image, metadata and combined digests.
    pub digests: CaptureDigests,
    /// Nonce and timestamp bound into the combined digest.
    pub metadata: CaptureMetadata,
    /// The key actually used. Persist it if `key_origin` is ephemeral.
    pub key: SecretKey,
    /// Where `key` came from.
    pub key_origin: KeyOrigin,
    /// Location of the written PNG.
    pub image_path: PathBuf,
    /// Standard base64 of the PNG bytes.
    pub image_base64: String,
}

impl CaptureProof {
    /// The combined hex digest.
    pub fn combined(&self) -> &str {
        &self.digests.combined
    }

    /// Leading `max_chars` characters of the base64 image, for display.
    pub fn base64_preview(&self, max_chars: usize) -> &str {
        let end = self.image_base64.len().min(max_chars);
        &self.image_base64[..end]
    }
}

fn bind_digests(
    image: Digest,
    metadata: &CaptureMetadata,
    key: &SecretKey,
    digest_size: usize,
) -> Result<CaptureDigests, DigestError> {
    let metadata = hash_bytes(&metadata.to_bytes(), digest_size)?;
    let combined = combine_keyed(
        image.as_bytes(),
        metadata.as_bytes(),
        Some(key.as_bytes()),
        digest_size,
    )?;
    Ok(CaptureDigests {
        image,
        metadata,
        combined,
    })
}

/// Digests already-captured image bytes together with `metadata` under `key`.
pub fn combine_capture(
    image: &[u8],
    metadata: &CaptureMetadata,
    key: &SecretKey,
    digest_size: usize,
) -> Result<CaptureDigests, DigestError> {
    let image = hash_bytes(image, digest_size)?;
    bind_digests(image, metadata, key, digest_size)
}

/// Checks a previously printed combined digest against the stored capture.
///
/// `Ok(false)` means the inputs do not reproduce `expected_hex`;
/// a malformed `expected_hex` or a missing key is an error instead.
pub fn verify_capture(
    expected_hex: &str,
    image: &[u8],
    metadata: &CaptureMetadata,
    key: Option<&SecretKey>,
    digest_size: usize,
) -> Result<bool, DigestError> {
    let image = hash_bytes(image, digest_size)?;
    let metadata = hash_bytes(&metadata.to_bytes(), digest_size)?;
    verify_combined(
        expected_hex,
        image.as_bytes(),
        metadata.as_bytes(),
        key.map(SecretKey::as_bytes),
        digest_size,
    )
}

/// Sequences one capture: frame, digests, key, combination.
pub struct CaptureOrchestrator<C: Camera> {
    camera: ScopedCamera<C>,
    settings: ProofSettings,
    key: Option<SecretKey>,
}

impl<C: Camera> CaptureOrchestrator<C> {
    /// The key is resolved from `settings.key_env` unless [`with_key`](Self::with_key) is used.
    pub fn new(camera: ScopedCamera<C>, settings: ProofSettings) -> Self {
        Self {
            camera,
            settings,
            key: None,
        }
    }

    /// Uses `key` instead of consulting the environment.
    pub fn with_key(mut self, key: SecretKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Runs the full pipeline once. The camera is released before returning,
    /// whether or not the run succeeds.
    pub fn run_capture_and_combine(mut self) -> Result<CaptureProof, ProofError> {
        let digest_size = self.settings.digest_size;

        let frame = self.camera.frame();
        self.camera.release();
        let frame = frame?;
        tracing::info!(
            width = frame.width(),
            height = frame.height(),
            "Captured frame"
        );

        let png = encode_png(&frame)?;
        write_image(&self.settings.image_path, &png)?;
        let image_base64 = general_purpose::STANDARD.encode(&png);

        let image_digest = hash_file(&self.settings.image_path, digest_size)?;

        let metadata = CaptureMetadata::fresh();
        let (key, key_origin) = self.resolve_key()?;

        let digests = bind_digests(image_digest, &metadata, &key, digest_size)?;
        tracing::info!(
            image_digest = %digests.image,
            metadata_digest = %digests.metadata,
            key_origin = ?key_origin,
            "Combined capture digest computed"
        );

        Ok(CaptureProof {
            digests,
            metadata,
            key,
            key_origin,
            image_path: self.settings.image_path.clone(),
            image_base64,
        })
    }

    fn resolve_key(&mut self) -> Result<(SecretKey, KeyOrigin), KeyError> {
        if let Some(key) = self.key.take() {
            return Ok((key, KeyOrigin::Provided));
        }

        match load_key(&self.settings.key_env)? {
            Some(key) => Ok((key, KeyOrigin::Environment)),
            None => {
                tracing::warn!(
                    source = %self.settings.key_env,
                    "No key configured; generated an ephemeral key that will not be reproducible across runs"
                );
                Ok((generate_key(DEFAULT_KEY_LEN)?, KeyOrigin::Ephemeral))
            }
        }
    }
}

fn write_image(path: &Path, png: &[u8]) -> Result<(), ProofError> {
    let output_err = |source| ProofError::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(output_err)?;
    }
    fs::write(path, png).map_err(output_err)?;

    tracing::debug!(path = %path.display(), bytes = png.len(), "Wrote captured image");
    Ok(())
}
