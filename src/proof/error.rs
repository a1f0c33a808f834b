use std::path::PathBuf;
use thiserror::Error;

use super::MetadataError;
use crate::capture::{CameraError, ConfigError, EncodeError};
use crate::digest::DigestError;
use crate::keys::KeyError;

/// Any failure of a capture-and-combine run. All of them are fatal.
#[derive(Debug, Error)]
pub enum ProofError {
    /// Opening, configuring or reading the camera failed.
    #[error("camera error: {0}")]
    Device(#[from] CameraError),
    /// The configured key could not be loaded or generated.
    #[error("key error: {0}")]
    Key(#[from] KeyError),
    /// Hashing, combining or verifying failed.
    #[error("digest error: {0}")]
    Digest(#[from] DigestError),
    /// The frame could not be encoded as PNG.
    #[error("image encoding error: {0}")]
    Encode(#[from] EncodeError),
    /// Stored metadata could not be parsed.
    #[error("metadata error: {0}")]
    Metadata(#[from] MetadataError),
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to write {}: {source}", .path.display())]
    /// The captured image could not be written.
    Output {
        /// Destination that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
