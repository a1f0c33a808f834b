//! Capture orchestration: one frame bound to fresh metadata under a key.
//!
//! The run is strictly sequential. Each step consumes the previous step's
//! output and any failure aborts it. Nothing is retried, because a second
//! capture would be a different frame.

mod error;
mod metadata;
mod orchestrator;
mod source;

pub use error::ProofError;
pub use metadata::{CaptureMetadata, MetadataError, Nonce, NONCE_LEN};
pub use orchestrator::{
    combine_capture, verify_capture, CaptureDigests, CaptureOrchestrator, CaptureProof,
    KeyOrigin, ProofSettings, DEFAULT_IMAGE_PATH,
};
pub use source::{capture_proof, CameraSource};
