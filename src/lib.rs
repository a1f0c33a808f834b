//! Optical Capture Library
//!
//! Captures a single still frame from a local camera and binds it to a
//! fresh random nonce and timestamp with a keyed, domain-separated BLAKE3
//! digest. The printed digest later proves that this exact image and this
//! exact metadata were combined by a holder of the key.
//!
//! # Architecture
//!
//! ```text
//! capture → proof (orchestration) → digest
//!                  ↑
//!                 keys
//! ```
//!
//! # Design Principles
//!
//! - **Fail-closed**: a malformed configured key is fatal, never replaced
//! - **Scoped device**: the camera is released on every exit path
//! - **Unambiguous encoding**: the combine input is length-prefixed and labelled
//! - **Constant-time verification** of combined digests
//!
//! # Example
//!
//! ```no_run
//! use optical_capture::{
//!     capture::{CaptureConfig, MockCamera, ScopedCamera},
//!     proof::{CaptureOrchestrator, ProofSettings},
//! };
//!
//! let camera = ScopedCamera::new(MockCamera::new(), CaptureConfig::default());
//! let proof = CaptureOrchestrator::new(camera, ProofSettings::default())
//!     .run_capture_and_combine()
//!     .unwrap();
//!
//! println!("combined digest: {}", proof.combined());
//! if proof.key_origin.is_ephemeral() {
//!     println!("ephemeral key: {}", proof.key.to_base64());
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod capture;
pub mod config;
pub mod digest;
pub mod keys;
pub mod proof;

// Re-export commonly used types at crate root
pub use capture::{Camera, CaptureConfig, Frame, MockCamera, ScopedCamera};
pub use config::FileConfig;
pub use digest::{combine_keyed, hash_bytes, hash_stream, verify_combined, Digest, DigestError};
pub use keys::{generate_key, load_key, KeyError, SecretKey};
pub use proof::{
    capture_proof, CameraSource, CaptureOrchestrator, CaptureProof, KeyOrigin, ProofError,
    ProofSettings,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
