//! Frame source selection for a capture run.

use super::{CaptureOrchestrator, CaptureProof, ProofError, ProofSettings};
use crate::capture::{CaptureConfig, MockCamera, ScopedCamera};

/// Where the frame for a run comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSource {
    /// The local capture device named by `CaptureConfig::device_id`.
    Device,
    /// Synthetic frames. Only used when the operator asks for them.
    Mock,
}

/// Runs one capture-and-combine against `source`.
///
/// Without the `camera` feature there is no device backend, so
/// [`CameraSource::Device`] fails with a device error instead of falling
/// back to synthetic frames.
pub fn capture_proof(
    source: CameraSource,
    capture: CaptureConfig,
    settings: ProofSettings,
) -> Result<CaptureProof, ProofError> {
    match source {
        CameraSource::Mock => {
            tracing::warn!("Using synthetic mock frames; the digest proves no real capture");
            let camera = ScopedCamera::new(MockCamera::new(), capture);
            CaptureOrchestrator::new(camera, settings).run_capture_and_combine()
        }
        CameraSource::Device => capture_from_device(capture, settings),
    }
}

#[cfg(feature = "camera")]
fn capture_from_device(
    capture: CaptureConfig,
    settings: ProofSettings,
) -> Result<CaptureProof, ProofError> {
    let camera = ScopedCamera::new(crate::capture::DeviceCamera::new(), capture);
    CaptureOrchestrator::new(camera, settings).run_capture_and_combine()
}

#[cfg(not(feature = "camera"))]
fn capture_from_device(
    _capture: CaptureConfig,
    _settings: ProofSettings,
) -> Result<CaptureProof, ProofError> {
    Err(crate::capture::CameraError::DeviceNotFound(
        "built without the `camera` feature".to_string(),
    )
    .into())
}
