//! Scoped ownership of a camera device.

use super::{Camera, CameraError, CaptureConfig, Frame};

/// Owns a [`Camera`] for the duration of one capture.
///
/// The device is opened lazily on the first [`frame`](Self::frame) call and
/// closed by [`release`](Self::release) or, failing that, on drop. Every exit
/// path therefore gives the device back, including error returns and unwinds.
pub struct ScopedCamera<C: Camera> {
    camera: C,
    config: CaptureConfig,
}

impl<C: Camera> ScopedCamera<C> {
    /// Takes ownership of `camera`; nothing is opened yet.
    pub fn new(camera: C, config: CaptureConfig) -> Self {
        Self { camera, config }
    }

    /// Opens the device if needed and reads one frame.
    pub fn frame(&mut self) -> Result<Frame, CameraError> {
        if !self.camera.is_open() {
            self.camera.open(&self.config)?;
        }
        let frame = self.camera.capture()?;
        tracing::debug!(?frame, "Frame acquired");
        Ok(frame)
    }

    /// Closes the device. Safe to call repeatedly.
    pub fn release(&mut self) {
        if self.camera.is_open() {
            self.camera.close();
        }
    }

    /// Whether the underlying device is currently open.
    pub fn is_open(&self) -> bool {
        self.camera.is_open()
    }
}

impl<C: Camera> Drop for ScopedCamera<C> {
    fn drop(&mut self) {
        self.release();
    }
}
