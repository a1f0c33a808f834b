//! Hardware camera backed by `nokhwa`.

use super::{Camera, CameraError, CaptureConfig, Frame, PixelFormat};
use nokhwa::pixel_format::{LumaFormat, RgbFormat};
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType, Resolution,
};
use nokhwa::NokhwaError;

/// A local capture device addressed by index.
#[derive(Default)]
pub struct DeviceCamera {
    handle: Option<nokhwa::Camera>,
    format: PixelFormat,
    sequence: u64,
}

impl DeviceCamera {
    /// A closed handle. The device index comes from the config passed to `open`.
    pub fn new() -> Self {
        Self::default()
    }
}

fn capture_failed(e: NokhwaError) -> CameraError {
    CameraError::CaptureFailed(e.to_string())
}

impl Camera for DeviceCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;

        let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
            CameraFormat::new(
                Resolution::new(config.width, config.height),
                FrameFormat::MJPEG,
                config.fps,
            ),
        ));

        let mut handle = nokhwa::Camera::new(CameraIndex::Index(config.device_id), requested)
            .map_err(|e| CameraError::DeviceNotFound(e.to_string()))?;
        handle
            .open_stream()
            .map_err(|e| CameraError::OpenFailed(e.to_string()))?;

        tracing::info!(
            device_id = config.device_id,
            resolution = ?handle.resolution(),
            "Camera device opened"
        );

        self.handle = Some(handle);
        self.format = config.pixel_format();
        self.sequence = 0;
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let handle = self.handle.as_mut().ok_or(CameraError::NotInitialized)?;
        let buffer = handle.frame().map_err(capture_failed)?;

        let (width, height, pixels) = match self.format {
            PixelFormat::Rgb => {
                let img = buffer.decode_image::<RgbFormat>().map_err(capture_failed)?;
                (img.width(), img.height(), img.into_raw())
            }
            PixelFormat::Gray => {
                let img = buffer.decode_image::<LumaFormat>().map_err(capture_failed)?;
                (img.width(), img.height(), img.into_raw())
            }
        };

        self.sequence += 1;
        Ok(Frame::new(pixels, width, height, self.format, self.sequence))
    }

    fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn close(&mut self) {
        if let Some(mut handle) = self.handle.take() {
            if let Err(e) = handle.stop_stream() {
                tracing::warn!("Failed to stop camera stream cleanly: {}", e);
            }
            tracing::info!("Camera device closed");
        }
    }
}
