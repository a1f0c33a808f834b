//! Camera abstraction for frame capture.
//!
//! This module provides a trait-based abstraction over camera hardware,
//! allowing for both real camera input and mock implementations for testing.

use super::{CaptureConfig, Frame};
use thiserror::Error;

/// Errors that can occur during camera operations.
#[derive(Debug, Error)]
pub enum CameraError {
    /// No device answers at the configured index.
    #[error("camera device not found: {0}")]
    DeviceNotFound(String),
    /// The device exists but refused to open or stream.
    #[error("failed to open camera: {0}")]
    OpenFailed(String),
    /// The requested configuration is invalid or unsupported.
    #[error("failed to configure camera: {0}")]
    ConfigFailed(String),
    /// Reading or decoding a frame failed.
    #[error("failed to capture frame: {0}")]
    CaptureFailed(String),
    /// `capture` was called before `open`.
    #[error("camera not initialized")]
    NotInitialized,
}

/// Trait for camera implementations.
///
/// This abstraction allows swapping between real camera hardware
/// and mock implementations for testing.
pub trait Camera {
    /// Opens and initializes the camera with the given configuration.
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError>;

    /// Captures a single frame.
    fn capture(&mut self) -> Result<Frame, CameraError>;

    /// Checks if the camera is currently open.
    fn is_open(&self) -> bool;

    /// Closes the camera and releases resources.
    fn close(&mut self);
}

/// Mock camera that produces a synthetic gradient frame.
///
/// Frames are deterministic for a given configuration and sequence number.
/// They carry no entropy and exist for testing and offline demonstration.
#[derive(Debug, Default)]
pub struct MockCamera {
    config: Option<CaptureConfig>,
    sequence: u64,
}

impl MockCamera {
    /// A closed mock camera; frames start at sequence 0.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Camera for MockCamera {
    fn open(&mut self, config: &CaptureConfig) -> Result<(), CameraError> {
        config
            .validate()
            .map_err(|e| CameraError::ConfigFailed(e.to_string()))?;
        self.config = Some(config.clone());
        self.sequence = 0;
        tracing::info!(
            width = config.width,
            height = config.height,
            grayscale = config.grayscale,
            "MockCamera opened"
        );
        Ok(())
    }

    fn capture(&mut self) -> Result<Frame, CameraError> {
        let config = self.config.as_ref().ok_or(CameraError::NotInitialized)?;
        let format = config.pixel_format();
        let channels = format.channels();

        let (width, height) = (config.width as usize, config.height as usize);
        let mut pixels = Vec::with_capacity(width * height * channels);
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    let v = (x * 255 / width.max(1)) ^ (y * 255 / height.max(1));
                    pixels.push(((v as u64 + self.sequence + c as u64 * 85) % 256) as u8);
                }
            }
        }

        self.sequence += 1;
        Ok(Frame::new(
            pixels,
            config.width,
            config.height,
            format,
            self.sequence,
        ))
    }

    fn is_open(&self) -> bool {
        self.config.is_some()
    }

    fn close(&mut self) {
        self.config = None;
        tracing::info!("MockCamera closed");
    }
}
