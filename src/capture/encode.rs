//! PNG encoding of captured frames.

use super::{Frame, PixelFormat};
use image::{codecs::png::PngEncoder, ColorType, ImageEncoder};
use thiserror::Error;

/// Errors that can occur while encoding a frame.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel buffer length does not match the frame dimensions.
    #[error("frame buffer holds {got} bytes, expected {expected}")]
    InvalidFrame {
        /// Actual buffer length.
        got: usize,
        /// Length implied by width, height and format.
        expected: usize,
    },
    /// The PNG encoder failed.
    #[error("failed to encode frame as PNG: {0}")]
    Png(#[from] image::ImageError),
}

/// Encodes `frame` as a PNG file image.
pub fn encode_png(frame: &Frame) -> Result<Vec<u8>, EncodeError> {
    if !frame.is_valid() {
        return Err(EncodeError::InvalidFrame {
            got: frame.pixels().len(),
            expected: frame.expected_len(),
        });
    }

    let color = match frame.format() {
        PixelFormat::Gray => ColorType::L8,
        PixelFormat::Rgb => ColorType::Rgb8,
    };

    let mut out = Vec::new();
    PngEncoder::new(&mut out).write_image(frame.pixels(), frame.width(), frame.height(), color)?;
    Ok(out)
}
