//! Camera input and frame handling.
//!
//! The camera is an external collaborator: the rest of the crate only needs
//! "give me one frame" and "encode it as PNG". The device itself is owned by
//! a [`ScopedCamera`] so it is released on every exit path.

mod camera;
mod config;
#[cfg(feature = "camera")]
mod device;
mod encode;
mod frame;
mod scoped;

pub use camera::{Camera, CameraError, MockCamera};
pub use config::{CaptureConfig, ConfigError};
#[cfg(feature = "camera")]
pub use device::DeviceCamera;
pub use encode::{encode_png, EncodeError};
pub use frame::{Frame, PixelFormat};
pub use scoped::ScopedCamera;
