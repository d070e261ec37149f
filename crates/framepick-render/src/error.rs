//! Rendering error types.

use thiserror::Error;

/// Errors that can occur during rendering operations.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// Reading pixels back from a GPU texture failed.
    #[error("pixel readback failed: {0}")]
    ReadbackFailed(String),

    /// Image encoding failed.
    #[error("image encoding failed: {0}")]
    ImageEncodingFailed(#[from] image::ImageError),

    /// Pixel data did not match the expected image dimensions.
    #[error("invalid image data")]
    InvalidImageData,

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
