//! Error types for framepick-core.

use thiserror::Error;

/// The error type for pick operations.
///
/// Only genuine host faults surface here. The ambiguity cases the subsystem
/// resolves locally — encoding overflow, stale registry ids, out-of-viewport
/// cursors — never become errors; they resolve to "no object" instead.
#[derive(Error, Debug)]
pub enum PickError {
    /// The host failed to execute the encoded-color render.
    #[error("pick render failed: {0}")]
    Render(String),

    /// Reading a texel back from the pick target failed.
    #[error("pixel readback failed: {0}")]
    Readback(String),

    /// Options (de)serialization failed.
    #[error("options error: {0}")]
    Options(#[from] serde_json::Error),
}

/// A specialized Result type for pick operations.
pub type Result<T> = std::result::Result<T, PickError>;
