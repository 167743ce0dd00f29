//! Error types for camfilter.

use thiserror::Error;

/// Result alias for camfilter operations.
pub type CamFilterResult<T> = std::result::Result<T, CamFilterError>;

/// Errors that can occur while building frames, filters and detectors.
///
/// Per-frame tracking outcomes are never reported through this type; see
/// [`crate::detect::Transition`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CamFilterError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The row stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// The backing buffer is shorter than the declared shape requires.
    #[error("buffer too small: needed {needed} elements, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Tone-curve control points are unusable.
    #[error("invalid curve: {reason}")]
    InvalidCurve { reason: &'static str },
    /// A reference or frame image could not be read, decoded or written.
    #[error("image io failed: {reason}")]
    ImageIo { reason: String },
}
