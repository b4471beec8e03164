//! Error types for objfind.

use thiserror::Error;

/// Result alias for objfind operations.
pub type ObjFindResult<T> = std::result::Result<T, ObjFindError>;

/// Errors that can occur when building inputs or running the matchers.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ObjFindError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A raw buffer shape is neither `[h, w]` nor `[h, w, 3]`.
    #[error("invalid raster shape {shape:?}: expected [h, w] or [h, w, 3]")]
    InvalidShape { shape: Vec<usize> },
    /// Width or height is zero or overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the shape requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region does not fit inside the image.
    #[error("region {width}x{height} at ({x}, {y}) exceeds image {img_width}x{img_height}")]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The template cannot produce a meaningful score.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// Image decoding, encoding or filesystem failure.
    #[error("image io failed: {reason}")]
    ImageIo { reason: String },
    /// Label document could not be parsed.
    #[error("xml parse failed: {reason}")]
    Xml { reason: String },
}
