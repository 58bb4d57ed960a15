//! Error types for rendering operations.

use thiserror::Error;

/// Result type alias for rendering operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Rendering error types.
///
/// All of them are caller mistakes and are detected before any pixel is
/// written.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Width or height is zero, or the buffer size overflows `u32`.
    #[error("invalid dimension: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Plane bounds are degenerate, inverted or not finite.
    #[error("invalid region: real [{real_min}, {real_max}], imag [{imag_min}, {imag_max}]")]
    InvalidRegion {
        real_min: f64,
        real_max: f64,
        imag_min: f64,
        imag_max: f64,
    },

    /// Buffer too small for the raster.
    #[error("buffer too small: need {required} bytes, got {provided}")]
    BufferTooSmall { required: usize, provided: usize },

    /// The iteration depth must be at least one.
    #[error("invalid iteration depth: 0")]
    InvalidIterationDepth,

    /// The address was not handed out by `create_array`, or was already freed.
    #[error("unknown buffer at address 0x{address:x}")]
    UnknownBuffer { address: usize },

    /// No coloring scheme with this index or name.
    #[error("unknown coloring: {0}")]
    UnknownColoring(String),
}

impl Error {
    /// Status code reported across the raw ABI. Zero is reserved for success.
    pub fn code(&self) -> u32 {
        match self {
            Error::InvalidDimension { .. } => 1,
            Error::InvalidRegion { .. } => 2,
            Error::BufferTooSmall { .. } => 3,
            Error::InvalidIterationDepth => 4,
            Error::UnknownBuffer { .. } => 5,
            Error::UnknownColoring(_) => 6,
        }
    }

    /// Short label, used in log output.
    pub fn category(&self) -> &'static str {
        match self {
            Error::InvalidDimension { .. } => "invalid_dimension",
            Error::InvalidRegion { .. } => "invalid_region",
            Error::BufferTooSmall { .. } => "buffer_too_small",
            Error::InvalidIterationDepth => "invalid_iteration_depth",
            Error::UnknownBuffer { .. } => "unknown_buffer",
            Error::UnknownColoring(_) => "unknown_coloring",
        }
    }
}
