//! Error types for toolpath transformation.

use std::path::PathBuf;
use thiserror::Error;

/// Error classes for toolpath processing.
///
/// Line-local parse issues ([`ErrorClass::MalformedCommand`]) are tolerated:
/// the offending line passes through unmodified and the run continues.
/// Geometry and layer errors would corrupt every subsequent line, so they
/// abort the transform before the write pass starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// An axis token was present but not parseable as a number.
    MalformedCommand,
    /// Geometry that would produce NaN/Inf or negative flow in the output.
    DegenerateGeometry,
    /// Fewer than 2 layer markers; angle scheduling has no basis.
    InsufficientLayers,
    /// File system problem on an input path.
    Io,
}

/// Main error type for toolpath transformation.
#[derive(Debug, Error)]
pub enum PipebendError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("empty file: {path}")]
    EmptyFile { path: PathBuf },

    #[error("insufficient layers: found {found} layer marker(s), need at least 2")]
    InsufficientLayers { found: usize },

    #[error("degenerate geometry: total layer height is zero")]
    ZeroTotalHeight,

    #[error(
        "degenerate geometry: inner radius {inner} is not positive at x={x} \
         (pipe radius {pipe_radius}); rotation axis at or beyond the extrusion point"
    )]
    NonPositiveInnerRadius {
        x: f64,
        pipe_radius: f64,
        inner: f64,
    },

    #[error("degenerate geometry: toolpath has zero bounding-box extent in X and Y")]
    ZeroBoundingBox,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipebendError {
    /// Get the error class for this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            PipebendError::FileNotFound { .. }
            | PipebendError::EmptyFile { .. }
            | PipebendError::Io(_) => ErrorClass::Io,
            PipebendError::InsufficientLayers { .. } => ErrorClass::InsufficientLayers,
            PipebendError::ZeroTotalHeight
            | PipebendError::NonPositiveInnerRadius { .. }
            | PipebendError::ZeroBoundingBox => ErrorClass::DegenerateGeometry,
        }
    }
}

/// Result type alias for transformation operations.
pub type Result<T> = std::result::Result<T, PipebendError>;
