//! Error types for the slam-geometry library
//!
//! This module provides the main error and result types used throughout the library.
//! All errors use the `thiserror` crate for automatic trait implementations.
//!
//! Every variant except [`GeometryError::Numerical`] is a contract violation:
//! the caller handed in data that cannot be interpreted without guessing, and the
//! operation refuses to produce a partial result.

use thiserror::Error;

/// Main result type used throughout the slam-geometry library
pub type GeometryResult<T> = Result<T, GeometryError>;

/// Main error type for the slam-geometry library
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Scan record width is not one of the supported encodings (2, 3, 4 or 6 floats)
    #[error("Invalid scan record width: {width} (expected 2, 3, 4 or 6)")]
    InvalidScanWidth { width: usize },

    /// Scan buffer length is not a whole number of records
    #[error("Scan buffer of {len} floats is not a multiple of record width {width}")]
    ScanLengthMismatch { len: usize, width: usize },

    /// Index subset refers past the end of the cloud
    #[error("Index {index} out of bounds for cloud of {len} points")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Correspondence sets of different sizes
    #[error("Correspondence sets differ in length: reference {reference}, estimate {estimate}")]
    CorrespondenceMismatch { reference: usize, estimate: usize },

    /// Rotation block is not orthonormal with determinant +1
    #[error("Rotation block is not a proper rotation (deviation {deviation:.3e})")]
    InvalidRotation { deviation: f64 },

    /// ENU conversion requested without a local origin
    #[error("Local ENU frame requested but no geodetic origin is configured")]
    MissingOrigin,

    /// Numerical failure inside a decomposition
    #[error("Numerical error: {0}")]
    Numerical(String),

    /// Configuration value outside its valid range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GeometryError {
    /// True for errors caused by malformed caller input rather than numerics.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, GeometryError::Numerical(_))
    }
}
