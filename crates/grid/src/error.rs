//! Result and Error types for dosemap-grid

use crate::axis::Axis;

/// Type alias for Result<T, grid::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `dosemap-grid` crate
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("slice operation failed: {0}")]
    UtilsError(#[from] dosemap_utils::Error),

    #[error("inconsistent grid shape (expected {expected:?}, found {found:?})")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("{axis} edges are not finite and strictly increasing")]
    NonMonotonicEdges { axis: Axis },

    #[error("{axis} axis needs at least 2 edges to define a bin (found {found})")]
    TooFewEdges { axis: Axis, found: usize },

    #[error("density of \"{material}\" must be positive and finite (found {density})")]
    InvalidDensity { material: String, density: f64 },

    #[error("voxel volume must be positive and finite (found {0} cm3)")]
    InvalidVolume(f64),

    #[error("energy to dose factor must be positive and finite (found {0})")]
    InvalidConversionFactor(f64),

    #[error("region \"{name}\" is malformed: {reason}")]
    InvalidRegion { name: String, reason: String },

    #[error("unsupported geometry for alignment: {0}")]
    UnsupportedGeometry(String),
}
