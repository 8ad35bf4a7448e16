//! Result and Error types for dosemap-compare

use dosemap_grid::Axis;

/// Type alias for Result<T, compare::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `dosemap-compare` crate
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum Error {
    #[error("grid operation failed")]
    GridError(#[from] dosemap_grid::Error),

    #[error("slice operation failed: {0}")]
    UtilsError(#[from] dosemap_utils::Error),

    #[error("fields have different shapes (expected {expected:?}, found {found:?})")]
    ShapeMismatch {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("profiles have different lengths (expected {expected}, found {found})")]
    ProfileMismatch { expected: usize, found: usize },

    #[error("no {axis} lane at bin index {index}")]
    LaneOutOfRange { axis: Axis, index: usize },

    #[error("ring radii must be finite and strictly increasing")]
    UnsortedRadii,
}
