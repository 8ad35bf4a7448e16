//! Result and Error types for the utils module

/// Type alias for `Result<T, utils::Error>`
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, PartialEq)]
/// The error type for `dosemap_utils`
pub enum Error {
    /// An empty slice of floats for SliceExt
    SliceContainsNoValues,

    /// The slice of float values contains things like NAN or INFINITY
    SliceContainsUndefinedValues,

    /// For when a slice has fewer than the minimum required values
    BelowMinimumSliceLength {
        length: usize,
        minimum_required: usize,
    },

    /// Paired slices (e.g. sample positions and sample values) differ in length
    MismatchedSliceLength { expected: usize, found: usize },
}

impl core::fmt::Display for Error {
    fn fmt(&self, fmt: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self {
            Error::SliceContainsNoValues => write!(fmt, "slice is empty"),
            Error::SliceContainsUndefinedValues => {
                write!(fmt, "slice contains NaN or infinite values")
            }
            Error::BelowMinimumSliceLength {
                length,
                minimum_required,
            } => write!(
                fmt,
                "slice of {length} values is too short (at least {minimum_required} required)"
            ),
            Error::MismatchedSliceLength { expected, found } => write!(
                fmt,
                "paired slices differ in length (expected {expected}, found {found})"
            ),
        }
    }
}

// implement standard error trait to use with ? operator
impl std::error::Error for Error {}
