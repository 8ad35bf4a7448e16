//! Result and Error types for dosemap-analysis

/// Type alias for Result<T, analysis::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `dosemap-analysis` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("grid operation failed")]
    GridError(#[from] dosemap_grid::Error),

    #[error("comparison failed")]
    CompareError(#[from] dosemap_compare::Error),

    #[error("failed to parse configuration")]
    JsonError(#[from] serde_json::Error),

    #[error("case \"{0}\" not found in configuration")]
    CaseNotFound(String),

    #[error("case \"{0}\" is defined more than once")]
    DuplicateCase(String),
}
