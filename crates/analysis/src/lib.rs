//! Configuration and case comparison pipeline for dose heterogeneity studies
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod config;
mod error;
mod pipeline;

#[doc(inline)]
pub use config::{AnalysisConfig, ProfileRequest, INSERT_CENTER_X, INSERT_SIZE, RING_RADII};

#[doc(inline)]
pub use pipeline::{
    compare_case, compare_named_case, compose_regions, CaseReport, ProfileComparison,
};

#[doc(inline)]
pub use error::{Error, Result};
