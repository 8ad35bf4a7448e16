//! Difference, ratio and regional comparison of dose fields
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod aggregate;
mod composition;
mod error;
mod field;
mod profile;

#[doc(inline)]
pub use field::{compare, difference, percent_difference, ratio, ComparisonResult, FieldSummary};

#[doc(inline)]
pub use aggregate::{
    aggregate, aggregate_all, mask, radial_aggregate, rings, AggregateStatus, RegionAggregate,
};

#[doc(inline)]
pub use composition::{composition, composition_all, RegionComposition, COMPOSITION_TOLERANCE};

#[doc(inline)]
pub use profile::{integrated_profile, line_profile, profile_ratio, symmetry, Profile, Symmetry};

#[doc(inline)]
pub use error::{Error, Result};

// Regions are the selectors for everything in here
#[doc(no_inline)]
pub use dosemap_grid::{Region, Shape, Side};
