//! Grids, material density maps, dose conversion and grid alignment
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod align;
mod axis;
mod density_map;
mod dose;
mod error;
mod grid;
mod material;
mod region;

// inline the core data types for a nice public API
#[doc(inline)]
pub use grid::{uniform_edges, Grid, HistogramSource};

#[doc(inline)]
pub use axis::Axis;

#[doc(inline)]
pub use region::{Region, Shape, Side};

#[doc(inline)]
pub use material::{density, MaterialRegion, MaterialSpec};

#[doc(inline)]
pub use density_map::{build_density_map, DensityMap};

#[doc(inline)]
pub use dose::{
    energy_to_dose, voxel_volume_cm3, DoseConverter, DoseGrid, EnergyUnit,
    DEFAULT_VOXEL_VOLUME_CM3, EV_TO_GRAY, KEV_TO_GRAY, MEV_TO_GRAY,
};

#[doc(inline)]
pub use align::{align, alignment_strategy, Alignment, EXTENT_TOLERANCE};

#[doc(inline)]
pub use error::{Error, Result};
