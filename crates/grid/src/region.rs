//! Named geometric selectors over grid coordinates

// crate modules
use crate::axis::Axis;
use crate::error::{Error, Result};
use crate::grid::Grid;

// external crates
use itertools::iproduct;
use serde::{Deserialize, Serialize};

/// Which side of a [Shape::HalfPlane] boundary is selected
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Coordinates strictly below the boundary
    Below,
    /// Coordinates at or above the boundary
    Above,
}

/// Geometric definition of a region, all coordinates in millimetres
///
/// | Shape        | Selected points                          |
/// | ------------ | ---------------------------------------- |
/// | `Rectangle`  | `x_min <= x <= x_max && y_min <= y <= y_max` |
/// | `Annulus`    | `inner <= r < outer` around `(x0, y0)`   |
/// | `HalfPlane`  | `c < boundary` or `c >= boundary`        |
/// | `Everywhere` | every point                              |
///
/// The half-open annulus means consecutive rings never share a voxel, and the
/// two sides of a half-plane always partition the grid.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned rectangle, bounds inclusive
    Rectangle {
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
    },
    /// Ring between an inner and outer radius from a center point
    Annulus {
        x0: f64,
        y0: f64,
        inner: f64,
        outer: f64,
    },
    /// One side of a line of constant coordinate on `axis`
    HalfPlane {
        axis: Axis,
        boundary: f64,
        side: Side,
    },
    /// The whole plane
    Everywhere,
}

impl Shape {
    /// Check if the point (x, y) is part of the shape
    pub fn contains(&self, x: f64, y: f64) -> bool {
        match *self {
            Shape::Rectangle {
                x_min,
                x_max,
                y_min,
                y_max,
            } => x_min <= x && x <= x_max && y_min <= y && y <= y_max,
            Shape::Annulus {
                x0,
                y0,
                inner,
                outer,
            } => {
                let r = (x - x0).hypot(y - y0);
                inner <= r && r < outer
            }
            Shape::HalfPlane {
                axis,
                boundary,
                side,
            } => {
                let c = match axis {
                    Axis::X => x,
                    Axis::Y => y,
                };
                match side {
                    Side::Below => c < boundary,
                    Side::Above => c >= boundary,
                }
            }
            Shape::Everywhere => true,
        }
    }

    /// Short name of the shape variant
    pub fn kind(&self) -> &str {
        match self {
            Shape::Rectangle { .. } => "rectangle",
            Shape::Annulus { .. } => "annulus",
            Shape::HalfPlane { .. } => "half-plane",
            Shape::Everywhere => "everywhere",
        }
    }
}

/// A named selector over grid coordinates
///
/// Regions carry no state and are only ever used to build boolean masks over
/// the bin centers of a [Grid], or to place material overrides.
///
/// ```rust
/// # use dosemap_grid::{uniform_edges, Grid, Region};
/// let grid = Grid::filled(1.0, uniform_edges(0.0, 4.0, 4), uniform_edges(0.0, 4.0, 4)).unwrap();
///
/// // Bin centers are at 0.5, 1.5, 2.5, 3.5 on both axes
/// let insert = Region::rectangle("insert", 1.0, 3.0, 0.0, 4.0);
/// let mask = insert.mask(&grid);
///
/// assert_eq!(mask.iter().filter(|m| **m).count(), 8);
/// assert!(insert.contains(2.0, 2.0));
/// assert!(!insert.contains(3.5, 2.0));
/// ```
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Region {
    /// Label used in reports
    pub name: String,
    /// Geometric definition
    pub shape: Shape,
}

impl Region {
    /// Axis-aligned rectangle with inclusive bounds
    pub fn rectangle(name: &str, x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            name: name.to_string(),
            shape: Shape::Rectangle {
                x_min,
                x_max,
                y_min,
                y_max,
            },
        }
    }

    /// Square of side `size` centered on (x, y)
    ///
    /// Heterogeneity inserts are usually described this way, e.g. a 60 mm
    /// cube centered 40 mm from the source.
    ///
    /// ```rust
    /// # use dosemap_grid::{Region, Shape};
    /// let insert = Region::centered_square("bone", 40.0, 0.0, 60.0);
    /// assert_eq!(
    ///     insert.shape,
    ///     Shape::Rectangle { x_min: 10.0, x_max: 70.0, y_min: -30.0, y_max: 30.0 }
    /// );
    /// ```
    pub fn centered_square(name: &str, x: f64, y: f64, size: f64) -> Self {
        let half = 0.5 * size;
        Self::rectangle(name, x - half, x + half, y - half, y + half)
    }

    /// Ring of `inner <= r < outer` around (x0, y0)
    pub fn annulus(name: &str, x0: f64, y0: f64, inner: f64, outer: f64) -> Self {
        Self {
            name: name.to_string(),
            shape: Shape::Annulus {
                x0,
                y0,
                inner,
                outer,
            },
        }
    }

    /// Everything within `radius` of (x0, y0), i.e. an annulus from zero
    pub fn disc(name: &str, x0: f64, y0: f64, radius: f64) -> Self {
        Self::annulus(name, x0, y0, 0.0, radius)
    }

    /// One side of the line `axis = boundary`
    pub fn half_plane(name: &str, axis: Axis, boundary: f64, side: Side) -> Self {
        Self {
            name: name.to_string(),
            shape: Shape::HalfPlane {
                axis,
                boundary,
                side,
            },
        }
    }

    /// The whole grid
    pub fn everywhere(name: &str) -> Self {
        Self {
            name: name.to_string(),
            shape: Shape::Everywhere,
        }
    }

    /// Check if the point (x, y) in millimetres is part of the region
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.shape.contains(x, y)
    }

    /// Boolean mask over the bin centers of a grid, in flat row-major order
    pub fn mask(&self, grid: &Grid) -> Vec<bool> {
        iproduct!(grid.x_centers(), grid.y_centers())
            .map(|(x, y)| self.shape.contains(x, y))
            .collect()
    }

    /// Make sure the definition is physically meaningful
    ///
    /// Rectangles need ordered bounds, annuli need `0 <= inner <= outer`, and
    /// all coordinates must be numbers. An infinite outer radius is allowed so
    /// that "everything beyond r" can be expressed.
    ///
    /// ```rust
    /// # use dosemap_grid::Region;
    /// assert!(Region::annulus("ring", 0.0, 0.0, 2.0, 5.0).validate().is_ok());
    /// assert!(Region::annulus("ring", 0.0, 0.0, 5.0, 2.0).validate().is_err());
    /// assert!(Region::rectangle("box", 1.0, 0.0, 0.0, 1.0).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<()> {
        let reason = match self.shape {
            Shape::Rectangle {
                x_min,
                x_max,
                y_min,
                y_max,
            } => {
                if [x_min, x_max, y_min, y_max].iter().any(|v| v.is_nan()) {
                    Some("bounds must be numbers")
                } else if x_min > x_max || y_min > y_max {
                    Some("minimum bound exceeds maximum bound")
                } else {
                    None
                }
            }
            Shape::Annulus {
                x0,
                y0,
                inner,
                outer,
            } => {
                if !x0.is_finite() || !y0.is_finite() || !inner.is_finite() || outer.is_nan() {
                    Some("center and inner radius must be finite")
                } else if inner < 0.0 || inner > outer {
                    Some("radii must satisfy 0 <= inner <= outer")
                } else {
                    None
                }
            }
            Shape::HalfPlane { boundary, .. } => {
                (!boundary.is_finite()).then_some("boundary must be finite")
            }
            Shape::Everywhere => None,
        };

        match reason {
            Some(reason) => Err(Error::InvalidRegion {
                name: self.name.clone(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.shape {
            Shape::Rectangle {
                x_min,
                x_max,
                y_min,
                y_max,
            } => write!(
                f,
                "{} (x=[{x_min}, {x_max}] y=[{y_min}, {y_max}] mm)",
                self.name
            ),
            Shape::Annulus {
                x0,
                y0,
                inner,
                outer,
            } => write!(
                f,
                "{} ({inner} <= r < {outer} mm from ({x0}, {y0}))",
                self.name
            ),
            Shape::HalfPlane {
                axis,
                boundary,
                side,
            } => {
                let op = match side {
                    Side::Below => "<",
                    Side::Above => ">=",
                };
                write!(f, "{} ({axis} {op} {boundary} mm)", self.name)
            }
            Shape::Everywhere => write!(f, "{} (everywhere)", self.name),
        }
    }
}
