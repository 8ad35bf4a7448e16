use serde::{Deserialize, Serialize};

/// Grid axes, i.e. `X`, `Y`
///
/// Grids are stored with `X` as the slow (first) index and `Y` as the fast
/// (second) index, matching the `[nx, ny]` layout of the deposition
/// histograms.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// First grid index, horizontal in dose maps
    X,
    /// Second grid index, vertical in dose maps
    Y,
}

impl Axis {
    /// The other axis of the plane
    ///
    /// ```rust
    /// # use dosemap_grid::Axis;
    /// assert_eq!(Axis::X.other(), Axis::Y);
    /// assert_eq!(Axis::Y.other(), Axis::X);
    /// ```
    pub const fn other(&self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Profile naming, i.e. 'horizontal' for `X` and 'vertical' for `Y`
    pub fn profile_name(&self) -> &str {
        match self {
            Axis::X => "horizontal",
            Axis::Y => "vertical",
        }
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
        }
    }
}
