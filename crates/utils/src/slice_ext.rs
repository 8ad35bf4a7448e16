use crate::error::{Error, Result};

/// Extends functionality for slices of float arrays
pub trait SliceExt<T> {
    /// Find the minimum value in float arrays
    ///
    /// Only provides the minimum value from a collection of valid numbers. Any
    /// NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use dosemap_utils::SliceExt;
    /// # use dosemap_utils::Error;
    /// // Successful cases
    /// assert_eq!([1.1, 0.5, 2.2].try_min(), Ok(0.5));
    /// assert_eq!([1.1, f64::MIN, 2.2].try_min(), Ok(f64::MIN));
    ///
    /// // Error cases
    /// assert_eq!([1.1, f64::NAN, 2.2].try_min(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!([1.1, f64::INFINITY, 2.2].try_min(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!(Vec::<f64>::new().try_min(), Err(Error::SliceContainsNoValues));
    /// ```
    ///
    /// The float primitives do not implement `Ord` due to `NaN` being
    /// incomparable. This extension uses `total_cmp` to always produce an
    /// ordering in accordance to the totalOrder predicate as defined in the
    /// IEEE 754 (2008 revision) floating point standard.
    fn try_min(&self) -> Result<T>;

    /// Find the maximum value in float arrays
    ///
    /// Only provides the maximum value from a collection of valid numbers. Any
    /// NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use dosemap_utils::SliceExt;
    /// # use dosemap_utils::Error;
    /// // Successful cases
    /// assert_eq!([1.1, 0.5, 2.2].try_max(), Ok(2.2));
    /// assert_eq!([1.1, f64::MAX, 2.2].try_max(), Ok(f64::MAX));
    ///
    /// // Error cases
    /// assert_eq!([1.1, f64::NAN, 2.2].try_max(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!(Vec::<f64>::new().try_max(), Err(Error::SliceContainsNoValues));
    /// ```
    fn try_max(&self) -> Result<T>;

    /// Check that every value is finite and strictly greater than the last
    ///
    /// Bin edges must satisfy this before they can be searched. Fewer than two
    /// values are trivially increasing.
    ///
    /// ```rust
    /// # use dosemap_utils::SliceExt;
    /// assert!([0.0, 1.0, 2.5].is_strictly_increasing());
    /// assert!(![0.0, 1.0, 1.0].is_strictly_increasing());
    /// assert!(![0.0, f64::NAN, 2.0].is_strictly_increasing());
    /// ```
    fn is_strictly_increasing(&self) -> bool;

    /// Find the index of the bin containing 'value', clamped to the edges
    ///
    /// For bin edges `e[0..=n]` this returns `k` such that
    /// `e[k] <= value < e[k+1]`. Values below the first edge give `0`, and
    /// values at or above the last edge give `n`, i.e. one past the last bin.
    /// This makes the result usable directly as either end of a half-open
    /// index range.
    ///
    /// A value exactly on an edge `e[k]` always maps to `k`.
    ///
    /// ```rust
    /// # use dosemap_utils::SliceExt;
    /// let edges = vec![0.0, 1.0, 2.0, 3.0, 4.0];
    ///
    /// assert_eq!(edges.find_bin_floor(2.0), 2);
    /// assert_eq!(edges.find_bin_floor(2.5), 2);
    /// assert_eq!(edges.find_bin_floor(4.0), 4);
    ///
    /// // Values outside the edges are clamped rather than rejected
    /// assert_eq!(edges.find_bin_floor(-3.0), 0);
    /// assert_eq!(edges.find_bin_floor(10.0), 4);
    /// ```
    fn find_bin_floor(&self, value: T) -> usize;

    /// Find the index of the value nearest to 'value'
    ///
    /// Equidistant candidates resolve to the lower index.
    ///
    /// ```rust
    /// # use dosemap_utils::SliceExt;
    /// let centers = vec![0.5, 1.5, 2.5, 3.5];
    ///
    /// assert_eq!(centers.find_nearest(1.4), Ok(1));
    /// assert_eq!(centers.find_nearest(2.0), Ok(1));
    /// assert_eq!(centers.find_nearest(-10.0), Ok(0));
    /// assert!(Vec::<f64>::new().find_nearest(1.0).is_err());
    /// ```
    fn find_nearest(&self, value: T) -> Result<usize>;

    /// Midpoints between consecutive values, i.e. bin centers from bin edges
    ///
    /// ```rust
    /// # use dosemap_utils::SliceExt;
    /// assert_eq!([0.0, 1.0, 3.0].midpoints(), vec![0.5, 2.0]);
    /// assert!([1.0].midpoints().is_empty());
    /// ```
    fn midpoints(&self) -> Vec<T>;

    /// Piecewise linear interpolation of `samples` taken at the positions in
    /// `self`
    ///
    /// Positions must be increasing. Points outside the sampled range take the
    /// value of the nearest end sample, so no extrapolation happens.
    ///
    /// ```rust
    /// # use dosemap_utils::SliceExt;
    /// let positions = [0.0, 1.0, 2.0];
    /// let samples = [10.0, 20.0, 40.0];
    ///
    /// assert_eq!(positions.interpolate_linear(&samples, 0.5), Ok(15.0));
    /// assert_eq!(positions.interpolate_linear(&samples, 1.5), Ok(30.0));
    ///
    /// // Clamped at the ends
    /// assert_eq!(positions.interpolate_linear(&samples, -1.0), Ok(10.0));
    /// assert_eq!(positions.interpolate_linear(&samples, 5.0), Ok(40.0));
    /// ```
    fn interpolate_linear(&self, samples: &[T], at: T) -> Result<T>;
}

impl SliceExt<f64> for [f64] {
    fn try_min(&self) -> Result<f64> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        if let Some(v) = self.iter().min_by(|a, b| a.total_cmp(b)).copied() {
            Ok(v)
        } else {
            Err(Error::SliceContainsNoValues)
        }
    }

    fn try_max(&self) -> Result<f64> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        if let Some(v) = self.iter().max_by(|a, b| a.total_cmp(b)).copied() {
            Ok(v)
        } else {
            Err(Error::SliceContainsNoValues)
        }
    }

    fn is_strictly_increasing(&self) -> bool {
        self.iter().all(|v| v.is_finite()) && self.windows(2).all(|w| w[0] < w[1])
    }

    fn find_bin_floor(&self, value: f64) -> usize {
        if self.len() < 2 {
            return 0;
        }

        // number of edges at or below the value, less one for the bin index
        let idx = self.partition_point(|edge| *edge <= value).saturating_sub(1);
        idx.min(self.len() - 1)
    }

    fn find_nearest(&self, value: f64) -> Result<usize> {
        if self.is_empty() {
            return Err(Error::SliceContainsNoValues);
        }

        if !value.is_finite() {
            return Err(Error::SliceContainsUndefinedValues);
        }

        // strict comparison keeps the first of any equidistant candidates
        let mut nearest = 0;
        let mut best = (self[0] - value).abs();
        for (idx, v) in self.iter().enumerate().skip(1) {
            let distance = (v - value).abs();
            if distance < best {
                best = distance;
                nearest = idx;
            }
        }

        Ok(nearest)
    }

    fn midpoints(&self) -> Vec<f64> {
        self.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }

    fn interpolate_linear(&self, samples: &[f64], at: f64) -> Result<f64> {
        if self.len() != samples.len() {
            return Err(Error::MismatchedSliceLength {
                expected: self.len(),
                found: samples.len(),
            });
        }

        let n = self.len();
        if n == 0 {
            return Err(Error::SliceContainsNoValues);
        }

        // clamp to the end samples
        if n == 1 || at <= self[0] {
            return Ok(samples[0]);
        }
        if at >= self[n - 1] {
            return Ok(samples[n - 1]);
        }

        // at this point self[0] < at < self[n-1], so 1 <= upper <= n-1
        let upper = self.partition_point(|p| *p <= at);
        let lower = upper - 1;

        let (x0, x1) = (self[lower], self[upper]);
        let (y0, y1) = (samples[lower], samples[upper]);
        let t = (at - x0) / (x1 - x0);

        Ok(y0 + t * (y1 - y0))
    }
}
