use crate::f;
use crate::value_ext::ValueExt;

/// Extends optional report values for display
pub trait OptionExt {
    /// The contained value, or "none" for the `None` variant
    ///
    /// ```rust
    /// # use dosemap_utils::OptionExt;
    /// assert_eq!(Some(2).display(), "2");
    /// assert_eq!(None::<u32>.display(), "none");
    /// ```
    fn display(&self) -> String;

    /// The contained value in scientific notation, or "none"
    ///
    /// ```rust
    /// # use dosemap_utils::OptionExt;
    /// assert_eq!(Some(1500.0).display_sci(2), "1.50e+03");
    /// assert_eq!(None::<f64>.display_sci(2), "none");
    /// ```
    fn display_sci(&self, precision: usize) -> String;
}

impl<T: std::fmt::Display + std::fmt::LowerExp> OptionExt for Option<T> {
    fn display(&self) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => "none".to_string(),
        }
    }

    fn display_sci(&self, precision: usize) -> String {
        match self {
            Some(value) => value.sci(precision, 2),
            None => "none".to_string(),
        }
    }
}
