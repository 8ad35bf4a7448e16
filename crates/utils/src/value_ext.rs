use crate::f;

/// Extends numeric primitives with the formatting used in dose reports
pub trait ValueExt {
    /// Scientific notation with a fixed mantissa precision and signed,
    /// zero-padded exponent
    ///
    /// The default `{:e}` output drops the exponent sign and padding, which
    /// makes columns of doses impossible to line up.
    ///
    /// ```rust
    /// # use dosemap_utils::ValueExt;
    /// assert_eq!(1.602e-6_f64.sci(3, 2), "1.602e-06".to_string());
    /// assert_eq!((-250.0_f64).sci(2, 2), "-2.50e+02".to_string());
    /// assert_eq!(f64::NAN.sci(2, 2), "NaN".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Signed percentage, e.g. for relative dose changes
    ///
    /// ```rust
    /// # use dosemap_utils::ValueExt;
    /// assert_eq!(12.3456_f64.percent(2), "+12.35%".to_string());
    /// assert_eq!((-4.0_f64).percent(1), "-4.0%".to_string());
    /// ```
    fn percent(&self, precision: usize) -> String;
}

impl<T: std::fmt::LowerExp + std::fmt::Display> ValueExt for T {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let formatted = f!("{:.precision$e}", &self, precision = precision);
        // NaN and inf have no exponent to pad
        let Some(split) = formatted.find('e') else {
            return formatted;
        };
        let (mantissa, exponent) = formatted.split_at(split);
        let exponent = &exponent[1..];
        let (sign, digits) = match exponent.strip_prefix('-') {
            Some(digits) => ('-', digits),
            None => ('+', exponent),
        };
        f!("{mantissa}e{sign}{digits:0>exp_pad$}")
    }

    fn percent(&self, precision: usize) -> String {
        f!("{:+.precision$}%", &self, precision = precision)
    }
}
