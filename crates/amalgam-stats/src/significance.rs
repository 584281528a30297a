//! Rounding and significance helpers shared by every result table.

/// Threshold below which a p-value is reported as significant.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Rounds `value` to `decimals` decimal places.
///
/// Non-finite values are returned unchanged.
///
/// # Examples
///
/// ```
/// use amalgam_stats::significance::round_to;
///
/// assert_eq!(round_to(1.23456, 3), 1.235);
/// assert_eq!(round_to(0.000_014, 5), 0.00001);
/// assert!(round_to(f64::NAN, 3).is_nan());
/// ```
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10_f64.powi(decimals);
    (value * scale).round() / scale
}

/// Returns `true` iff `p_value` is strictly below [`SIGNIFICANCE_LEVEL`].
///
/// `NaN` is never significant.
///
/// # Examples
///
/// ```
/// use amalgam_stats::significance::is_significant;
///
/// assert!(is_significant(0.04999));
/// assert!(!is_significant(0.05));
/// assert!(!is_significant(f64::NAN));
/// ```
#[must_use]
pub fn is_significant(p_value: f64) -> bool {
    p_value < SIGNIFICANCE_LEVEL
}
