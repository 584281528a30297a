//! Welch's unequal-variance two-sample t-test

use statrs::distribution::{ContinuousCDF as _, StudentsT};

use crate::descriptive::DescriptiveStats;

/// Result of a two-sided Welch t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WelchTTest {
    /// `(mean_a - mean_b) / sqrt(var_a / n_a + var_b / n_b)`
    pub statistic: f64,
    /// Welch–Satterthwaite degrees of freedom.
    pub degrees_of_freedom: f64,
    /// Two-sided p-value.
    pub p_value: f64,
}

impl WelchTTest {
    /// Runs the test on two independent samples.
    ///
    /// Returns `None` if either sample has fewer than two observations.
    /// When both samples have zero variance and equal means the statistic and
    /// p-value are `NaN`. With different means the statistic is infinite and
    /// the p-value is 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use amalgam_stats::ttest::WelchTTest;
    ///
    /// let a = [1.0, 2.0, 3.0, 4.0, 5.0];
    /// let b = [6.0, 7.0, 8.0, 9.0, 10.0];
    /// let test = WelchTTest::new(&a, &b).unwrap();
    /// assert_eq!(test.statistic, -5.0);
    /// assert_eq!(test.degrees_of_freedom, 8.0);
    /// assert!(test.p_value < 0.01);
    /// ```
    #[must_use]
    pub fn new(a: &[f64], b: &[f64]) -> Option<Self> {
        let a = DescriptiveStats::new(a.iter().copied())?;
        let b = DescriptiveStats::new(b.iter().copied())?;
        if a.count < 2 || b.count < 2 {
            return None;
        }

        let se_a = a.squared_standard_error();
        let se_b = b.squared_standard_error();
        let se = se_a + se_b;
        let statistic = (a.mean - b.mean) / se.sqrt();
        #[expect(clippy::cast_precision_loss)]
        let degrees_of_freedom = se.powi(2)
            / (se_a.powi(2) / (a.count as f64 - 1.0) + se_b.powi(2) / (b.count as f64 - 1.0));

        Some(Self {
            statistic,
            degrees_of_freedom,
            p_value: two_sided_p_value(statistic, degrees_of_freedom),
        })
    }
}

fn two_sided_p_value(statistic: f64, degrees_of_freedom: f64) -> f64 {
    if statistic.is_nan() {
        return f64::NAN;
    }
    if statistic.is_infinite() {
        return 0.0;
    }
    match StudentsT::new(0.0, 1.0, degrees_of_freedom) {
        Ok(dist) => (2.0 * dist.sf(statistic.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}
