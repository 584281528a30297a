//! Survey-weighted summary statistics
//!
//! A [`WeightedSummary`] describes one marker within one population slice:
//! weighted mean, weighted standard deviation about that mean, and a normal
//! approximation 95% confidence interval.
//!
//! ```text
//! mean     = Σ w·x / Σ w
//! variance = Σ w·(x - mean)² / Σ w
//! CI       = mean ± 1.96 · sqrt(variance) / sqrt(n)
//! ```
//!
//! When the weights cannot be used (zero, negative or non-finite total), the
//! summary falls back to the unweighted mean and sample variance and records
//! that in [`SummaryMethod`].

use crate::descriptive::DescriptiveStats;

/// Two-sided 95% normal quantile.
pub const Z_95: f64 = 1.96;

/// How a summary was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SummaryMethod {
    /// Survey weights were applied.
    #[display("weighted")]
    Weighted,
    /// Weights were unusable; plain sample statistics were used instead.
    #[display("unweighted")]
    Unweighted,
}

/// Weighted mean, standard deviation and confidence interval of a sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedSummary {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    /// Number of rows that entered the computation.
    pub sample_size: usize,
    pub method: SummaryMethod,
}

impl WeightedSummary {
    /// Summarizes `(value, weight)` pairs.
    ///
    /// Pairs where either side is missing must be filtered out by the caller;
    /// see [`WeightedSummary::from_optional_pairs`].
    ///
    /// # Returns
    ///
    /// `None` if `pairs` is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use amalgam_stats::weighted::{SummaryMethod, WeightedSummary};
    ///
    /// let summary = WeightedSummary::new(&[(1.0, 1.0), (3.0, 3.0)]).unwrap();
    /// assert_eq!(summary.mean, 2.5);
    /// assert_eq!(summary.method, SummaryMethod::Weighted);
    /// assert_eq!(summary.sample_size, 2);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(pairs: &[(f64, f64)]) -> Option<Self> {
        if pairs.is_empty() {
            return None;
        }

        let n = pairs.len();
        let (mean, variance, method) = match weighted_moments(pairs) {
            Some((mean, variance)) => (mean, variance, SummaryMethod::Weighted),
            None => {
                let stats = DescriptiveStats::new(pairs.iter().map(|(x, _)| *x))?;
                (stats.mean, stats.variance, SummaryMethod::Unweighted)
            }
        };

        let std_dev = variance.sqrt();
        let half_width = Z_95 * std_dev / (n as f64).sqrt();
        Some(Self {
            mean,
            std_dev,
            ci_low: mean - half_width,
            ci_high: mean + half_width,
            sample_size: n,
            method,
        })
    }

    /// Summarizes row-aligned optional values and weights, keeping only rows
    /// where both are present.
    #[must_use]
    pub fn from_optional_pairs<I>(pairs: I) -> Option<Self>
    where
        I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
    {
        let pairs = pairs
            .into_iter()
            .filter_map(|(value, weight)| Some((value?, weight?)))
            .collect::<Vec<_>>();
        Self::new(&pairs)
    }

    /// Returns a copy with every statistic rounded to `decimals` places.
    #[must_use]
    pub fn rounded(&self, decimals: i32) -> Self {
        let round = |v| crate::significance::round_to(v, decimals);
        Self {
            mean: round(self.mean),
            std_dev: round(self.std_dev),
            ci_low: round(self.ci_low),
            ci_high: round(self.ci_high),
            ..*self
        }
    }
}

/// Weighted mean and variance, or `None` when the weights are degenerate.
fn weighted_moments(pairs: &[(f64, f64)]) -> Option<(f64, f64)> {
    let total_weight = pairs.iter().map(|(_, w)| w).sum::<f64>();
    if !total_weight.is_finite() || total_weight <= 0.0 {
        return None;
    }
    let mean = pairs.iter().map(|(x, w)| x * w).sum::<f64>() / total_weight;
    let variance = pairs
        .iter()
        .map(|(x, w)| w * (x - mean).powi(2))
        .sum::<f64>()
        / total_weight;
    (mean.is_finite() && variance.is_finite()).then_some((mean, variance))
}
