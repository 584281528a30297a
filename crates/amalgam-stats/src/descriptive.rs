/// Descriptive statistics summarizing a sample.
///
/// This structure contains the measures of central tendency and dispersion
/// used by the two-sample tests and by the unweighted summary fallback.
/// Variance uses the `n - 1` (sample) denominator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescriptiveStats {
    /// Number of observations.
    pub count: usize,
    /// The arithmetic mean of the sample.
    pub mean: f64,
    /// The sample variance (`n - 1` denominator). `NaN` for a single observation.
    pub variance: f64,
    /// The sample standard deviation.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from a sample.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the sample contains at least one value
    /// * `None` - if the sample is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use amalgam_stats::descriptive::DescriptiveStats;
    /// let stats = DescriptiveStats::new([5.0, 2.0, 4.0, 1.0, 3.0]).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.variance, 2.5);
    /// ```
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values = values.into_iter().collect::<Vec<_>>();
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let n = count as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = if count < 2 {
            f64::NAN
        } else {
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
        };

        Some(Self {
            count,
            mean,
            variance,
            std_dev: variance.sqrt(),
        })
    }

    /// Squared standard error of the mean (`variance / n`).
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn squared_standard_error(&self) -> f64 {
        self.variance / self.count as f64
    }
}
