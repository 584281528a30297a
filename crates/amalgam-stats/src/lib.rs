//! Statistical primitives for survey biomarker analysis.
//!
//! This crate provides the numerical building blocks used by the exposure
//! analysis pipeline:
//!
//! - **Descriptive statistics**: Mean, sample variance and standard error of a sample
//! - **Weighted summaries**: Survey-weighted mean, standard deviation and 95% CI,
//!   with an explicit unweighted fallback
//! - **Welch's t-test**: Two-sample mean comparison without assuming equal variances
//! - **Weighted least squares**: Linear model fitting with per-row weights
//! - **Type-II ANOVA**: Per-term F tests for weighted main-effects models
//! - **Significance**: Rounding and the fixed 0.05 significance threshold
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for a single sample
//! - [`weighted`]: Survey-weighted summaries
//! - [`ttest`]: Welch's unequal-variance t-test
//! - [`regression`]: Weighted least squares
//! - [`anova`]: Type-II variance decomposition
//! - [`significance`]: Rounding and significance flags
//!
//! # Examples
//!
//! ## Summarizing a weighted sample
//!
//! ```
//! use amalgam_stats::weighted::WeightedSummary;
//!
//! let pairs = [(2.0, 10_000.0), (4.0, 30_000.0)];
//! let summary = WeightedSummary::new(&pairs).unwrap().rounded(3);
//! assert_eq!(summary.mean, 3.5);
//! ```
//!
//! ## Comparing two groups
//!
//! ```
//! use amalgam_stats::{significance::is_significant, ttest::WelchTTest};
//!
//! let none = [1.9, 2.1, 2.0, 2.2, 1.8];
//! let high = [3.1, 2.9, 3.3, 3.0, 2.7];
//! let test = WelchTTest::new(&none, &high).unwrap();
//! assert!(is_significant(test.p_value));
//! ```

pub mod anova;
pub mod descriptive;
pub mod regression;
pub mod significance;
pub mod ttest;
pub mod weighted;
