//! Weighted least squares
//!
//! Solves `min Σ wᵢ (yᵢ - xᵢβ)²` by scaling each row with `sqrt(wᵢ)` and
//! solving the ordinary least-squares problem through an SVD. Rank is judged
//! with the usual `σ_max · max(n, p) · ε` tolerance.

use nalgebra::{DMatrix, DVector};

/// Errors raised while fitting a linear model.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum FitError {
    #[display("dimension mismatch: {rows} design rows, {responses} responses, {weights} weights")]
    DimensionMismatch {
        rows: usize,
        responses: usize,
        weights: usize,
    },
    #[display("weight at row {row} is negative or not finite")]
    InvalidWeight { row: usize },
    #[display("no residual degrees of freedom ({observations} observations, {parameters} parameters)")]
    NoResidualDegreesOfFreedom {
        observations: usize,
        parameters: usize,
    },
    #[display("design matrix is rank deficient (rank {rank} < {columns} columns)")]
    RankDeficient { rank: usize, columns: usize },
    #[display("least squares solve failed: {reason}")]
    Solve { reason: &'static str },
}

/// A fitted weighted least-squares model.
#[derive(Debug, Clone)]
pub struct WeightedLeastSquares {
    pub coefficients: DVector<f64>,
    /// Weighted residual sum of squares `Σ wᵢ eᵢ²`.
    pub residual_sum_of_squares: f64,
    pub observations: usize,
    pub parameters: usize,
}

impl WeightedLeastSquares {
    /// Fits `response ~ design` with per-row `weights`.
    ///
    /// The design must already contain an intercept column if one is wanted.
    /// Rank-deficient designs are rejected rather than solved by
    /// pseudo-inverse, so that every coefficient is identifiable.
    pub fn fit(
        design: &DMatrix<f64>,
        response: &[f64],
        weights: &[f64],
    ) -> Result<Self, FitError> {
        let (observations, parameters) = design.shape();
        if response.len() != observations || weights.len() != observations {
            return Err(FitError::DimensionMismatch {
                rows: observations,
                responses: response.len(),
                weights: weights.len(),
            });
        }
        if let Some(row) = weights.iter().position(|w| !w.is_finite() || *w < 0.0) {
            return Err(FitError::InvalidWeight { row });
        }
        if observations <= parameters {
            return Err(FitError::NoResidualDegreesOfFreedom {
                observations,
                parameters,
            });
        }

        let sqrt_weights = weights.iter().map(|w| w.sqrt()).collect::<Vec<_>>();
        let weighted_design =
            DMatrix::from_fn(observations, parameters, |i, j| design[(i, j)] * sqrt_weights[i]);
        let weighted_response = DVector::from_iterator(
            observations,
            response.iter().zip(&sqrt_weights).map(|(y, w)| y * w),
        );

        let svd = weighted_design.clone().svd(true, true);
        let max_singular = svd.singular_values.iter().copied().fold(0.0, f64::max);
        #[expect(clippy::cast_precision_loss)]
        let tolerance = max_singular * observations.max(parameters) as f64 * f64::EPSILON;
        let rank = svd.singular_values.iter().filter(|s| **s > tolerance).count();
        if rank < parameters {
            return Err(FitError::RankDeficient {
                rank,
                columns: parameters,
            });
        }

        let coefficients = svd
            .solve(&weighted_response, tolerance)
            .map_err(|reason| FitError::Solve { reason })?;
        let residuals = &weighted_response - &weighted_design * &coefficients;

        Ok(Self {
            coefficients,
            residual_sum_of_squares: residuals.norm_squared(),
            observations,
            parameters,
        })
    }

    /// Residual degrees of freedom (`n - p`).
    #[must_use]
    pub fn residual_degrees_of_freedom(&self) -> usize {
        self.observations - self.parameters
    }
}
