//! Type-II analysis of variance for weighted main-effects models
//!
//! Each term is a categorical factor, treatment-coded against its first
//! present level. For a model without interactions the type-II sum of squares
//! of a term is the increase in residual sum of squares when that term alone is
//! dropped from the full model:
//!
//! ```text
//! SS(term) = RSS(full without term) - RSS(full)
//! F        = (SS(term) / df(term)) / (RSS(full) / df(residual))
//! ```
//!
//! A factor with a single level present contributes no columns and therefore
//! no row to the table.

use std::collections::BTreeSet;

use nalgebra::DMatrix;
use statrs::distribution::{ContinuousCDF as _, FisherSnedecor};

use crate::regression::{FitError, WeightedLeastSquares};

/// A categorical model term: one level code per observation.
#[derive(Debug, Clone, Copy)]
pub struct CategoricalTerm<'a> {
    pub name: &'a str,
    pub codes: &'a [usize],
}

/// One row of the decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct AnovaRow {
    pub term: String,
    pub sum_of_squares: f64,
    pub degrees_of_freedom: usize,
    pub f_statistic: f64,
    pub p_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnovaTable {
    pub rows: Vec<AnovaRow>,
    pub residual_sum_of_squares: f64,
    pub residual_degrees_of_freedom: usize,
}

impl AnovaTable {
    /// Fits `response ~ terms` by weighted least squares and decomposes the
    /// explained variance with type-II sums of squares.
    ///
    /// # Examples
    ///
    /// ```
    /// use amalgam_stats::anova::{AnovaTable, CategoricalTerm};
    ///
    /// let response = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    /// let group = [0, 0, 0, 1, 1, 1];
    /// let table = AnovaTable::type2(
    ///     &response,
    ///     &[1.0; 6],
    ///     &[CategoricalTerm {
    ///         name: "group",
    ///         codes: &group,
    ///     }],
    /// )
    /// .unwrap();
    /// assert!((table.rows[0].f_statistic - 13.5).abs() < 1e-9);
    /// ```
    pub fn type2(
        response: &[f64],
        weights: &[f64],
        terms: &[CategoricalTerm<'_>],
    ) -> Result<Self, FitError> {
        let observations = response.len();
        if let Some(term) = terms.iter().find(|t| t.codes.len() != observations) {
            return Err(FitError::DimensionMismatch {
                rows: term.codes.len(),
                responses: observations,
                weights: weights.len(),
            });
        }

        let encoded = terms.iter().map(|term| treatment_columns(term.codes)).collect::<Vec<_>>();
        let full = WeightedLeastSquares::fit(
            &design_matrix(observations, encoded.iter()),
            response,
            weights,
        )?;
        let residual_sum_of_squares = full.residual_sum_of_squares;
        let residual_degrees_of_freedom = full.residual_degrees_of_freedom();

        let mut rows = Vec::new();
        for (index, (term, columns)) in terms.iter().zip(&encoded).enumerate() {
            if columns.is_empty() {
                continue;
            }
            let reduced_design = design_matrix(
                observations,
                encoded
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .map(|(_, c)| c),
            );
            let reduced = WeightedLeastSquares::fit(&reduced_design, response, weights)?;
            let sum_of_squares =
                (reduced.residual_sum_of_squares - residual_sum_of_squares).max(0.0);
            let degrees_of_freedom = columns.len();
            #[expect(clippy::cast_precision_loss)]
            let f_statistic = (sum_of_squares / degrees_of_freedom as f64)
                / (residual_sum_of_squares / residual_degrees_of_freedom as f64);
            rows.push(AnovaRow {
                term: term.name.to_owned(),
                sum_of_squares,
                degrees_of_freedom,
                f_statistic,
                p_value: f_p_value(f_statistic, degrees_of_freedom, residual_degrees_of_freedom),
            });
        }

        Ok(Self {
            rows,
            residual_sum_of_squares,
            residual_degrees_of_freedom,
        })
    }
}

/// Dummy columns for every level but the first one present.
fn treatment_columns(codes: &[usize]) -> Vec<Vec<f64>> {
    let levels = codes.iter().copied().collect::<BTreeSet<_>>();
    levels
        .into_iter()
        .skip(1)
        .map(|level| {
            codes
                .iter()
                .map(|code| if *code == level { 1.0 } else { 0.0 })
                .collect()
        })
        .collect()
}

fn design_matrix<'a, I>(observations: usize, terms: I) -> DMatrix<f64>
where
    I: Iterator<Item = &'a Vec<Vec<f64>>>,
{
    let mut columns = vec![vec![1.0; observations]];
    for term in terms {
        columns.extend(term.iter().cloned());
    }
    DMatrix::from_fn(observations, columns.len(), |i, j| columns[j][i])
}

#[expect(clippy::cast_precision_loss)]
fn f_p_value(f_statistic: f64, df_term: usize, df_residual: usize) -> f64 {
    if f_statistic.is_nan() {
        return f64::NAN;
    }
    if f_statistic.is_infinite() {
        return 0.0;
    }
    match FisherSnedecor::new(df_term as f64, df_residual as f64) {
        Ok(dist) => dist.sf(f_statistic),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng as _, SeedableRng as _};
    use rand_distr::{Distribution as _, Normal};
    use rand_pcg::Pcg64;

    use super::*;

    fn term<'a>(name: &'a str, codes: &'a [usize]) -> CategoricalTerm<'a> {
        CategoricalTerm { name, codes }
    }

    fn row<'a>(table: &'a AnovaTable, term: &str) -> Option<&'a AnovaRow> {
        table.rows.iter().find(|row| row.term == term)
    }

    #[test]
    fn test_one_way() {
        let response = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let group = [0, 0, 0, 1, 1, 1];
        let terms = [term("group", &group)];
        let table = AnovaTable::type2(&response, &[1.0; 6], &terms).unwrap();
        let row = row(&table, "group").unwrap();
        assert!((row.sum_of_squares - 13.5).abs() < 1e-9);
        assert_eq!(row.degrees_of_freedom, 1);
        assert_eq!(table.residual_degrees_of_freedom, 4);
        assert!((table.residual_sum_of_squares - 4.0).abs() < 1e-9);
        assert!((row.f_statistic - 13.5).abs() < 1e-9);
        // F(1, 4) = 13.5 is t(4) = sqrt(13.5): p ≈ 0.02131
        assert!((row.p_value - 0.021_31).abs() < 1e-4, "{}", row.p_value);

        let scaled = AnovaTable::type2(&response, &[2.5; 6], &terms).unwrap();
        assert!((scaled.rows[0].f_statistic - 13.5).abs() < 1e-9);
        assert!((scaled.rows[0].p_value - row.p_value).abs() < 1e-12);
    }

    #[test]
    fn test_single_level_term_has_no_row() {
        let response = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let group = [0, 0, 0, 1, 1, 1];
        let constant = [3; 6];
        let table = AnovaTable::type2(
            &response,
            &[1.0; 6],
            &[term("group", &group), term("constant", &constant)],
        )
        .unwrap();
        assert_eq!(table.rows.len(), 1);
        assert!(row(&table, "constant").is_none());
    }

    #[test]
    fn test_aliased_terms_are_rank_deficient() {
        let response = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 2.0, 3.0];
        let a = [0, 0, 0, 1, 1, 1, 0, 1];
        let result = AnovaTable::type2(&response, &[1.0; 8], &[term("a", &a), term("b", &a)]);
        assert!(matches!(result, Err(FitError::RankDeficient { .. })));
    }

    #[test]
    fn test_effect_is_detected_alongside_null_covariate() {
        let mut rng = Pcg64::seed_from_u64(3);
        let noise = Normal::new(0.0, 1.0).unwrap();
        let n = 400;
        let exposure = (0..n).map(|i| i % 4).collect::<Vec<_>>();
        let sex = (0..n).map(|_| rng.random_range(0..2)).collect::<Vec<usize>>();
        #[expect(clippy::cast_precision_loss)]
        let response = exposure
            .iter()
            .map(|e| *e as f64 * 1.5 + noise.sample(&mut rng))
            .collect::<Vec<_>>();
        let weights = (0..n).map(|_| rng.random_range(0.5..2.0)).collect::<Vec<f64>>();
        let table = AnovaTable::type2(
            &response,
            &weights,
            &[term("exposure", &exposure), term("sex", &sex)],
        )
        .unwrap();
        let exposure_row = row(&table, "exposure").unwrap();
        assert_eq!(exposure_row.degrees_of_freedom, 3);
        assert!(exposure_row.p_value < 1e-10);
        let sex_row = row(&table, "sex").unwrap();
        assert_eq!(sex_row.degrees_of_freedom, 1);
        assert!(sex_row.p_value > 0.0 && sex_row.p_value <= 1.0);
        assert_eq!(table.residual_degrees_of_freedom, n - 5);
    }
}
