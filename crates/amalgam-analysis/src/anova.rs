//! Weighted variance decomposition per cycle and marker
//!
//! Fits `marker ~ Amalgam Group + Gender + Race + AgeGroup` by weighted least
//! squares with the exam weights, and reports type-II F tests for each term.
//! Weights are used as plain regression weights; no survey design correction
//! is applied.

use amalgam_stats::{
    anova::{AnovaTable, CategoricalTerm},
    significance::{is_significant, round_to},
};

use crate::{
    grouping::{self, LabeledSubject},
    marker::Marker,
    record,
};

pub const EXPOSURE_TERM: &str = "Amalgam Group";
pub const GENDER_TERM: &str = "Gender";
pub const RACE_TERM: &str = "Race";
pub const AGE_GROUP_TERM: &str = "AgeGroup";

const F_STATISTIC_DECIMALS: i32 = 3;
const P_VALUE_DECIMALS: i32 = 5;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AnovaRecord {
    #[serde(rename = "Cycle")]
    pub cycle: String,
    #[serde(rename = "Marker", serialize_with = "record::display")]
    pub marker: Marker,
    #[serde(rename = "Term")]
    pub term: String,
    #[serde(rename = "F_stat")]
    pub f_stat: f64,
    #[serde(rename = "p_value")]
    pub p_value: f64,
    #[serde(rename = "Significant")]
    pub significant: bool,
}

/// Complete cases of one marker: response, weight and factor codes.
#[derive(Debug, Default)]
struct ModelData {
    response: Vec<f64>,
    weights: Vec<f64>,
    exposure: Vec<usize>,
    gender: Vec<usize>,
    race: Vec<usize>,
    age_group: Vec<usize>,
}

impl ModelData {
    fn complete_cases<'a, I>(subjects: I, marker: Marker) -> Self
    where
        I: IntoIterator<Item = &'a LabeledSubject>,
    {
        let mut data = Self::default();
        for subject in subjects {
            let (Some(value), Some(weight), Some(exposure), Some(gender), Some(race), Some(age)) = (
                subject.subject.marker(marker),
                subject.subject.weight,
                subject.exposure,
                subject.gender,
                subject.race,
                subject.age_group,
            ) else {
                continue;
            };
            data.response.push(value);
            data.weights.push(weight);
            data.exposure.push(exposure as usize);
            data.gender.push(gender as usize);
            data.race.push(race as usize);
            data.age_group.push(age as usize);
        }
        data
    }

    fn terms(&self) -> [CategoricalTerm<'_>; 4] {
        [
            CategoricalTerm {
                name: EXPOSURE_TERM,
                codes: &self.exposure,
            },
            CategoricalTerm {
                name: GENDER_TERM,
                codes: &self.gender,
            },
            CategoricalTerm {
                name: RACE_TERM,
                codes: &self.race,
            },
            CategoricalTerm {
                name: AGE_GROUP_TERM,
                codes: &self.age_group,
            },
        ]
    }
}

/// Runs the decomposition for every cycle and marker.
///
/// Combinations without complete cases are skipped. Models that cannot be
/// fitted are logged and skipped.
#[must_use]
pub fn weighted_anova(subjects: &[LabeledSubject]) -> Vec<AnovaRecord> {
    let mut records = Vec::new();
    for (cycle, cycle_subjects) in grouping::by_cycle(subjects, |s| s.subject.cycle.as_str()) {
        for marker in Marker::ALL {
            let data = ModelData::complete_cases(cycle_subjects.iter().copied(), marker);
            if data.response.is_empty() {
                continue;
            }
            let table = match AnovaTable::type2(&data.response, &data.weights, &data.terms()) {
                Ok(table) => table,
                Err(error) => {
                    tracing::warn!(cycle, %marker, %error, "variance decomposition failed");
                    continue;
                }
            };
            tracing::debug!(
                cycle,
                %marker,
                observations = data.response.len(),
                residual_df = table.residual_degrees_of_freedom,
                "fitted weighted model"
            );
            for row in table.rows {
                let p_value = round_to(row.p_value, P_VALUE_DECIMALS);
                records.push(AnovaRecord {
                    cycle: cycle.to_owned(),
                    marker,
                    term: row.term,
                    f_stat: round_to(row.f_statistic, F_STATISTIC_DECIMALS),
                    p_value,
                    significant: is_significant(p_value),
                });
            }
        }
    }
    records
}
