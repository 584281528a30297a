//! Stratified two-group comparisons
//!
//! Within every cycle and every defined level of each demographic variable,
//! subjects without amalgam are compared against each exposed group with
//! Welch's t-test, one marker at a time.

use std::fmt;

use amalgam_stats::{
    significance::{is_significant, round_to},
    ttest::WelchTTest,
};

use crate::{
    grouping::{self, Demographic, DemographicLevel, ExposureGroup, LabeledSubject},
    marker::Marker,
    record,
};

/// Smallest group size that is tested.
pub const MIN_GROUP_SIZE: usize = 10;

/// Exposure groups compared, reference group first.
pub const COMPARISONS: [Comparison; 3] = [
    Comparison(ExposureGroup::None, ExposureGroup::Low),
    Comparison(ExposureGroup::None, ExposureGroup::Medium),
    Comparison(ExposureGroup::None, ExposureGroup::High),
];

const STATISTIC_DECIMALS: i32 = 3;
const P_VALUE_DECIMALS: i32 = 5;

/// A pair of exposure groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Comparison(pub ExposureGroup, pub ExposureGroup);

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} vs {}", self.0, self.1)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TTestRecord {
    #[serde(rename = "Cycle")]
    pub cycle: String,
    #[serde(rename = "Strata", serialize_with = "record::display")]
    pub strata: Demographic,
    #[serde(rename = "Group", serialize_with = "record::display")]
    pub group: DemographicLevel,
    #[serde(rename = "Marker", serialize_with = "record::display")]
    pub marker: Marker,
    #[serde(rename = "Comparison", serialize_with = "record::display")]
    pub comparison: Comparison,
    #[serde(rename = "Group1 n")]
    pub group1_n: usize,
    #[serde(rename = "Group2 n")]
    pub group2_n: usize,
    #[serde(rename = "t-stat")]
    pub t_stat: f64,
    #[serde(rename = "p-value")]
    pub p_value: f64,
    #[serde(rename = "Significant")]
    pub significant: bool,
}

/// Runs every comparison for every cycle, stratum and marker.
///
/// Combinations where either group has fewer than [`MIN_GROUP_SIZE`] values
/// produce no row.
#[must_use]
pub fn stratified_ttests(subjects: &[LabeledSubject]) -> Vec<TTestRecord> {
    let mut records = Vec::new();
    for (cycle, cycle_subjects) in grouping::by_cycle(subjects, |s| s.subject.cycle.as_str()) {
        for strata in Demographic::ALL {
            for (group, members) in grouping::by_level(&cycle_subjects, strata) {
                for comparison in COMPARISONS {
                    for marker in Marker::ALL {
                        let values = |exposure| {
                            members
                                .iter()
                                .filter(|s| s.exposure == Some(exposure))
                                .filter_map(|s| s.subject.marker(marker))
                                .collect::<Vec<_>>()
                        };
                        let first = values(comparison.0);
                        let second = values(comparison.1);
                        if first.len() < MIN_GROUP_SIZE || second.len() < MIN_GROUP_SIZE {
                            continue;
                        }
                        let Some(test) = WelchTTest::new(&first, &second) else {
                            continue;
                        };
                        let p_value = round_to(test.p_value, P_VALUE_DECIMALS);
                        records.push(TTestRecord {
                            cycle: cycle.to_owned(),
                            strata,
                            group,
                            marker,
                            comparison,
                            group1_n: first.len(),
                            group2_n: second.len(),
                            t_stat: round_to(test.statistic, STATISTIC_DECIMALS),
                            p_value,
                            significant: is_significant(p_value),
                        });
                    }
                }
            }
        }
    }
    records
}
