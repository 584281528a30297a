//! Weighted marker summaries per cycle and per demographic group

use amalgam_stats::weighted::{SummaryMethod, WeightedSummary};

use crate::{
    grouping::{self, Demographic, DemographicLevel, LabeledSubject},
    marker::Marker,
    record,
    subject::SubjectRecord,
};

/// Decimal places of reported summary statistics.
pub const SUMMARY_DECIMALS: i32 = 3;

/// Summary of one marker within one cycle.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MarkerSummaryRecord {
    #[serde(rename = "Cycle")]
    pub cycle: String,
    #[serde(rename = "Marker", serialize_with = "record::display")]
    pub marker: Marker,
    #[serde(rename = "Mean")]
    pub mean: f64,
    #[serde(rename = "SD")]
    pub sd: f64,
    #[serde(rename = "CI_Low")]
    pub ci_low: f64,
    #[serde(rename = "CI_High")]
    pub ci_high: f64,
    #[serde(rename = "Sample Size")]
    pub sample_size: usize,
    #[serde(rename = "Method", serialize_with = "record::display")]
    pub method: SummaryMethod,
}

/// Summary of one marker within one demographic group of one cycle.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct DemographicSummaryRecord {
    #[serde(rename = "Cycle")]
    pub cycle: String,
    #[serde(rename = "Demographic", serialize_with = "record::display")]
    pub demographic: Demographic,
    #[serde(rename = "Group", serialize_with = "record::display")]
    pub group: DemographicLevel,
    #[serde(rename = "Marker", serialize_with = "record::display")]
    pub marker: Marker,
    #[serde(rename = "Mean")]
    pub mean: f64,
    #[serde(rename = "SD")]
    pub sd: f64,
    #[serde(rename = "CI_Low")]
    pub ci_low: f64,
    #[serde(rename = "CI_High")]
    pub ci_high: f64,
    #[serde(rename = "Sample Size")]
    pub sample_size: usize,
    #[serde(rename = "Method", serialize_with = "record::display")]
    pub method: SummaryMethod,
}

/// One row per cycle and marker with at least one usable value.
#[must_use]
pub fn cycle_summaries(subjects: &[SubjectRecord]) -> Vec<MarkerSummaryRecord> {
    let mut records = Vec::new();
    for (cycle, cycle_subjects) in grouping::by_cycle(subjects, |s| s.cycle.as_str()) {
        for marker in Marker::ALL {
            let Some(summary) = summarize(cycle, marker, cycle_subjects.iter().copied()) else {
                continue;
            };
            records.push(MarkerSummaryRecord {
                cycle: cycle.to_owned(),
                marker,
                mean: summary.mean,
                sd: summary.std_dev,
                ci_low: summary.ci_low,
                ci_high: summary.ci_high,
                sample_size: summary.sample_size,
                method: summary.method,
            });
        }
    }
    records
}

/// One row per cycle, demographic variable, defined group and marker.
#[must_use]
pub fn demographic_summaries(subjects: &[LabeledSubject]) -> Vec<DemographicSummaryRecord> {
    let mut records = Vec::new();
    for (cycle, cycle_subjects) in grouping::by_cycle(subjects, |s| s.subject.cycle.as_str()) {
        for demographic in Demographic::ALL {
            for (group, members) in grouping::by_level(&cycle_subjects, demographic) {
                for marker in Marker::ALL {
                    let summary = summarize(cycle, marker, members.iter().map(|s| &s.subject));
                    let Some(summary) = summary else { continue };
                    records.push(DemographicSummaryRecord {
                        cycle: cycle.to_owned(),
                        demographic,
                        group,
                        marker,
                        mean: summary.mean,
                        sd: summary.std_dev,
                        ci_low: summary.ci_low,
                        ci_high: summary.ci_high,
                        sample_size: summary.sample_size,
                        method: summary.method,
                    });
                }
            }
        }
    }
    records
}

fn summarize<'a, I>(cycle: &str, marker: Marker, subjects: I) -> Option<WeightedSummary>
where
    I: Iterator<Item = &'a SubjectRecord>,
{
    let summary =
        WeightedSummary::from_optional_pairs(subjects.map(|s| (s.marker(marker), s.weight)))?;
    if summary.method == SummaryMethod::Unweighted {
        tracing::warn!(
            cycle,
            %marker,
            rows = summary.sample_size,
            "survey weights unusable, using unweighted statistics"
        );
    }
    Some(summary.rounded(SUMMARY_DECIMALS))
}
