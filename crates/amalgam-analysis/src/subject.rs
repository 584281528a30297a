use crate::marker::Marker;

/// One surveyed individual of one cycle, as read from the combined dataset.
///
/// Demographic fields keep the raw survey codes; labeling them is the job of
/// [`crate::grouping`].
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectRecord {
    pub cycle: String,
    pub seqn: i64,
    /// MEC exam weight (`WTMEC2YR`).
    pub weight: Option<f64>,
    /// `RIAGENDR`
    pub gender_code: Option<f64>,
    /// `RIDRETH1`
    pub race_code: Option<f64>,
    /// `RIDAGEYR`
    pub age_years: Option<f64>,
    pub amalgam_surfaces: Option<f64>,
    /// Marker values, indexed in [`Marker::ALL`] order.
    pub markers: [Option<f64>; Marker::ALL.len()],
}

impl SubjectRecord {
    #[must_use]
    pub fn marker(&self, marker: Marker) -> Option<f64> {
        self.markers[marker as usize]
    }
}
