//! Exposure and demographic labels
//!
//! Labeling is a pure, total function of a subject record: a missing input or
//! an unknown survey code yields an undefined (`None`) label, never an error.
//! Both the summaries and the significance tests group subjects through this
//! module; it depends on neither.

use std::{collections::BTreeMap, fmt};

use crate::subject::SubjectRecord;

/// Amalgam exposure level by number of restored surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExposureGroup {
    /// No amalgam surfaces.
    None,
    /// 1 to 5 surfaces.
    Low,
    /// 6 to 10 surfaces.
    Medium,
    /// More than 10 surfaces.
    High,
}

impl ExposureGroup {
    /// Categorizes an amalgam surface count.
    ///
    /// # Examples
    ///
    /// ```
    /// use amalgam_analysis::grouping::ExposureGroup;
    ///
    /// assert_eq!(ExposureGroup::categorize(Some(0.0)), Some(ExposureGroup::None));
    /// assert_eq!(ExposureGroup::categorize(Some(5.0)), Some(ExposureGroup::Low));
    /// assert_eq!(ExposureGroup::categorize(Some(11.0)), Some(ExposureGroup::High));
    /// assert_eq!(ExposureGroup::categorize(None), None);
    /// ```
    #[must_use]
    pub fn categorize(surfaces: Option<f64>) -> Option<Self> {
        let surfaces = surfaces?;
        if surfaces.is_nan() || surfaces < 0.0 {
            return None;
        }
        let group = if surfaces == 0.0 {
            Self::None
        } else if surfaces <= 5.0 {
            Self::Low
        } else if surfaces <= 10.0 {
            Self::Medium
        } else {
            Self::High
        };
        Some(group)
    }

    fn to_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for ExposureGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.to_str(), f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Decodes `RIAGENDR`.
    #[must_use]
    pub fn from_code(code: Option<f64>) -> Option<Self> {
        match code? {
            1.0 => Some(Self::Male),
            2.0 => Some(Self::Female),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum Race {
    #[display("Mexican American")]
    MexicanAmerican,
    #[display("Other Hispanic")]
    OtherHispanic,
    #[display("Non-Hispanic White")]
    NonHispanicWhite,
    #[display("Non-Hispanic Black")]
    NonHispanicBlack,
    #[display("Other Race/Multi-Racial")]
    Other,
}

impl Race {
    /// Decodes `RIDRETH1`.
    #[must_use]
    pub fn from_code(code: Option<f64>) -> Option<Self> {
        match code? {
            1.0 => Some(Self::MexicanAmerican),
            2.0 => Some(Self::OtherHispanic),
            3.0 => Some(Self::NonHispanicWhite),
            4.0 => Some(Self::NonHispanicBlack),
            5.0 => Some(Self::Other),
            _ => None,
        }
    }
}

/// Age band; bins are right-closed: (0, 19], (19, 39], (39, 59], (59, ∞).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum AgeGroup {
    #[display("0–19")]
    UpTo19,
    #[display("20–39")]
    From20To39,
    #[display("40–59")]
    From40To59,
    #[display("60+")]
    From60,
}

impl AgeGroup {
    /// Bins `RIDAGEYR`. Ages of zero or less fall outside every bin.
    #[must_use]
    pub fn from_age(years: Option<f64>) -> Option<Self> {
        let years = years?;
        if years.is_nan() || years <= 0.0 {
            None
        } else if years <= 19.0 {
            Some(Self::UpTo19)
        } else if years <= 39.0 {
            Some(Self::From20To39)
        } else if years <= 59.0 {
            Some(Self::From40To59)
        } else {
            Some(Self::From60)
        }
    }
}

/// A demographic stratification variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum Demographic {
    Gender,
    Race,
    AgeGroup,
}

impl Demographic {
    pub const ALL: [Demographic; 3] = [
        Demographic::Gender,
        Demographic::Race,
        Demographic::AgeGroup,
    ];
}

/// A defined level of some [`Demographic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum DemographicLevel {
    Gender(Gender),
    Race(Race),
    AgeGroup(AgeGroup),
}

/// A subject with its exposure and demographic labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledSubject {
    pub subject: SubjectRecord,
    pub exposure: Option<ExposureGroup>,
    pub gender: Option<Gender>,
    pub race: Option<Race>,
    pub age_group: Option<AgeGroup>,
}

impl LabeledSubject {
    #[must_use]
    pub fn new(subject: SubjectRecord) -> Self {
        Self {
            exposure: ExposureGroup::categorize(subject.amalgam_surfaces),
            gender: Gender::from_code(subject.gender_code),
            race: Race::from_code(subject.race_code),
            age_group: AgeGroup::from_age(subject.age_years),
            subject,
        }
    }

    #[must_use]
    pub fn level(&self, demographic: Demographic) -> Option<DemographicLevel> {
        match demographic {
            Demographic::Gender => self.gender.map(DemographicLevel::Gender),
            Demographic::Race => self.race.map(DemographicLevel::Race),
            Demographic::AgeGroup => self.age_group.map(DemographicLevel::AgeGroup),
        }
    }
}

/// Labels every subject. The input is left untouched.
#[must_use]
pub fn label_subjects(subjects: &[SubjectRecord]) -> Vec<LabeledSubject> {
    subjects.iter().cloned().map(LabeledSubject::new).collect()
}

/// Groups subjects by cycle, in label order.
pub fn by_cycle<'a, T, I, F>(items: I, cycle_of: F) -> BTreeMap<&'a str, Vec<&'a T>>
where
    I: IntoIterator<Item = &'a T>,
    F: Fn(&'a T) -> &'a str,
    T: 'a,
{
    let mut groups = BTreeMap::<_, Vec<_>>::new();
    for item in items {
        groups.entry(cycle_of(item)).or_default().push(item);
    }
    groups
}

/// Groups subjects by their defined level of `demographic`; subjects with an
/// undefined level are left out.
#[must_use]
pub fn by_level<'a>(
    subjects: &[&'a LabeledSubject],
    demographic: Demographic,
) -> BTreeMap<DemographicLevel, Vec<&'a LabeledSubject>> {
    let mut groups = BTreeMap::<_, Vec<_>>::new();
    for subject in subjects {
        if let Some(level) = subject.level(demographic) {
            groups.entry(level).or_default().push(*subject);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Marker;

    fn subject(surfaces: Option<f64>, gender: f64, race: f64, age: f64) -> SubjectRecord {
        SubjectRecord {
            cycle: "2005-2006".to_owned(),
            seqn: 1,
            weight: Some(1.0),
            gender_code: Some(gender),
            race_code: Some(race),
            age_years: Some(age),
            amalgam_surfaces: surfaces,
            markers: [None; Marker::ALL.len()],
        }
    }

    #[test]
    fn test_categorize_surface_counts() {
        let groups = [0.0, 0.0, 3.0, 7.0, 12.0].map(|s| ExposureGroup::categorize(Some(s)));
        assert_eq!(
            groups,
            [
                Some(ExposureGroup::None),
                Some(ExposureGroup::None),
                Some(ExposureGroup::Low),
                Some(ExposureGroup::Medium),
                Some(ExposureGroup::High),
            ]
        );
    }

    #[test]
    fn test_categorize_boundaries() {
        use ExposureGroup::{High, Low, Medium};
        for (surfaces, expected) in [
            (1.0, Low),
            (5.0, Low),
            (6.0, Medium),
            (10.0, Medium),
            (11.0, High),
        ] {
            assert_eq!(ExposureGroup::categorize(Some(surfaces)), Some(expected), "{surfaces}");
        }
        assert_eq!(ExposureGroup::categorize(Some(f64::NAN)), None);
        assert_eq!(ExposureGroup::categorize(Some(-1.0)), None);
    }

    #[test]
    fn test_age_bins_are_right_closed() {
        assert_eq!(AgeGroup::from_age(Some(0.0)), None);
        assert_eq!(AgeGroup::from_age(Some(1.0)), Some(AgeGroup::UpTo19));
        assert_eq!(AgeGroup::from_age(Some(19.0)), Some(AgeGroup::UpTo19));
        assert_eq!(AgeGroup::from_age(Some(19.5)), Some(AgeGroup::From20To39));
        assert_eq!(AgeGroup::from_age(Some(39.0)), Some(AgeGroup::From20To39));
        assert_eq!(AgeGroup::from_age(Some(59.0)), Some(AgeGroup::From40To59));
        assert_eq!(AgeGroup::from_age(Some(85.0)), Some(AgeGroup::From60));
        assert_eq!(AgeGroup::from_age(None), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AgeGroup::UpTo19.to_string(), "0–19");
        assert_eq!(Race::Other.to_string(), "Other Race/Multi-Racial");
        assert_eq!(DemographicLevel::Gender(Gender::Female).to_string(), "Female");
        assert_eq!(Demographic::AgeGroup.to_string(), "AgeGroup");
    }

    #[test]
    fn test_unknown_codes_are_undefined() {
        let labeled = LabeledSubject::new(subject(Some(2.0), 7.0, 9.0, 30.0));
        assert_eq!(labeled.gender, None);
        assert_eq!(labeled.race, None);
        assert_eq!(labeled.level(Demographic::Gender), None);
        assert_eq!(
            labeled.level(Demographic::AgeGroup),
            Some(DemographicLevel::AgeGroup(AgeGroup::From20To39))
        );
        assert_eq!(labeled.exposure, Some(ExposureGroup::Low));
    }

    #[test]
    fn test_by_level_skips_undefined() {
        let labeled = label_subjects(&[
            subject(None, 1.0, 3.0, 30.0),
            subject(None, 2.0, 3.0, 30.0),
            subject(None, 9.0, 3.0, 30.0),
            subject(None, 1.0, 3.0, 30.0),
        ]);
        let refs = labeled.iter().collect::<Vec<_>>();
        let groups = by_level(&refs, Demographic::Gender);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&DemographicLevel::Gender(Gender::Male)].len(), 2);
        assert_eq!(groups[&DemographicLevel::Gender(Gender::Female)].len(), 1);
    }
}
