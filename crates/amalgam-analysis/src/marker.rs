use std::fmt;

/// Inflammation and exposure markers analyzed per subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Marker {
    /// Neutrophil-to-lymphocyte ratio.
    Nlr,
    /// Monocyte-to-lymphocyte ratio.
    Mlr,
    /// Platelet-to-lymphocyte ratio.
    Plr,
    /// Systemic immune-inflammation index.
    Sii,
    /// C-reactive protein.
    Crp,
    /// Total blood mercury.
    BloodMercury,
}

impl Marker {
    pub const ALL: [Marker; 6] = [
        Marker::Nlr,
        Marker::Mlr,
        Marker::Plr,
        Marker::Sii,
        Marker::Crp,
        Marker::BloodMercury,
    ];

    /// Column name of the marker in the combined dataset.
    #[must_use]
    pub fn column(self) -> &'static str {
        match self {
            Marker::Nlr => "NLR",
            Marker::Mlr => "MLR",
            Marker::Plr => "PLR",
            Marker::Sii => "SII",
            Marker::Crp => "CRP",
            Marker::BloodMercury => "BloodMercury",
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.column(), f)
    }
}
