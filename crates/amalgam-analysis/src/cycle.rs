//! Survey cycles and the files that make them up
//!
//! Each cycle is one two-year NHANES wave. A cycle is analyzed from five
//! source tables; their file names changed between waves (lab assay
//! generations, renamed modules), so the mapping is configuration rather than
//! a naming rule.

use std::{collections::BTreeMap, fmt, path::PathBuf};

/// The five source tables of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SourceTable {
    CellCount,
    Demographics,
    Dental,
    InflammationMarker,
    TraceMetal,
}

impl SourceTable {
    fn to_str(self) -> &'static str {
        match self {
            SourceTable::CellCount => "cell count",
            SourceTable::Demographics => "demographics",
            SourceTable::Dental => "dental",
            SourceTable::InflammationMarker => "inflammation marker",
            SourceTable::TraceMetal => "trace metal",
        }
    }
}

impl fmt::Display for SourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.to_str(), f)
    }
}

/// File names of the five source tables of one cycle.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CycleFiles {
    /// Complete blood count with differential.
    pub cbc: String,
    /// Demographics, survey weights.
    pub demographics: String,
    /// Oral health dentition exam.
    pub dental: String,
    /// C-reactive protein (standard or high-sensitivity assay).
    pub crp: String,
    /// Blood metals (total mercury).
    pub mercury: String,
}

impl CycleFiles {
    fn new(cbc: &str, demographics: &str, dental: &str, crp: &str, mercury: &str) -> Self {
        Self {
            cbc: cbc.to_owned(),
            demographics: demographics.to_owned(),
            dental: dental.to_owned(),
            crp: crp.to_owned(),
            mercury: mercury.to_owned(),
        }
    }

    #[must_use]
    pub fn file_name(&self, table: SourceTable) -> &str {
        match table {
            SourceTable::CellCount => &self.cbc,
            SourceTable::Demographics => &self.demographics,
            SourceTable::Dental => &self.dental,
            SourceTable::InflammationMarker => &self.crp,
            SourceTable::TraceMetal => &self.mercury,
        }
    }
}

/// Input configuration: where the files live and which files form each cycle.
///
/// Cycles are processed in label order.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StudyConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "nhanes_cycles")]
    pub cycles: BTreeMap<String, CycleFiles>,
}

impl Default for StudyConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            cycles: nhanes_cycles(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("nhanes_data")
}

/// The NHANES continuous cycles 1999-2000 through 2017-2018.
#[must_use]
pub fn nhanes_cycles() -> BTreeMap<String, CycleFiles> {
    [
        (
            "1999-2000",
            CycleFiles::new("L40_0.xpt", "DEMO.xpt", "OHXDENT.xpt", "LAB11.xpt", "LAB06HM.xpt"),
        ),
        (
            "2001-2002",
            CycleFiles::new("L25_B.xpt", "DEMO_B.xpt", "OHXDEN_B.xpt", "L11_B.xpt", "L06_2_B.xpt"),
        ),
        (
            "2003-2004",
            CycleFiles::new("L25_C.xpt", "DEMO_C.xpt", "OHXDEN_C.xpt", "L11_C.xpt", "L06BMT_C.xpt"),
        ),
        (
            "2005-2006",
            CycleFiles::new("CBC_D.xpt", "DEMO_D.xpt", "OHXDEN_D.xpt", "CRP_D.xpt", "PbCd_D.xpt"),
        ),
        (
            "2007-2008",
            CycleFiles::new("CBC_E.xpt", "DEMO_E.xpt", "OHXDEN_E.xpt", "CRP_E.xpt", "PbCd_E.xpt"),
        ),
        (
            "2009-2010",
            CycleFiles::new("CBC_F.xpt", "DEMO_F.xpt", "OHXDEN_F.xpt", "CRP_F.xpt", "PbCd_F.xpt"),
        ),
        (
            "2011-2012",
            CycleFiles::new("CBC_G.xpt", "DEMO_G.xpt", "OHXDEN_G.xpt", "CRP_G.xpt", "PbCd_G.xpt"),
        ),
        (
            "2013-2014",
            CycleFiles::new("CBC_H.xpt", "DEMO_H.xpt", "OHXDEN_H.xpt", "CRP_H.xpt", "PBCD_H.xpt"),
        ),
        (
            "2015-2016",
            CycleFiles::new("CBC_I.xpt", "DEMO_I.xpt", "OHXDEN_I.xpt", "HSCRP_I.xpt", "PBCD_I.xpt"),
        ),
        (
            "2017-2018",
            CycleFiles::new("CBC_J.xpt", "DEMO_J.xpt", "OHXDEN_J.xpt", "HSCRP_J.xpt", "PBCD_J.xpt"),
        ),
    ]
    .into_iter()
    .map(|(cycle, files)| (cycle.to_owned(), files))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_covers_ten_cycles() {
        let config = StudyConfig::default();
        assert_eq!(config.cycles.len(), 10);
        assert_eq!(config.data_dir, PathBuf::from("nhanes_data"));
        let first = config.cycles.keys().next().unwrap();
        assert_eq!(first, "1999-2000");
        assert_eq!(
            config.cycles["2015-2016"].file_name(SourceTable::InflammationMarker),
            "HSCRP_I.xpt"
        );
    }

    #[test]
    fn test_every_table_has_a_file() {
        for files in nhanes_cycles().values() {
            for table in [
                SourceTable::CellCount,
                SourceTable::Demographics,
                SourceTable::Dental,
                SourceTable::InflammationMarker,
                SourceTable::TraceMetal,
            ] {
                assert!(files.file_name(table).ends_with(".xpt"), "{table}");
            }
        }
    }
}
