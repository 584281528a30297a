//! Per-cycle loading, joining and marker derivation
//!
//! For each cycle the five source tables are loaded, the dental exam is
//! reduced to an amalgam surface count, and everything is joined on `SEQN`:
//!
//! ```text
//! DEMO ⋈ CBC (inner) ⟕ CRP ⟕ mercury ⟕ surface count   (left joins)
//! ```
//!
//! Derived columns are then appended. A cycle that cannot be loaded or joined
//! is skipped as a whole; the remaining cycles are unaffected.

use std::collections::BTreeMap;

use polars::prelude::*;

use crate::{
    cycle::{CycleFiles, SourceTable},
    dataset::{self, DatasetError},
    marker::Marker,
    source::TableSource,
    subject::SubjectRecord,
    xport::XportError,
};

pub const SUBJECT_ID: &str = "SEQN";
pub const EXAM_WEIGHT: &str = "WTMEC2YR";
pub const GENDER: &str = "RIAGENDR";
pub const RACE: &str = "RIDRETH1";
pub const AGE_YEARS: &str = "RIDAGEYR";
pub const AMALGAM_SURFACES: &str = "amalgam_surfaces";
pub const CYCLE: &str = "Cycle";

const WBC_COUNT: &str = "LBXWBCSI";
const NEUTROPHIL_PERCENT: &str = "LBXNEPCT";
const LYMPHOCYTE_PERCENT: &str = "LBXLYPCT";
const MONOCYTE_PERCENT: &str = "LBXMOPCT";
const PLATELET_COUNT: &str = "LBXPLTSI";
const CRP_STANDARD: &str = "LBXCRP";
const CRP_HIGH_SENSITIVITY: &str = "LBXHSCRP";
const TOTAL_MERCURY: &str = "LBXTHG";

/// Dentition code of a surface restored with amalgam.
pub const AMALGAM_CODE: f64 = 2.0;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum IngestError {
    #[display("failed to load {table} table '{file}': {source}")]
    Load {
        table: SourceTable,
        file: String,
        source: XportError,
    },
    #[display("failed to join {table} table: {source}")]
    Join {
        table: SourceTable,
        source: DatasetError,
    },
    #[display("missing numeric column '{name}'")]
    MissingColumn { name: &'static str },
    #[from]
    Dataset(DatasetError),
    #[from]
    Polars(PolarsError),
}

/// A cycle that contributed nothing, with the reason.
#[derive(Debug)]
pub struct SkippedCycle {
    pub cycle: String,
    pub error: IngestError,
}

/// Everything ingestion produces for a set of cycles.
#[derive(Debug, Default)]
pub struct Ingested {
    /// Row-stacked per-cycle tables over the union of their columns.
    pub combined: DataFrame,
    pub subjects: Vec<SubjectRecord>,
    pub skipped: Vec<SkippedCycle>,
}

/// Processes every cycle in label order.
///
/// Failures are isolated per cycle: the cycle is logged and recorded in
/// [`Ingested::skipped`], and processing continues. Only stacking the
/// processed tables can fail the whole run.
pub fn process_cycles<S>(
    cycles: &BTreeMap<String, CycleFiles>,
    source: &S,
) -> Result<Ingested, IngestError>
where
    S: TableSource + ?Sized,
{
    let mut frames = Vec::new();
    let mut subjects = Vec::new();
    let mut skipped = Vec::new();
    for (cycle, files) in cycles {
        let result = process_cycle(cycle, files, source)
            .and_then(|frame| subject_records(cycle, &frame).map(|records| (frame, records)));
        match result {
            Ok((frame, records)) => {
                tracing::info!(cycle, subjects = records.len(), "processed cycle");
                frames.push(frame);
                subjects.extend(records);
            }
            Err(error) => {
                tracing::warn!(cycle, %error, "skipping cycle");
                skipped.push(SkippedCycle {
                    cycle: cycle.clone(),
                    error,
                });
            }
        }
    }

    Ok(Ingested {
        combined: dataset::stack(&frames)?,
        subjects,
        skipped,
    })
}

/// Loads, joins and derives the table of a single cycle.
pub fn process_cycle<S>(
    cycle: &str,
    files: &CycleFiles,
    source: &S,
) -> Result<DataFrame, IngestError>
where
    S: TableSource + ?Sized,
{
    let load = |table| {
        let file = files.file_name(table);
        source.load(file).map_err(|err| IngestError::Load {
            table,
            file: file.to_owned(),
            source: err,
        })
    };
    let cell_count = load(SourceTable::CellCount)?;
    let demographics = load(SourceTable::Demographics)?;
    let dental = count_amalgam_surfaces(&load(SourceTable::Dental)?)?;
    let inflammation = load(SourceTable::InflammationMarker)?;
    let mercury = load(SourceTable::TraceMetal)?;

    let mut merged = dataset::join_on_key(&demographics, &cell_count, SUBJECT_ID, JoinType::Inner)
        .map_err(|err| IngestError::Join {
            table: SourceTable::CellCount,
            source: err,
        })?;
    for (table, frame) in [
        (SourceTable::InflammationMarker, &inflammation),
        (SourceTable::TraceMetal, &mercury),
        (SourceTable::Dental, &dental),
    ] {
        merged = dataset::join_on_key(&merged, frame, SUBJECT_ID, JoinType::Left)
            .map_err(|err| IngestError::Join { table, source: err })?;
    }
    tracing::debug!(
        cycle,
        rows = merged.height(),
        columns = merged.width(),
        "joined cycle tables"
    );
    numeric_column(&merged, EXAM_WEIGHT)?;

    let labels = vec![cycle; merged.height()];
    merged.with_column(Series::new(CYCLE.into(), labels))?;
    derive_markers(&mut merged)?;
    Ok(merged)
}

/// Reduces a dentition exam table to `SEQN` and the number of amalgam
/// restored surfaces.
///
/// Surface columns are the numeric columns named `OHX*TC`, `OHX*FS` or
/// `OHX*FT`. Missing cells count as not restored.
pub fn count_amalgam_surfaces(dental: &DataFrame) -> Result<DataFrame, IngestError> {
    let seqn = numeric_column(dental, SUBJECT_ID)?;
    let surfaces = dataset::column_names(dental)
        .filter(|name| is_surface_column(name))
        .filter_map(|name| dataset::float_values(dental, name))
        .collect::<Vec<_>>();

    #[expect(clippy::cast_precision_loss)]
    let counts = (0..dental.height())
        .map(|row| {
            let count = surfaces
                .iter()
                .filter(|column| column[row] == Some(AMALGAM_CODE))
                .count();
            Some(count as f64)
        })
        .collect();

    Ok(dataset::from_float_columns([(SUBJECT_ID, seqn), (AMALGAM_SURFACES, counts)])?)
}

fn is_surface_column(name: &str) -> bool {
    name.starts_with("OHX") && ["TC", "FS", "FT"].iter().any(|suffix| name.ends_with(suffix))
}

/// Appends cell counts, CRP, blood mercury and the lymphocyte ratios.
///
/// An absent differential percent column counts as zero. A ratio with a zero
/// or missing denominator is missing.
fn derive_markers(frame: &mut DataFrame) -> Result<(), IngestError> {
    let rows = frame.height();
    let wbc = numeric_column(frame, WBC_COUNT)?;
    let platelets = numeric_column(frame, PLATELET_COUNT)?;

    let differential = |name: &str| -> Vec<Option<f64>> {
        match dataset::float_values(frame, name) {
            Some(percent) => wbc
                .iter()
                .zip(&percent)
                .map(|(total, percent)| Some((*total)? * (*percent)? / 100.0))
                .collect(),
            None => wbc.iter().map(|total| total.map(|_| 0.0)).collect(),
        }
    };
    let neutro = differential(NEUTROPHIL_PERCENT);
    let lympho = differential(LYMPHOCYTE_PERCENT);
    let mono = differential(MONOCYTE_PERCENT);

    let crp_column = if dataset::has_column(frame, CRP_STANDARD) {
        CRP_STANDARD
    } else {
        CRP_HIGH_SENSITIVITY
    };
    let optional =
        |name: &str| dataset::float_values(frame, name).unwrap_or_else(|| vec![None; rows]);
    let crp = optional(crp_column);
    let mercury = optional(TOTAL_MERCURY);

    let nlr = ratio(&neutro, &lympho);
    let mlr = ratio(&mono, &lympho);
    let plr = ratio(&platelets, &lympho);
    let inflammatory = neutro
        .iter()
        .zip(&platelets)
        .map(|(n, p)| Some((*n)? * (*p)?))
        .collect::<Vec<_>>();
    let sii = ratio(&inflammatory, &lympho);

    for (name, values) in [
        ("WBC", wbc),
        ("Neutro", neutro),
        ("Lympho", lympho),
        ("Mono", mono),
        ("Platelets", platelets),
        (Marker::Crp.column(), crp),
        (Marker::BloodMercury.column(), mercury),
        (Marker::Nlr.column(), nlr),
        (Marker::Mlr.column(), mlr),
        (Marker::Plr.column(), plr),
        (Marker::Sii.column(), sii),
    ] {
        frame.with_column(Series::new(name.into(), values))?;
    }
    Ok(())
}

fn ratio(numerator: &[Option<f64>], denominator: &[Option<f64>]) -> Vec<Option<f64>> {
    numerator
        .iter()
        .zip(denominator)
        .map(|(n, d)| {
            let quotient = (*n)? / (*d)?;
            quotient.is_finite().then_some(quotient)
        })
        .collect()
}

fn numeric_column(frame: &DataFrame, name: &'static str) -> Result<Vec<Option<f64>>, IngestError> {
    dataset::float_values(frame, name).ok_or(IngestError::MissingColumn { name })
}

/// Extracts the typed subject records of one processed cycle.
#[expect(clippy::cast_possible_truncation)]
fn subject_records(cycle: &str, frame: &DataFrame) -> Result<Vec<SubjectRecord>, IngestError> {
    let seqn = numeric_column(frame, SUBJECT_ID)?;
    let weight = numeric_column(frame, EXAM_WEIGHT)?;
    let gender = dataset::float_values(frame, GENDER);
    let race = dataset::float_values(frame, RACE);
    let age = dataset::float_values(frame, AGE_YEARS);
    let surfaces = dataset::float_values(frame, AMALGAM_SURFACES);
    let markers = Marker::ALL.map(|marker| dataset::float_values(frame, marker.column()));

    let cell = |column: Option<&[Option<f64>]>, row: usize| column.and_then(|c| c[row]);
    let records = (0..frame.height())
        .filter_map(|row| {
            let id = seqn[row]?;
            Some(SubjectRecord {
                cycle: cycle.to_owned(),
                seqn: id as i64,
                weight: weight[row],
                gender_code: cell(gender.as_deref(), row),
                race_code: cell(race.as_deref(), row),
                age_years: cell(age.as_deref(), row),
                amalgam_surfaces: cell(surfaces.as_deref(), row),
                markers: markers.each_ref().map(|column| cell(column.as_deref(), row)),
            })
        })
        .collect();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use polars::df;

    use super::*;
    use crate::{grouping, stratified, summary};

    fn numeric(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    fn values(frame: &DataFrame, name: &str) -> Vec<Option<f64>> {
        dataset::float_values(frame, name).unwrap()
    }

    /// Builds the five tables of a cycle whose subjects have the given
    /// amalgam surface counts. Subject `i` gets `SEQN = base + i`.
    fn cycle_tables(
        base: f64,
        surfaces: &[usize],
        crp_column: &str,
    ) -> Vec<(&'static str, DataFrame)> {
        #[expect(clippy::cast_precision_loss)]
        let ids = (0..surfaces.len()).map(|i| base + i as f64).collect::<Vec<_>>();
        let n = ids.len();
        #[expect(clippy::cast_precision_loss)]
        let spread =
            |scale: f64| (0..n).map(|i| Some(scale + (i % 7) as f64 * 0.1)).collect::<Vec<_>>();
        let genders = (0..n).map(|i| if i % 2 == 0 { 1.0 } else { 2.0 }).collect::<Vec<_>>();

        let demo = dataset::from_float_columns([
            (SUBJECT_ID, numeric(&ids)),
            (GENDER, numeric(&genders)),
            (RACE, numeric(&vec![3.0; n])),
            (AGE_YEARS, numeric(&vec![45.0; n])),
            (EXAM_WEIGHT, spread(20_000.0)),
        ])
        .unwrap();
        let cbc = dataset::from_float_columns([
            (SUBJECT_ID, numeric(&ids)),
            (WBC_COUNT, spread(6.0)),
            (NEUTROPHIL_PERCENT, spread(60.0)),
            (LYMPHOCYTE_PERCENT, spread(30.0)),
            (MONOCYTE_PERCENT, spread(7.0)),
            (PLATELET_COUNT, spread(250.0)),
        ])
        .unwrap();
        let crp = dataset::from_float_columns([
            (SUBJECT_ID, numeric(&ids)),
            (crp_column, spread(0.3)),
        ])
        .unwrap();
        let mercury = dataset::from_float_columns([
            (SUBJECT_ID, numeric(&ids)),
            (TOTAL_MERCURY, spread(1.0)),
        ])
        .unwrap();

        let teeth = 4;
        let mut dental = vec![(SUBJECT_ID.to_owned(), numeric(&ids))];
        for tooth in 0..teeth {
            let codes = surfaces
                .iter()
                .map(|count| Some(if tooth < (*count).min(teeth) { AMALGAM_CODE } else { 1.0 }))
                .collect();
            dental.push((format!("OHX{:02}CTC", tooth + 2), codes));
        }
        for extra in 0..16 {
            let codes = surfaces
                .iter()
                .map(|count| {
                    let remaining = count.saturating_sub(teeth);
                    Some(if extra < remaining { AMALGAM_CODE } else { 0.0 })
                })
                .collect();
            dental.push((format!("OHX{:02}FS", extra + 2), codes));
        }
        let dental = dataset::from_float_columns(dental).unwrap();

        vec![
            ("CBC", cbc),
            ("DEMO", demo),
            ("OHXDEN", dental),
            ("CRP", crp),
            ("PBCD", mercury),
        ]
    }

    fn cycle_files(suffix: &str) -> CycleFiles {
        CycleFiles {
            cbc: format!("CBC_{suffix}.xpt"),
            demographics: format!("DEMO_{suffix}.xpt"),
            dental: format!("OHXDEN_{suffix}.xpt"),
            crp: format!("CRP_{suffix}.xpt"),
            mercury: format!("PBCD_{suffix}.xpt"),
        }
    }

    fn insert_cycle(
        tables: &mut HashMap<String, DataFrame>,
        suffix: &str,
        base: f64,
        surfaces: &[usize],
        crp_column: &str,
    ) {
        for (prefix, frame) in cycle_tables(base, surfaces, crp_column) {
            tables.insert(format!("{prefix}_{suffix}.xpt"), frame);
        }
    }

    #[test]
    fn test_count_amalgam_surfaces() {
        let dental = df!(
            SUBJECT_ID => [1.0, 2.0, 3.0],
            "OHX02CTC" => [Some(2.0), Some(2.0), None],
            "OHX03FS" => [2.0, 1.0, 2.0],
            "OHX04FT" => [2.0, 0.0, 0.0],
            // Not surface columns
            "OHX02HTC_X" => [2.0, 2.0, 2.0],
            "OHDEXSTS" => [2.0, 2.0, 2.0],
            "OHX05CTC" => [Some("2"), None, None]
        )
        .unwrap();
        let counts = count_amalgam_surfaces(&dental).unwrap();
        assert_eq!(
            dataset::column_names(&counts).collect::<Vec<_>>(),
            [SUBJECT_ID, AMALGAM_SURFACES]
        );
        assert_eq!(values(&counts, AMALGAM_SURFACES), [Some(3.0), Some(1.0), Some(1.0)]);
    }

    #[test]
    fn test_fixture_surface_counts() {
        let tables = cycle_tables(1.0, &[0, 0, 3, 7, 12], "LBXCRP");
        let counts = count_amalgam_surfaces(&tables[2].1).unwrap();
        assert_eq!(
            values(&counts, AMALGAM_SURFACES),
            [Some(0.0), Some(0.0), Some(3.0), Some(7.0), Some(12.0)]
        );
    }

    #[test]
    fn test_derived_markers() {
        let mut frame = df!(
            WBC_COUNT => [Some(10.0), Some(8.0), None],
            NEUTROPHIL_PERCENT => [60.0, 50.0, 50.0],
            LYMPHOCYTE_PERCENT => [20.0, 0.0, 30.0],
            MONOCYTE_PERCENT => [10.0, 5.0, 5.0],
            PLATELET_COUNT => [200.0, 300.0, 250.0]
        )
        .unwrap();
        derive_markers(&mut frame).unwrap();

        assert_eq!(values(&frame, "Neutro")[0], Some(6.0));
        assert_eq!(values(&frame, "Lympho")[0], Some(2.0));
        assert_eq!(values(&frame, "NLR")[0], Some(3.0));
        assert_eq!(values(&frame, "MLR")[0], Some(0.5));
        assert_eq!(values(&frame, "PLR")[0], Some(100.0));
        assert_eq!(values(&frame, "SII")[0], Some(600.0));

        // zero lymphocytes: undefined, not zero or infinite
        assert_eq!(values(&frame, "Lympho")[1], Some(0.0));
        assert_eq!(values(&frame, "NLR")[1], None);
        assert_eq!(values(&frame, "SII")[1], None);

        // missing white cell count
        assert_eq!(values(&frame, "Neutro")[2], None);
        assert_eq!(values(&frame, "PLR")[2], None);

        // no CRP or mercury source columns
        assert_eq!(values(&frame, "CRP"), [None, None, None]);
        assert_eq!(values(&frame, "BloodMercury"), [None, None, None]);
    }

    #[test]
    fn test_missing_percent_counts_as_zero() {
        let mut frame = df!(
            WBC_COUNT => [10.0],
            NEUTROPHIL_PERCENT => [60.0],
            LYMPHOCYTE_PERCENT => [20.0],
            PLATELET_COUNT => [200.0]
        )
        .unwrap();
        derive_markers(&mut frame).unwrap();
        assert_eq!(values(&frame, "Mono"), [Some(0.0)]);
        assert_eq!(values(&frame, "MLR"), [Some(0.0)]);
    }

    #[test]
    fn test_crp_falls_back_to_high_sensitivity_assay() {
        let mut tables = HashMap::new();
        insert_cycle(&mut tables, "I", 100.0, &[0, 1, 2], "LBXHSCRP");
        let frame = process_cycle("2015-2016", &cycle_files("I"), &tables).unwrap();
        assert!(!dataset::has_column(&frame, "LBXCRP"));
        assert_eq!(values(&frame, "CRP"), values(&frame, "LBXHSCRP"));
        assert!(values(&frame, "CRP").iter().all(Option::is_some));
    }

    #[test]
    fn test_process_cycle_joins() {
        let mut tables = HashMap::new();
        insert_cycle(&mut tables, "A", 1.0, &[0, 3, 12], "LBXCRP");
        // one subject without a blood count, one without a dental exam
        let cbc = tables.get_mut("CBC_A.xpt").unwrap();
        *cbc = cbc.slice(0, 2);
        let dental = tables.get_mut("OHXDEN_A.xpt").unwrap();
        *dental = dental.slice(1, 2);

        let frame = process_cycle("1999-2000", &cycle_files("A"), &tables).unwrap();
        assert_eq!(frame.height(), 2);
        assert_eq!(values(&frame, SUBJECT_ID), [Some(1.0), Some(2.0)]);
        assert_eq!(values(&frame, AMALGAM_SURFACES), [None, Some(3.0)]);
        let cycles = frame.column(CYCLE).unwrap().str().unwrap();
        assert_eq!(cycles.into_iter().collect::<Vec<_>>(), [Some("1999-2000"); 2]);

        let names = dataset::column_names(&frame).collect::<Vec<_>>();
        let cycle_at = names.iter().position(|n| *n == CYCLE).unwrap();
        assert_eq!(names[cycle_at + 1], "WBC");
        assert_eq!(names.last(), Some(&"SII"));
    }

    #[test]
    fn test_missing_table_skips_only_that_cycle() {
        let surfaces = [[0; 10], [12; 10]].concat();
        let mut tables = HashMap::new();
        insert_cycle(&mut tables, "A", 1.0, &surfaces, "LBXCRP");
        insert_cycle(&mut tables, "B", 1_000.0, &[0, 7], "LBXCRP");
        tables.remove("CBC_B.xpt");

        let cycles = [
            ("1999-2000".to_owned(), cycle_files("A")),
            ("2001-2002".to_owned(), cycle_files("B")),
        ]
        .into_iter()
        .collect();
        let ingested = process_cycles(&cycles, &tables).unwrap();

        assert_eq!(ingested.combined.height(), 20);
        assert_eq!(ingested.subjects.len(), 20);
        assert!(ingested.subjects.iter().all(|s| s.cycle == "1999-2000"));
        assert_eq!(ingested.skipped.len(), 1);
        assert_eq!(ingested.skipped[0].cycle, "2001-2002");
        assert!(matches!(
            ingested.skipped[0].error,
            IngestError::Load {
                table: SourceTable::CellCount,
                ..
            }
        ));

        let labeled = grouping::label_subjects(&ingested.subjects);
        let summaries = summary::cycle_summaries(&ingested.subjects);
        let demographic = summary::demographic_summaries(&labeled);
        let ttests = stratified::stratified_ttests(&labeled);
        assert!(!summaries.is_empty());
        assert!(!demographic.is_empty());
        assert!(!ttests.is_empty());
        assert!(summaries.iter().all(|r| r.cycle == "1999-2000"));
        assert!(demographic.iter().all(|r| r.cycle == "1999-2000"));
        assert!(ttests.iter().all(|r| r.cycle == "1999-2000"));
    }

    #[test]
    fn test_duplicate_subject_skips_cycle() {
        let mut tables = HashMap::new();
        insert_cycle(&mut tables, "A", 1.0, &[0, 3], "LBXCRP");
        tables.insert(
            "PBCD_A.xpt".to_owned(),
            df!(SUBJECT_ID => [1.0, 1.0], TOTAL_MERCURY => [0.5, 0.7]).unwrap(),
        );
        let err = process_cycle("1999-2000", &cycle_files("A"), &tables).unwrap_err();
        assert!(matches!(
            err,
            IngestError::Join {
                table: SourceTable::TraceMetal,
                source: DatasetError::DuplicateKey { key: 1, .. },
            }
        ));
    }

    #[test]
    fn test_missing_weight_skips_cycle() {
        let mut tables = HashMap::new();
        insert_cycle(&mut tables, "A", 1.0, &[0, 3], "LBXCRP");
        let without_weight = tables["DEMO_A.xpt"].drop(EXAM_WEIGHT).unwrap();
        tables.insert("DEMO_A.xpt".to_owned(), without_weight);
        let err = process_cycle("1999-2000", &cycle_files("A"), &tables).unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { name: EXAM_WEIGHT }));
    }

    #[test]
    fn test_cycles_from_transport_files() {
        let dir = tempfile::tempdir().unwrap();
        for (suffix, base, crp_column) in [("A", 1.0, "LBXCRP"), ("J", 500.0, "LBXHSCRP")] {
            for (prefix, frame) in cycle_tables(base, &[0, 2, 6, 11], crp_column) {
                let name = format!("{prefix}_{suffix}");
                let file = std::fs::File::create(dir.path().join(format!("{name}.xpt"))).unwrap();
                crate::xport::write(file, &frame, &name).unwrap();
            }
        }
        let cycles = [
            ("1999-2000".to_owned(), cycle_files("A")),
            ("2017-2018".to_owned(), cycle_files("J")),
        ]
        .into_iter()
        .collect();
        let source = crate::source::XportDirectory::new(dir.path());
        let ingested = process_cycles(&cycles, &source).unwrap();

        assert!(ingested.skipped.is_empty());
        assert_eq!(ingested.combined.height(), 8);
        assert!(dataset::has_column(&ingested.combined, "LBXCRP"));
        assert!(dataset::has_column(&ingested.combined, "LBXHSCRP"));
        assert!(values(&ingested.combined, "CRP").iter().all(Option::is_some));
        assert_eq!(
            values(&ingested.combined, AMALGAM_SURFACES)[4..],
            [Some(0.0), Some(2.0), Some(6.0), Some(11.0)]
        );
        assert_eq!(ingested.subjects[7].seqn, 503);
    }

    #[test]
    fn test_subject_records() {
        let mut tables = HashMap::new();
        insert_cycle(&mut tables, "A", 10.0, &[0, 12], "LBXCRP");
        let cycles = [("1999-2000".to_owned(), cycle_files("A"))].into_iter().collect();
        let ingested = process_cycles(&cycles, &tables).unwrap();
        let subject = &ingested.subjects[1];
        assert_eq!(subject.seqn, 11);
        assert_eq!(subject.gender_code, Some(2.0));
        assert_eq!(subject.amalgam_surfaces, Some(12.0));
        assert!(subject.weight.is_some());
        for marker in Marker::ALL {
            assert!(subject.marker(marker).is_some(), "{marker}");
        }
    }
}
