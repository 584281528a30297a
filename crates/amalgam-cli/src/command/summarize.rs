//! Combined dataset and weighted summary tables

use std::path::Path;

use amalgam_analysis::summary;

use super::{Study, StudyArg, table};
use crate::util;

pub(crate) fn run(arg: &StudyArg) -> anyhow::Result<()> {
    let study = Study::load(arg)?;
    report(&study, &arg.output_dir)
}

pub(super) fn report(study: &Study, output_dir: &Path) -> anyhow::Result<()> {
    util::save_frame(output_dir, "combined_dataset.csv", &study.ingested.combined)?;

    let summaries = summary::cycle_summaries(&study.ingested.subjects);
    util::save_records(output_dir, "summary_statistics.csv", &summaries)?;

    let demographic = summary::demographic_summaries(&study.labeled);
    util::save_records(output_dir, "demographic_statistics.csv", &demographic)?;

    table::print_summary_head(&summaries);
    println!();
    table::print_demographic_head(&demographic);
    println!();
    Ok(())
}
