use std::path::Path;

use amalgam_analysis::stratified;

use super::{Study, StudyArg, table};
use crate::util;

pub(crate) fn run(arg: &StudyArg) -> anyhow::Result<()> {
    let study = Study::load(arg)?;
    report(&study, &arg.output_dir)
}

pub(super) fn report(study: &Study, output_dir: &Path) -> anyhow::Result<()> {
    let results = stratified::stratified_ttests(&study.labeled);
    let significant = results.iter().filter(|r| r.significant).count();
    tracing::info!(tests = results.len(), significant, "stratified t-tests done");
    util::save_records(output_dir, "ttest_results.csv", &results)?;

    table::print_ttest_head(&results);
    println!();
    Ok(())
}
