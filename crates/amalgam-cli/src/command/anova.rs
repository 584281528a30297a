use std::path::Path;

use amalgam_analysis::anova;

use super::{Study, StudyArg, table};
use crate::util;

pub(crate) fn run(arg: &StudyArg) -> anyhow::Result<()> {
    let study = Study::load(arg)?;
    report(&study, &arg.output_dir)
}

pub(super) fn report(study: &Study, output_dir: &Path) -> anyhow::Result<()> {
    let results = anova::weighted_anova(&study.labeled);
    util::save_records(output_dir, "anova_results.csv", &results)?;

    table::print_anova_head(&results);
    println!();
    Ok(())
}
