//! Result previews on stdout
//!
//! Each command prints the first rows of its main table; the full tables are
//! in the CSV files.

use amalgam_analysis::{
    anova::AnovaRecord,
    stratified::TTestRecord,
    summary::{DemographicSummaryRecord, MarkerSummaryRecord},
};

const PREVIEW_ROWS: usize = 5;

fn print_separator(width: usize) {
    println!("  {}", "-".repeat(width));
}

fn print_remaining(total: usize) {
    if total > PREVIEW_ROWS {
        println!("  ... {} more rows", total - PREVIEW_ROWS);
    }
}

pub(super) fn print_summary_head(records: &[MarkerSummaryRecord]) {
    println!("Summary statistics ({} rows)", records.len());
    println!(
        "  {:<10} {:<13} {:>10} {:>10} {:>10} {:>10} {:>7} {:<10}",
        "Cycle", "Marker", "Mean", "SD", "CI_Low", "CI_High", "N", "Method",
    );
    // cycle(10) + marker(13) + 4 * stat(10) + n(7) + method(10) + spaces(7)
    print_separator(87);
    for record in records.iter().take(PREVIEW_ROWS) {
        println!(
            "  {:<10} {:<13} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>7} {:<10}",
            record.cycle,
            record.marker,
            record.mean,
            record.sd,
            record.ci_low,
            record.ci_high,
            record.sample_size,
            record.method.to_string(),
        );
    }
    print_remaining(records.len());
}

pub(super) fn print_demographic_head(records: &[DemographicSummaryRecord]) {
    println!("Demographic statistics ({} rows)", records.len());
    println!(
        "  {:<10} {:<10} {:<24} {:<13} {:>10} {:>10} {:>7}",
        "Cycle", "Demo", "Group", "Marker", "Mean", "SD", "N",
    );
    print_separator(90);
    for record in records.iter().take(PREVIEW_ROWS) {
        println!(
            "  {:<10} {:<10} {:<24} {:<13} {:>10.3} {:>10.3} {:>7}",
            record.cycle,
            record.demographic.to_string(),
            record.group.to_string(),
            record.marker,
            record.mean,
            record.sd,
            record.sample_size,
        );
    }
    print_remaining(records.len());
}

pub(super) fn print_ttest_head(records: &[TTestRecord]) {
    println!("t-test results ({} rows)", records.len());
    println!(
        "  {:<10} {:<9} {:<24} {:<13} {:<15} {:>6} {:>6} {:>9} {:>9} {:>5}",
        "Cycle", "Strata", "Group", "Marker", "Comparison", "n1", "n2", "t", "p", "Sig",
    );
    print_separator(117);
    for record in records.iter().take(PREVIEW_ROWS) {
        println!(
            "  {:<10} {:<9} {:<24} {:<13} {:<15} {:>6} {:>6} {:>9.3} {:>9.5} {:>5}",
            record.cycle,
            record.strata.to_string(),
            record.group.to_string(),
            record.marker,
            record.comparison.to_string(),
            record.group1_n,
            record.group2_n,
            record.t_stat,
            record.p_value,
            if record.significant { "*" } else { "" },
        );
    }
    print_remaining(records.len());
}

pub(super) fn print_anova_head(records: &[AnovaRecord]) {
    println!("ANOVA results ({} rows)", records.len());
    println!(
        "  {:<10} {:<13} {:<14} {:>10} {:>9} {:>5}",
        "Cycle", "Marker", "Term", "F", "p", "Sig",
    );
    print_separator(66);
    for record in records.iter().take(PREVIEW_ROWS) {
        println!(
            "  {:<10} {:<13} {:<14} {:>10.3} {:>9.5} {:>5}",
            record.cycle,
            record.marker,
            record.term,
            record.f_stat,
            record.p_value,
            if record.significant { "*" } else { "" },
        );
    }
    print_remaining(records.len());
}
