use std::{fs, path::PathBuf};

use amalgam_analysis::{
    cycle::StudyConfig,
    grouping::{self, LabeledSubject},
    ingest::{self, Ingested},
    source::XportDirectory,
};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::util;

mod anova;
mod summarize;
mod table;
mod ttest;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What analysis to run (defaults to `run`)
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Merge cycles and compute weighted marker summaries
    Summarize(#[clap(flatten)] StudyArg),
    /// Stratified Welch t-tests of exposed versus unexposed subjects
    Ttest(#[clap(flatten)] StudyArg),
    /// Weighted type-II ANOVA of each marker
    Anova(#[clap(flatten)] StudyArg),
    /// Summaries and t-tests, optionally followed by the ANOVA
    Run(#[clap(flatten)] RunArg),
}

/// Inputs and output location shared by every command.
#[derive(Debug, Clone, Args)]
pub(crate) struct StudyArg {
    /// Directory containing the transport (.xpt) files [default: nhanes_data]
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// JSON file with the data directory and the cycle to file mapping
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory the CSV results are written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,
}

impl Default for StudyArg {
    fn default() -> Self {
        Self {
            data_dir: None,
            config: None,
            output_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub(crate) struct RunArg {
    #[clap(flatten)]
    pub study: StudyArg,

    /// Also run the weighted ANOVA
    #[arg(long)]
    pub anova: bool,
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Run(RunArg::default())) {
        Mode::Summarize(arg) => summarize::run(&arg)?,
        Mode::Ttest(arg) => ttest::run(&arg)?,
        Mode::Anova(arg) => anova::run(&arg)?,
        Mode::Run(arg) => {
            let study = Study::load(&arg.study)?;
            summarize::report(&study, &arg.study.output_dir)?;
            ttest::report(&study, &arg.study.output_dir)?;
            if arg.anova {
                anova::report(&study, &arg.study.output_dir)?;
            }
        }
    }
    Ok(())
}

/// Ingested cycles and their labeled subjects.
pub(crate) struct Study {
    pub ingested: Ingested,
    pub labeled: Vec<LabeledSubject>,
}

impl Study {
    fn load(arg: &StudyArg) -> anyhow::Result<Self> {
        let mut config = match &arg.config {
            Some(path) => util::read_json_file::<StudyConfig, _>("study configuration", path)?,
            None => StudyConfig::default(),
        };
        if let Some(data_dir) = &arg.data_dir {
            config.data_dir.clone_from(data_dir);
        }
        fs::create_dir_all(&arg.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                arg.output_dir.display()
            )
        })?;

        tracing::info!(
            data_dir = %config.data_dir.display(),
            cycles = config.cycles.len(),
            "processing survey cycles"
        );
        let source = XportDirectory::new(&config.data_dir);
        let ingested = ingest::process_cycles(&config.cycles, &source)
            .context("Failed to combine the processed cycles")?;
        if ingested.subjects.is_empty() {
            tracing::warn!(
                skipped = ingested.skipped.len(),
                "no cycle could be processed; result tables will be empty"
            );
        }
        let labeled = grouping::label_subjects(&ingested.subjects);
        Ok(Self { ingested, labeled })
    }
}
