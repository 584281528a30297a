//! Dental amalgam exposure versus inflammation markers in NHANES.
//!
//! This crate turns the per-cycle survey extracts into result tables:
//!
//! 1. **Ingestion**: load the five source tables of each cycle, count amalgam
//!    restored surfaces, join on `SEQN` and derive the lymphocyte ratios
//! 2. **Labeling**: exposure group and demographic labels per subject
//! 3. **Summaries**: survey-weighted marker summaries per cycle and per
//!    demographic group
//! 4. **Testing**: stratified Welch t-tests and an optional weighted type-II
//!    ANOVA
//!
//! # Modules
//!
//! - [`xport`]: SAS transport (XPORT v5) reader and writer
//! - [`dataset`]: Keyed joins, stacking and CSV output of data frames
//! - [`cycle`]: Survey cycles and their source files
//! - [`source`]: Table providers (directory of transport files, in-memory)
//! - [`ingest`]: Per-cycle loading, joining and marker derivation
//! - [`subject`]: Typed subject records
//! - [`marker`]: The analyzed markers
//! - [`grouping`]: Exposure and demographic labels
//! - [`summary`]: Weighted summary tables
//! - [`stratified`]: Stratified t-tests
//! - [`anova`]: Weighted variance decomposition
//! - [`record`]: CSV output of result records
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//!
//! use amalgam_analysis::{grouping, ingest, stratified, summary};
//! use polars::prelude::DataFrame;
//!
//! // No tables available: every cycle is skipped, nothing is produced.
//! let tables = HashMap::<String, DataFrame>::new();
//! let config = amalgam_analysis::cycle::StudyConfig::default();
//! let ingested = ingest::process_cycles(&config.cycles, &tables).unwrap();
//! assert_eq!(ingested.skipped.len(), 10);
//!
//! let labeled = grouping::label_subjects(&ingested.subjects);
//! assert!(summary::cycle_summaries(&ingested.subjects).is_empty());
//! assert!(stratified::stratified_ttests(&labeled).is_empty());
//! ```

pub mod anova;
pub mod cycle;
pub mod dataset;
pub mod grouping;
pub mod ingest;
pub mod marker;
pub mod record;
pub mod source;
pub mod stratified;
pub mod subject;
pub mod summary;
pub mod xport;
