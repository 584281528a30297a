use std::{
    fs::File,
    io::{self, BufWriter},
    path::{Path, PathBuf},
};

use amalgam_analysis::{dataset, record};
use anyhow::Context;
use polars::prelude::DataFrame;

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

fn create_output_file(dir: &Path, file_name: &str) -> anyhow::Result<(BufWriter<File>, PathBuf)> {
    let path = dir.join(file_name);
    let file = File::create(&path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    Ok((BufWriter::new(file), path))
}

/// Write result records as CSV into `dir`
pub fn save_records<T>(dir: &Path, file_name: &str, records: &[T]) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let (writer, path) = create_output_file(dir, file_name)?;
    record::write_records(writer, records)
        .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = records.len(), "saved results");
    Ok(())
}

/// Write a table as CSV into `dir`
pub fn save_frame(dir: &Path, file_name: &str, frame: &DataFrame) -> anyhow::Result<()> {
    let (writer, path) = create_output_file(dir, file_name)?;
    dataset::write_csv(frame, writer)
        .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = frame.height(), "saved table");
    Ok(())
}
