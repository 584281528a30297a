//! CSV output of result records

use std::{fmt, io};

/// Writes `records` as CSV with a header row taken from their field names.
pub fn write_records<W, T>(writer: W, records: &[T]) -> Result<(), csv::Error>
where
    W: io::Write,
    T: serde::Serialize,
{
    let mut writer = csv::Writer::from_writer(writer);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Serializes a field through its `Display` impl.
pub(crate) fn display<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: fmt::Display,
    S: serde::Serializer,
{
    serializer.collect_str(value)
}
