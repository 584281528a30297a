//! Keyed joins, stacking and CSV output over polars data frames
//!
//! Source tables are joined on a numeric subject key. The key is normalized to
//! `Int64` before joining, so transport files storing it as a float match.

use std::{collections::HashSet, io};

use polars::prelude::*;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum DatasetError {
    #[display("missing key column '{name}'")]
    MissingKey { name: String },
    #[display("key column '{name}' is not numeric")]
    NonNumericKey { name: String },
    #[display("duplicate key {key} in column '{name}'")]
    DuplicateKey { name: String, key: i64 },
    #[display("{_0}")]
    #[from]
    Polars(PolarsError),
}

/// Values of a numeric column as `f64`; `None` if absent or text.
#[must_use]
pub fn float_values(frame: &DataFrame, name: &str) -> Option<Vec<Option<f64>>> {
    let column = frame.column(name).ok()?;
    if matches!(column.dtype(), DataType::String) {
        return None;
    }
    let column = column.cast(&DataType::Float64).ok()?;
    let values = column.f64().ok()?.into_iter().collect();
    Some(values)
}

#[must_use]
pub fn has_column(frame: &DataFrame, name: &str) -> bool {
    frame.column(name).is_ok()
}

/// Column names in order.
pub fn column_names(frame: &DataFrame) -> impl Iterator<Item = &str> {
    frame.get_columns().iter().map(|column| column.name().as_str())
}

/// Joins `right` onto `left` by the numeric column `key`.
///
/// Keys must be unique in `right`. Right columns whose names already exist on
/// the left are dropped. The result is ordered by key.
pub fn join_on_key(
    left: &DataFrame,
    right: &DataFrame,
    key: &str,
    how: JoinType,
) -> Result<DataFrame, DatasetError> {
    let left = with_integer_key(left, key)?;
    let right = with_integer_key(right, key)?;

    let mut seen = HashSet::with_capacity(right.height());
    for value in right.column(key)?.i64()?.into_iter().flatten() {
        if !seen.insert(value) {
            return Err(DatasetError::DuplicateKey {
                name: key.to_owned(),
                key: value,
            });
        }
    }

    let keep = column_names(&right)
        .filter(|name| {
            let duplicate = *name != key && has_column(&left, name);
            if duplicate {
                tracing::debug!(column = *name, "dropping duplicate column from joined table");
            }
            !duplicate
        })
        .map(PlSmallStr::from)
        .collect::<Vec<_>>();
    let right = right.select(keep)?;

    let joined = left.join(&right, [key], [key], how.into(), None)?;
    Ok(joined.sort([key], SortMultipleOptions::default())?)
}

fn with_integer_key(frame: &DataFrame, key: &str) -> Result<DataFrame, DatasetError> {
    let column = frame.column(key).map_err(|_| DatasetError::MissingKey {
        name: key.to_owned(),
    })?;
    if matches!(column.dtype(), DataType::String) {
        return Err(DatasetError::NonNumericKey {
            name: key.to_owned(),
        });
    }
    let column = column.cast(&DataType::Int64)?;
    let mut frame = frame.clone();
    frame.with_column(column)?;
    Ok(frame)
}

/// Stacks frames vertically over the union of their columns.
///
/// Cells of columns absent from a frame are missing. A column that is text in
/// any frame becomes text in the result.
pub fn stack(frames: &[DataFrame]) -> Result<DataFrame, DatasetError> {
    if frames.is_empty() {
        return Ok(DataFrame::default());
    }

    let text = frames
        .iter()
        .flat_map(DataFrame::get_columns)
        .filter(|column| matches!(column.dtype(), DataType::String))
        .map(|column| column.name().clone())
        .collect::<HashSet<_>>();
    let frames = frames
        .iter()
        .map(|frame| {
            let columns = frame
                .get_columns()
                .iter()
                .map(|column| {
                    if text.contains(column.name()) {
                        column.cast(&DataType::String)
                    } else {
                        Ok(column.clone())
                    }
                })
                .collect::<PolarsResult<Vec<_>>>()?;
            DataFrame::new(columns)
        })
        .collect::<PolarsResult<Vec<_>>>()?;

    Ok(polars::functions::concat_df_diagonal(&frames)?)
}

/// Writes the frame as CSV with a header row. Missing cells are empty.
pub fn write_csv<W>(frame: &DataFrame, writer: W) -> Result<(), DatasetError>
where
    W: io::Write,
{
    let mut frame = frame.clone();
    CsvWriter::new(writer).include_header(true).finish(&mut frame)?;
    Ok(())
}

/// Builds a frame of numeric columns, in order.
pub fn from_float_columns<I, S>(columns: I) -> Result<DataFrame, DatasetError>
where
    I: IntoIterator<Item = (S, Vec<Option<f64>>)>,
    S: Into<PlSmallStr>,
{
    let columns = columns
        .into_iter()
        .map(|(name, values)| Series::new(name.into(), values).into_column())
        .collect();
    Ok(DataFrame::new(columns)?)
}
