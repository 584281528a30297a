//! SAS transport (XPORT v5) reader and writer
//!
//! Survey extracts are distributed as `.xpt` files. The layout is a sequence
//! of 80-byte records:
//!
//! ```text
//! LIBRARY header, 2 library records
//! MEMBER header (namestr length at bytes 74..78), DSCRPTR header, 2 member records
//! NAMESTR header (variable count at bytes 54..58)
//! namestr records (140 or 136 bytes each, padded to 80)
//! OBS header
//! observations, fixed width, padded with spaces to 80
//! ```
//!
//! Numbers are IBM System/360 hexadecimal floating point (big-endian, 2 to 8
//! bytes). Missing numbers have `.`, `_` or `A`-`Z` in the first byte and
//! zeros elsewhere. Only the first member of a file is read.

use std::{
    fs,
    io::{self, Read, Write},
    path::Path,
};

use polars::prelude::*;

const RECORD_LEN: usize = 80;
const HEADER_PREFIX: &[u8] = b"HEADER RECORD*******";
const HEADER_SUFFIX: &[u8] = b"HEADER RECORD!!!!!!!";
const NAMESTR_LEN: usize = 140;

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum XportError {
    #[display("I/O error: {_0}")]
    #[from]
    Io(io::Error),
    #[display("expected {expected} header record at byte {offset}")]
    InvalidHeader {
        expected: &'static str,
        offset: usize,
    },
    #[display("file ends inside the {section} section")]
    Truncated { section: &'static str },
    #[display("variable '{name}' has unsupported type {kind} or length {length}")]
    UnsupportedVariable {
        name: String,
        kind: i16,
        length: i16,
    },
    #[display("name of variable {index} is not valid UTF-8")]
    InvalidName { index: usize },
    #[display("name '{name}' does not fit in 8 bytes")]
    NameTooLong { name: String },
    #[display("invalid table: {_0}")]
    #[from]
    Polars(PolarsError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Variable {
    name: String,
    is_numeric: bool,
    length: usize,
    position: usize,
}

/// Reads the first member of an XPORT file into a data frame.
pub fn read_file(path: &Path) -> Result<DataFrame, XportError> {
    let file = fs::File::open(path)?;
    read(io::BufReader::new(file))
}

/// Reads the first member of an XPORT stream into a data frame.
pub fn read<R>(mut reader: R) -> Result<DataFrame, XportError>
where
    R: Read,
{
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    parse(&data)
}

fn parse(data: &[u8]) -> Result<DataFrame, XportError> {
    expect_header(data, 0, "LIBRARY")?;
    let member_offset = 3 * RECORD_LEN;
    let member = expect_header(data, member_offset, "MEMBER")?;
    let namestr_len = match &member[74..78] {
        b"0136" => 136,
        _ => NAMESTR_LEN,
    };
    expect_header(data, member_offset + RECORD_LEN, "DSCRPTR")?;

    let namestr_header_offset = member_offset + 4 * RECORD_LEN;
    let namestr_header = expect_header(data, namestr_header_offset, "NAMESTR")?;
    let variable_count = ascii_number(&namestr_header[54..58]).ok_or(XportError::InvalidHeader {
        expected: "NAMESTR",
        offset: namestr_header_offset,
    })?;

    let namestr_offset = namestr_header_offset + RECORD_LEN;
    let namestr_end = namestr_offset + variable_count * namestr_len;
    let namestrs = data
        .get(namestr_offset..namestr_end)
        .ok_or(XportError::Truncated { section: "NAMESTR" })?;
    let variables = namestrs
        .chunks_exact(namestr_len)
        .enumerate()
        .map(|(index, namestr)| parse_namestr(index, namestr))
        .collect::<Result<Vec<_>, _>>()?;

    let obs_header_offset = namestr_end.next_multiple_of(RECORD_LEN);
    expect_header(data, obs_header_offset, "OBS")?;
    let observations = member_data(&data[obs_header_offset + RECORD_LEN..]);

    let row_len = variables
        .iter()
        .map(|v| v.position + v.length)
        .max()
        .unwrap_or(0);
    let rows = if row_len == 0 {
        Vec::new()
    } else {
        let mut rows = observations.chunks_exact(row_len).collect::<Vec<_>>();
        while rows.last().is_some_and(|row| row.iter().all(|b| *b == b' ')) {
            rows.pop();
        }
        rows
    };

    let columns = variables
        .iter()
        .map(|variable| {
            let cells = rows
                .iter()
                .map(|row| &row[variable.position..variable.position + variable.length]);
            let name = PlSmallStr::from(variable.name.as_str());
            let series = if variable.is_numeric {
                Series::new(name, cells.map(decode_ibm).collect::<Vec<_>>())
            } else {
                Series::new(name, cells.map(decode_text).collect::<Vec<_>>())
            };
            series.into_column()
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Cells of one column, converted for encoding.
enum Cells {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
}

/// Writes `frame` as a single-member XPORT file.
///
/// Text columns use the length of their longest value. Every other column is
/// stored as an 8-byte number.
pub fn write<W>(mut writer: W, frame: &DataFrame, dataset_name: &str) -> Result<(), XportError>
where
    W: Write,
{
    let timestamp = b"01JAN26:00:00:00";
    let mut variables = Vec::new();
    let mut columns = Vec::new();
    let mut position = 0;
    for column in frame.get_columns() {
        let name = column.name().as_str();
        if name.len() > 8 {
            return Err(XportError::NameTooLong {
                name: name.to_owned(),
            });
        }
        let cells = if matches!(column.dtype(), DataType::String) {
            Cells::Text(column.str()?.into_iter().map(|v| v.map(String::from)).collect())
        } else {
            Cells::Numeric(column.cast(&DataType::Float64)?.f64()?.into_iter().collect())
        };
        let length = match &cells {
            Cells::Numeric(_) => 8,
            Cells::Text(values) => values
                .iter()
                .flatten()
                .map(String::len)
                .max()
                .unwrap_or(1)
                .max(1),
        };
        variables.push(Variable {
            name: name.to_owned(),
            is_numeric: matches!(cells, Cells::Numeric(_)),
            length,
            position,
        });
        columns.push(cells);
        position += length;
    }
    if dataset_name.len() > 8 {
        return Err(XportError::NameTooLong {
            name: dataset_name.to_owned(),
        });
    }

    let mut out = Vec::new();
    out.extend(header("LIBRARY", b"000000000000000000000000000000  "));
    let mut library = Vec::new();
    for field in ["SAS", "SAS", "SASLIB", "9.4", "X64_7PRO"] {
        library.extend(padded(field.as_bytes(), 8));
    }
    library.extend([b' '; 24]);
    library.extend(timestamp);
    out.extend(library);
    out.extend(padded(timestamp, RECORD_LEN));

    out.extend(header("MEMBER", b"000000000000000001600000000140  "));
    out.extend(header("DSCRPTR", b"000000000000000000000000000000  "));
    let mut descriptor = Vec::new();
    for field in ["SAS", dataset_name, "SASDATA", "9.4", "X64_7PRO"] {
        descriptor.extend(padded(field.as_bytes(), 8));
    }
    descriptor.extend([b' '; 24]);
    descriptor.extend(timestamp);
    out.extend(descriptor);
    out.extend(padded(timestamp, RECORD_LEN));

    let count = format!("000000{:04}00000000000000000000  ", variables.len());
    out.extend(header("NAMESTR", count.as_bytes()));
    for (index, variable) in variables.iter().enumerate() {
        out.extend(encode_namestr(variable, index));
    }
    pad_to_record(&mut out, 0);

    out.extend(header("OBS", b"000000000000000000000000000000  "));
    for row in 0..frame.height() {
        for (cells, variable) in columns.iter().zip(&variables) {
            match cells {
                Cells::Numeric(values) => out.extend(encode_ibm(values[row])),
                Cells::Text(values) => {
                    let value = values[row].as_deref().unwrap_or("");
                    out.extend(padded(value.as_bytes(), variable.length));
                }
            }
        }
    }
    pad_to_record(&mut out, b' ');

    writer.write_all(&out)?;
    writer.flush()?;
    Ok(())
}

fn header(kind: &str, tail: &[u8]) -> Vec<u8> {
    let mut record = Vec::with_capacity(RECORD_LEN);
    record.extend(HEADER_PREFIX);
    record.extend(padded(kind.as_bytes(), 8));
    record.extend(HEADER_SUFFIX);
    record.extend(tail);
    record
}

fn expect_header<'a>(
    data: &'a [u8],
    offset: usize,
    kind: &'static str,
) -> Result<&'a [u8], XportError> {
    let record = data
        .get(offset..offset + RECORD_LEN)
        .ok_or(XportError::Truncated { section: kind })?;
    let expected = header(kind, &[]);
    if record.starts_with(&expected) {
        Ok(record)
    } else {
        Err(XportError::InvalidHeader {
            expected: kind,
            offset,
        })
    }
}

/// Observation bytes up to the next member header, if any.
fn member_data(data: &[u8]) -> &[u8] {
    let next_member = header("MEMBER", &[]);
    let end = (0..data.len())
        .step_by(RECORD_LEN)
        .find(|offset| data[*offset..].starts_with(&next_member))
        .unwrap_or(data.len());
    &data[..end]
}

fn parse_namestr(index: usize, bytes: &[u8]) -> Result<Variable, XportError> {
    let kind = i16::from_be_bytes([bytes[0], bytes[1]]);
    let length = i16::from_be_bytes([bytes[4], bytes[5]]);
    let name = std::str::from_utf8(&bytes[8..16])
        .map_err(|_| XportError::InvalidName { index })?
        .trim_end()
        .to_owned();
    let position = i32::from_be_bytes([bytes[84], bytes[85], bytes[86], bytes[87]]);

    let is_numeric = match kind {
        1 => true,
        2 => false,
        _ => return Err(XportError::UnsupportedVariable { name, kind, length }),
    };
    let valid_length = if is_numeric {
        (2..=8).contains(&length)
    } else {
        length > 0
    };
    let (Ok(length_bytes), Ok(position), true) =
        (usize::try_from(length), usize::try_from(position), valid_length)
    else {
        return Err(XportError::UnsupportedVariable { name, kind, length });
    };

    Ok(Variable {
        name,
        is_numeric,
        length: length_bytes,
        position,
    })
}

fn encode_namestr(variable: &Variable, index: usize) -> Vec<u8> {
    let mut record = vec![0u8; NAMESTR_LEN];
    let kind: i16 = if variable.is_numeric { 1 } else { 2 };
    let length = i16::try_from(variable.length).unwrap_or(i16::MAX);
    let number = i16::try_from(index + 1).unwrap_or(i16::MAX);
    let position = i32::try_from(variable.position).unwrap_or(i32::MAX);
    record[0..2].copy_from_slice(&kind.to_be_bytes());
    record[4..6].copy_from_slice(&length.to_be_bytes());
    record[6..8].copy_from_slice(&number.to_be_bytes());
    record[8..16].copy_from_slice(&padded(variable.name.as_bytes(), 8));
    record[16..56].copy_from_slice(&padded(b"", 40));
    record[56..64].copy_from_slice(&padded(b"", 8));
    record[72..80].copy_from_slice(&padded(b"", 8));
    record[84..88].copy_from_slice(&position.to_be_bytes());
    record
}

fn padded(bytes: &[u8], len: usize) -> Vec<u8> {
    let mut out = bytes[..bytes.len().min(len)].to_vec();
    out.resize(len, b' ');
    out
}

fn pad_to_record(out: &mut Vec<u8>, fill: u8) {
    let target = out.len().next_multiple_of(RECORD_LEN);
    out.resize(target, fill);
}

fn ascii_number(bytes: &[u8]) -> Option<usize> {
    std::str::from_utf8(bytes).ok()?.trim().parse().ok()
}

fn decode_text(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let text = text.trim_end_matches([' ', '\0']);
    (!text.is_empty()).then(|| text.to_owned())
}

/// Decodes an IBM hexadecimal float of 2 to 8 bytes; `None` for SAS missing.
#[expect(clippy::cast_precision_loss)]
fn decode_ibm(bytes: &[u8]) -> Option<f64> {
    let mut buf = [0u8; 8];
    buf[..bytes.len()].copy_from_slice(bytes);

    let first = buf[0];
    if buf[1..].iter().all(|b| *b == 0)
        && (first == b'.' || first == b'_' || first.is_ascii_uppercase())
    {
        return None;
    }

    let mantissa = buf[1..]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
    if mantissa == 0 {
        return Some(0.0);
    }
    let sign = if first & 0x80 == 0 { 1.0 } else { -1.0 };
    let exponent = i32::from(first & 0x7f) - 64;
    Some(sign * (mantissa as f64) / 2f64.powi(56) * 16f64.powi(exponent))
}

/// Encodes a value as an 8-byte IBM hexadecimal float; `None` becomes `.`.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn encode_ibm(value: Option<f64>) -> [u8; 8] {
    let Some(value) = value.filter(|v| v.is_finite()) else {
        return [b'.', 0, 0, 0, 0, 0, 0, 0];
    };
    if value == 0.0 {
        return [0; 8];
    }

    let sign = if value < 0.0 { 0x80u8 } else { 0 };
    let mut fraction = value.abs();
    let mut exponent = 64i32;
    while fraction >= 1.0 {
        fraction /= 16.0;
        exponent += 1;
    }
    while fraction < 1.0 / 16.0 {
        fraction *= 16.0;
        exponent -= 1;
    }
    let mut mantissa = (fraction * 2f64.powi(56)).round() as u64;
    if mantissa >= 1 << 56 {
        mantissa >>= 4;
        exponent += 1;
    }
    let exponent = exponent.clamp(0, 0x7f) as u8;

    let mut bytes = [0u8; 8];
    bytes[0] = sign | exponent;
    bytes[1..].copy_from_slice(&mantissa.to_be_bytes()[1..]);
    bytes
}
