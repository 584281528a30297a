//! Where source tables come from
//!
//! Ingestion asks a [`TableSource`] for tables by file name. On disk that is a
//! directory of transport files; tests use an in-memory map.

use std::{collections::HashMap, io, path::PathBuf};

use polars::prelude::DataFrame;

use crate::xport::{self, XportError};

/// A provider of named tables.
pub trait TableSource {
    /// Loads the table stored under `file_name`.
    fn load(&self, file_name: &str) -> Result<DataFrame, XportError>;
}

/// SAS transport files in a single directory.
#[derive(Debug, Clone)]
pub struct XportDirectory {
    root: PathBuf,
}

impl XportDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl TableSource for XportDirectory {
    fn load(&self, file_name: &str) -> Result<DataFrame, XportError> {
        xport::read_file(&self.root.join(file_name))
    }
}

impl TableSource for HashMap<String, DataFrame> {
    fn load(&self, file_name: &str) -> Result<DataFrame, XportError> {
        self.get(file_name).cloned().ok_or_else(|| {
            XportError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no table named {file_name}"),
            ))
        })
    }
}
