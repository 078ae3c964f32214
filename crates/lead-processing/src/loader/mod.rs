//! Input loading for contact lists.
//!
//! This module turns an uploaded file into a raw, string-typed table:
//! - csv/txt files are parsed as comma-delimited text
//! - xls/xlsx files are read from their first worksheet
//! - only the first five columns are kept
//! - header names are trimmed and made unique
//! - missing cells become the empty string
//!
//! Files above the configured size threshold are read in bounded chunks that
//! are appended in order, which yields the same table as a whole-file read.

mod delimited;
pub mod headers;
mod spreadsheet;

use crate::config::PipelineConfig;
use crate::error::{LeadError, Result};
use headers::normalize_cell;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Number of leading columns read from every input.
pub const MAX_COLUMNS: usize = 5;

/// Extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["csv", "txt", "xls", "xlsx"];

/// How an input file is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// Comma-delimited text (csv, txt)
    Delimited,
    /// Excel workbook (xls, xlsx)
    Spreadsheet,
}

impl FileKind {
    /// Resolve a declared extension (case-insensitive, leading dot allowed).
    pub fn from_extension(ext: &str) -> Result<Self> {
        let normalized = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "csv" | "txt" => Ok(Self::Delimited),
            "xls" | "xlsx" => Ok(Self::Spreadsheet),
            _ => Err(LeadError::FileTypeRejected(ext.to_string())),
        }
    }

    /// Resolve the kind from a file name's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| LeadError::FileTypeRejected(path.display().to_string()))?;
        Self::from_extension(ext)
    }
}

/// A loaded input table: string columns in source order plus its row count.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub frame: DataFrame,
    pub total_rows: usize,
}

impl RawTable {
    /// Header names in source order.
    pub fn headers(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }
}

/// Reads input files according to the pipeline configuration.
#[derive(Debug, Clone)]
pub struct Loader {
    large_file_threshold_bytes: u64,
    chunk_size: usize,
}

impl Loader {
    pub fn new(large_file_threshold_bytes: u64, chunk_size: usize) -> Self {
        Self {
            large_file_threshold_bytes,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.large_file_threshold_bytes, config.chunk_size)
    }

    /// Load `path` as `kind`.
    ///
    /// Any read or parse failure is reported as [`LeadError::LoadFailure`]
    /// carrying the underlying cause.
    pub fn load(&self, path: &Path, kind: FileKind) -> Result<RawTable> {
        self.load_inner(path, kind)
            .map_err(|e| match e {
                LeadError::LoadFailure(_) => e,
                other => LeadError::LoadFailure(other.to_string()),
            })
    }

    fn load_inner(&self, path: &Path, kind: FileKind) -> Result<RawTable> {
        let size = std::fs::metadata(path)?.len();

        let frame = match kind {
            FileKind::Delimited => {
                let chunk_rows = if size > self.large_file_threshold_bytes {
                    info!(
                        "Large file ({} bytes), reading in chunks of {} rows",
                        size, self.chunk_size
                    );
                    Some(self.chunk_size)
                } else {
                    None
                };
                delimited::read_delimited(path, chunk_rows)?
            }
            FileKind::Spreadsheet => spreadsheet::read_spreadsheet(path)?,
        };

        let total_rows = frame.height();
        debug!(
            "Loaded {} rows x {} columns from {}",
            total_rows,
            frame.width(),
            path.display()
        );

        Ok(RawTable { frame, total_rows })
    }

    /// Load a delimited file with an explicit chunk size, regardless of its
    /// size on disk.
    pub fn load_delimited_chunked(&self, path: &Path, chunk_rows: usize) -> Result<RawTable> {
        let frame = delimited::read_delimited(path, Some(chunk_rows.max(1)))
            .map_err(|e| LeadError::LoadFailure(e.to_string()))?;
        let total_rows = frame.height();
        Ok(RawTable { frame, total_rows })
    }
}

/// Row-oriented accumulator that produces string-typed DataFrames.
pub(crate) struct ColumnBuffer {
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
    rows: usize,
}

impl ColumnBuffer {
    pub(crate) fn new(headers: Vec<String>, capacity: usize) -> Self {
        let columns = headers
            .iter()
            .map(|_| Vec::with_capacity(capacity))
            .collect();
        Self {
            headers,
            columns,
            rows: 0,
        }
    }

    /// Append one row. Short rows are padded with empty strings; cells past
    /// the header width are ignored.
    pub(crate) fn push_row<'a>(&mut self, cells: impl IntoIterator<Item = &'a str>) {
        let mut cells = cells.into_iter();
        for column in self.columns.iter_mut() {
            let value = cells.next().map(normalize_cell).unwrap_or_default();
            column.push(value);
        }
        self.rows += 1;
    }

    pub(crate) fn len(&self) -> usize {
        self.rows
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Drain the buffered rows into a DataFrame, leaving the buffer empty.
    pub(crate) fn take_frame(&mut self) -> Result<DataFrame> {
        let columns: Vec<Column> = self
            .headers
            .iter()
            .zip(self.columns.iter_mut())
            .map(|(name, values)| Column::new(name.as_str().into(), std::mem::take(values)))
            .collect();
        self.rows = 0;
        Ok(DataFrame::new(columns)?)
    }
}
