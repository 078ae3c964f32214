//! Writing cleaned records to CSV and reading them back for previews.

use crate::error::{LeadError, Result};
use crate::types::{CanonicalField, CanonicalRecord};
use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use regex::Regex;
use std::fs::{self, File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

static UNSAFE_PREFIX_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("Invalid regex: prefix chars"));

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_prefix(prefix: &str) -> String {
    UNSAFE_PREFIX_CHARS.replace_all(prefix, "_").into_owned()
}

/// Build `{prefix}_{YYYYMMDD_HHMMSS}.csv` for the given time.
pub fn timestamped_file_name(prefix: &str, at: DateTime<Local>) -> String {
    format!(
        "{}_{}.csv",
        sanitize_prefix(prefix),
        at.format("%Y%m%d_%H%M%S")
    )
}

/// Convert records to a five-column string DataFrame in canonical order.
///
/// Empty values become nulls so the CSV writer leaves those cells bare
/// instead of writing `""`.
pub fn records_to_frame(records: &[CanonicalRecord]) -> Result<DataFrame> {
    let columns: Vec<Column> = CanonicalField::ALL
        .iter()
        .map(|&field| {
            let values: Vec<Option<&str>> = records
                .iter()
                .map(|r| Some(r.get(field)).filter(|v| !v.is_empty()))
                .collect();
            Column::new(field.as_str().into(), values)
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Writes cleaned record sets into an output directory.
#[derive(Debug, Clone)]
pub struct LeadWriter {
    output_dir: PathBuf,
}

impl LeadWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write `records` to a new, uniquely named file and return its name.
    ///
    /// The file is claimed with create-new semantics; when the timestamped
    /// name is taken, `_2`, `_3`, ... is appended. A failed write removes the
    /// partial file.
    pub fn write(&self, prefix: &str, records: &[CanonicalRecord]) -> Result<String> {
        fs::create_dir_all(&self.output_dir)?;

        let (file_name, path, mut file) = self.claim_file(prefix)?;
        let mut frame = records_to_frame(records)?;

        let written = CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(&mut frame);

        if let Err(e) = written {
            drop(file);
            if let Err(remove_err) = fs::remove_file(&path) {
                warn!(
                    "Could not remove partial output {}: {}",
                    path.display(),
                    remove_err
                );
            }
            return Err(e.into());
        }

        info!("Dataset saved: {} ({} rows)", path.display(), records.len());
        Ok(file_name)
    }

    fn claim_file(&self, prefix: &str) -> Result<(String, PathBuf, File)> {
        let base = timestamped_file_name(prefix, Local::now());
        let stem = base.trim_end_matches(".csv").to_string();

        let mut attempt = 1usize;
        loop {
            let file_name = if attempt == 1 {
                base.clone()
            } else {
                format!("{}_{}.csv", stem, attempt)
            };
            let path = self.output_dir.join(&file_name);

            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => return Ok((file_name, path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!("{} exists, trying next suffix", file_name);
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Read up to `limit` rows from a previously written output file.
    pub fn preview(&self, file_name: &str, limit: usize) -> Result<Vec<CanonicalRecord>> {
        preview_file(&self.output_dir, file_name, limit)
    }
}

/// Read up to `limit` rows of `file_name` inside `output_dir`.
///
/// Only plain file names are accepted. All values are read as text and
/// missing cells come back as empty strings.
pub fn preview_file(output_dir: &Path, file_name: &str, limit: usize) -> Result<Vec<CanonicalRecord>> {
    if file_name.is_empty()
        || file_name.contains('/')
        || file_name.contains('\\')
        || file_name.contains("..")
    {
        return Err(LeadError::InvalidFileName(file_name.to_string()));
    }

    let path = output_dir.join(file_name);
    if !path.is_file() {
        return Err(LeadError::Io(std::io::Error::new(
            ErrorKind::NotFound,
            format!("{} not found", path.display()),
        )));
    }

    let frame = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_n_rows(Some(limit))
        .try_into_reader_with_file_path(Some(path))?
        .finish()?;

    let mut records = vec![CanonicalRecord::default(); frame.height()];
    for field in CanonicalField::ALL {
        let column = frame
            .column(field.as_str())
            .map_err(|_| LeadError::ColumnNotFound(field.as_str().to_string()))?;
        let values = column.str()?;
        for (record, value) in records.iter_mut().zip(values.into_iter()) {
            record.set(field, value.unwrap_or(""));
        }
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<CanonicalRecord> {
        vec![
            CanonicalRecord::new("Alice", "a@x.com", "0123", "Acme, Inc.", "CEO"),
            CanonicalRecord::new("Bob", "b@x.com", "", "Initech", "CTO"),
        ]
    }

    #[test]
    fn test_sanitize_prefix() {
        assert_eq!(sanitize_prefix("valid_leads"), "valid_leads");
        assert_eq!(sanitize_prefix("my leads/2024.v1"), "my_leads_2024_v1");
        assert_eq!(sanitize_prefix("ok-name"), "ok-name");
    }

    #[test]
    fn test_timestamped_file_name() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            timestamped_file_name("valid leads", at),
            "valid_leads_20240309_070501.csv"
        );
    }

    #[test]
    fn test_write_then_preview() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LeadWriter::new(dir.path());

        let name = writer.write("valid_leads", &sample()).unwrap();
        assert!(name.starts_with("valid_leads_"));
        assert!(name.ends_with(".csv"));

        let contents = fs::read_to_string(dir.path().join(&name)).unwrap();
        assert!(contents.starts_with("Name,Email,Phone,Company,Title\n"));
        assert!(contents.contains("\"Acme, Inc.\""));

        let preview = writer.preview(&name, 10).unwrap();
        assert_eq!(preview, sample());
    }

    #[test]
    fn test_empty_fields_are_written_bare() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LeadWriter::new(dir.path());
        let records = vec![CanonicalRecord::new("Bob", "b@x.com", "", "", "CTO")];

        let name = writer.write("valid_leads", &records).unwrap();

        let contents = fs::read_to_string(dir.path().join(&name)).unwrap();
        assert_eq!(contents, "Name,Email,Phone,Company,Title\nBob,b@x.com,,,CTO\n");
        assert_eq!(writer.preview(&name, 10).unwrap(), records);
    }

    #[test]
    fn test_preview_respects_limit() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LeadWriter::new(dir.path());
        let name = writer.write("valid_leads", &sample()).unwrap();

        let preview = writer.preview(&name, 1).unwrap();
        assert_eq!(preview.len(), 1);
        assert_eq!(preview[0].name, "Alice");
    }

    #[test]
    fn test_same_second_writes_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LeadWriter::new(dir.path());

        let names: Vec<String> = (0..3)
            .map(|_| writer.write("valid_leads", &sample()).unwrap())
            .collect();

        assert_ne!(names[0], names[1]);
        assert_ne!(names[1], names[2]);
        assert_ne!(names[0], names[2]);
    }

    #[test]
    fn test_empty_record_set_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let writer = LeadWriter::new(dir.path());
        let name = writer.write("filtered_leads", &[]).unwrap();

        let contents = fs::read_to_string(dir.path().join(&name)).unwrap();
        assert_eq!(contents.trim_end(), "Name,Email,Phone,Company,Title");
        assert!(writer.preview(&name, 10).unwrap().is_empty());
    }

    #[test]
    fn test_preview_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        for bad in ["../secret.csv", "a/b.csv", "..", ""] {
            assert!(matches!(
                preview_file(dir.path(), bad, 10),
                Err(LeadError::InvalidFileName(_))
            ));
        }
    }

    #[test]
    fn test_preview_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(preview_file(dir.path(), "nope.csv", 10).is_err());
    }
}
