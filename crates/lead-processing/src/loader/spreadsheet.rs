//! Spreadsheet (xls/xlsx) reading.

use super::{ColumnBuffer, MAX_COLUMNS};
use crate::error::{LeadError, Result};
use crate::loader::headers::normalize_headers;
use calamine::{Data, Reader, open_workbook_auto};
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Read the first worksheet of a workbook into a string-typed DataFrame.
///
/// The first row is the header. Rows with no content at all are skipped.
pub(crate) fn read_spreadsheet(path: &Path) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path)?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| LeadError::LoadFailure("No worksheet found".to_string()))??;

    let mut rows = range.rows();
    let header_row = rows.next().ok_or_else(|| {
        LeadError::LoadFailure("No columns to parse from file".to_string())
    })?;

    let headers = normalize_headers(header_row.iter().take(MAX_COLUMNS).map(cell_text));
    let mut buffer = ColumnBuffer::new(headers, range.height().saturating_sub(1));
    let mut skipped = 0usize;

    for row in rows {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            skipped += 1;
            continue;
        }
        let values: Vec<String> = row.iter().take(MAX_COLUMNS).map(cell_text).collect();
        buffer.push_row(values.iter().map(String::as_str));
    }

    if skipped > 0 {
        debug!("Skipped {} blank worksheet rows", skipped);
    }

    buffer.take_frame()
}

/// Render a cell as text without numeric reformatting.
///
/// Whole numbers stored as floats drop the trailing `.0` so phone numbers and
/// identifiers keep their digits exactly. Date cells render as
/// `YYYY-MM-DD HH:MM:SS`.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                format!("{}", *f as i64)
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => String::from(if *b { "True" } else { "False" }),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| dt.as_f64().to_string()),
        Data::DateTimeIso(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_whole_float_has_no_decimal() {
        assert_eq!(cell_text(&Data::Float(5551234.0)), "5551234");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
    }

    #[test]
    fn test_cell_text_basic_variants() {
        assert_eq!(cell_text(&Data::Empty), "");
        assert_eq!(cell_text(&Data::Int(42)), "42");
        assert_eq!(cell_text(&Data::Bool(true)), "True");
        assert_eq!(cell_text(&Data::String("CEO".to_string())), "CEO");
    }

    #[test]
    fn test_missing_workbook_fails() {
        let result = read_spreadsheet(Path::new("/nonexistent/contacts.xlsx"));
        assert!(result.is_err());
    }
}
