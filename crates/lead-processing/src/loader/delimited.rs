//! Delimited text (csv/txt) reading.

use super::{ColumnBuffer, MAX_COLUMNS};
use crate::error::{LeadError, Result};
use crate::loader::headers::normalize_headers;
use polars::prelude::*;
use std::path::Path;
use tracing::debug;

/// Read a delimited file into a string-typed DataFrame.
///
/// Only the first [`MAX_COLUMNS`] columns are kept. When `chunk_rows` is set,
/// rows are buffered at most `chunk_rows` at a time and each full buffer is
/// appended to the result before the next one is filled.
pub(crate) fn read_delimited(path: &Path, chunk_rows: Option<usize>) -> Result<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let raw_headers = reader.headers()?.clone();
    if raw_headers.is_empty() {
        return Err(LeadError::LoadFailure(
            "No columns to parse from file".to_string(),
        ));
    }

    let headers = normalize_headers(raw_headers.iter().take(MAX_COLUMNS));
    let capacity = chunk_rows.unwrap_or(0);
    let mut buffer = ColumnBuffer::new(headers, capacity);
    let mut frame: Option<DataFrame> = None;
    let mut chunks = 0usize;

    let mut record = csv::StringRecord::new();
    while reader.read_record(&mut record)? {
        buffer.push_row(record.iter());

        if let Some(limit) = chunk_rows
            && buffer.len() >= limit
        {
            append_chunk(&mut frame, buffer.take_frame()?)?;
            chunks += 1;
        }
    }

    if !buffer.is_empty() || frame.is_none() {
        append_chunk(&mut frame, buffer.take_frame()?)?;
        chunks += 1;
    }

    debug!("Read {} in {} chunk(s)", path.display(), chunks);

    frame.ok_or_else(|| LeadError::Internal("no frame produced by reader".to_string()))
}

fn append_chunk(frame: &mut Option<DataFrame>, chunk: DataFrame) -> Result<()> {
    match frame {
        Some(existing) => {
            existing.vstack_mut(&chunk)?;
        }
        None => *frame = Some(chunk),
    }
    Ok(())
}
