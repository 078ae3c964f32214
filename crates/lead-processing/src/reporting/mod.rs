//! Output module.
//!
//! Cleaned record sets are persisted as CSV files named
//! `{prefix}_{YYYYMMDD_HHMMSS}.csv` with the header
//! `Name,Email,Phone,Company,Title`. Persisted files can be re-previewed
//! later without re-running the pipeline.

mod writer;

pub use writer::{
    LeadWriter, preview_file, records_to_frame, sanitize_prefix, timestamped_file_name,
};
