//! Error types for the lead cleaning pipeline.
//!
//! Every failure a run can hit is a variant of [`LeadError`]. The host layer
//! (CLI, HTTP handler, desktop shell) shows [`LeadError::user_message`] to the
//! user and can branch on [`LeadError::error_code`].
//!
//! Errors are serializable as `{ code, message }` so they can be handed to a
//! frontend as-is.

use crate::types::CanonicalField;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the lead cleaning pipeline.
#[derive(Error, Debug)]
pub enum LeadError {
    /// The uploaded file's extension is not in the allow-list.
    #[error("Invalid file type: '{0}' (expected csv, txt, xls or xlsx)")]
    FileTypeRejected(String),

    /// The input file could not be read or parsed.
    #[error("Error processing file: {0}")]
    LoadFailure(String),

    /// One or more canonical fields had no matching source column.
    #[error("Could not find columns for: {}", join_fields(.missing))]
    ColumnMappingIncomplete { missing: Vec<CanonicalField> },

    /// The filter path was invoked without a single usable role token.
    #[error("Please enter at least one role to filter by.")]
    EmptyRoleSelection,

    /// A column expected in a persisted output file is absent.
    #[error("Column '{0}' not found in file")]
    ColumnNotFound(String),

    /// A preview was requested for a name that is not a plain file name.
    #[error("Invalid output file name: '{0}'")]
    InvalidFileName(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal error (unexpected state).
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Delimited text parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet (xls/xlsx) reading error.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<LeadError>,
    },
}

fn join_fields(fields: &[CanonicalField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl LeadError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        LeadError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Strip any context wrappers and return the underlying error.
    pub fn root(&self) -> &LeadError {
        match self {
            Self::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::FileTypeRejected(_) => "FILE_TYPE_REJECTED",
            Self::LoadFailure(_) => "LOAD_FAILURE",
            Self::ColumnMappingIncomplete { .. } => "COLUMN_MAPPING_INCOMPLETE",
            Self::EmptyRoleSelection => "EMPTY_ROLE_SELECTION",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidFileName(_) => "INVALID_FILE_NAME",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Csv(_) => "CSV_ERROR",
            Self::Spreadsheet(_) => "SPREADSHEET_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error was caused by user input rather than by processing.
    ///
    /// Input errors are reported before any file is touched; the run can be
    /// retried with corrected input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.root(),
            Self::FileTypeRejected(_) | Self::EmptyRoleSelection | Self::InvalidFileName(_)
        )
    }

    /// The single line shown to the user when a run fails.
    pub fn user_message(&self) -> String {
        match self.root() {
            Self::ColumnMappingIncomplete { .. } => format!(
                "{}. Looking for columns like {}",
                self.root(),
                join_fields(&CanonicalField::ALL)
            ),
            Self::FileTypeRejected(_) => "Invalid file type.".to_string(),
            Self::EmptyRoleSelection | Self::InvalidFileName(_) => self.root().to_string(),
            _ => format!("Failed to process file: {}", self),
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for LeadError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("LeadError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.user_message())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, LeadError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}
