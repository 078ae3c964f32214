//! Core data types shared across the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Canonical schema
// ============================================================================

/// One of the five fields every cleaned contact carries.
///
/// The declaration order is significant: column inference processes fields
/// in this order, and the output file lists them in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalField {
    Name,
    Email,
    Phone,
    Company,
    Title,
}

impl CanonicalField {
    /// All fields, in mapping and output order.
    pub const ALL: [CanonicalField; 5] = [
        CanonicalField::Name,
        CanonicalField::Email,
        CanonicalField::Phone,
        CanonicalField::Company,
        CanonicalField::Title,
    ];

    /// Column header used for this field in output files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Company => "Company",
            Self::Title => "Title",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contact normalized to the five-field schema.
///
/// Missing values are empty strings, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CanonicalRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub title: String,
}

impl CanonicalRecord {
    /// Build a record from its five values in canonical order.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        company: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            company: company.into(),
            title: title.into(),
        }
    }

    pub fn get(&self, field: CanonicalField) -> &str {
        match field {
            CanonicalField::Name => &self.name,
            CanonicalField::Email => &self.email,
            CanonicalField::Phone => &self.phone,
            CanonicalField::Company => &self.company,
            CanonicalField::Title => &self.title,
        }
    }

    pub fn set(&mut self, field: CanonicalField, value: impl Into<String>) {
        let value = value.into();
        match field {
            CanonicalField::Name => self.name = value,
            CanonicalField::Email => self.email = value,
            CanonicalField::Phone => self.phone = value,
            CanonicalField::Company => self.company = value,
            CanonicalField::Title => self.title = value,
        }
    }

    /// Deduplication key: the trimmed, lowercased email.
    pub fn dedup_key(&self) -> String {
        self.email.trim().to_lowercase()
    }
}

// ============================================================================
// Column mapping
// ============================================================================

/// Source column chosen for each canonical field.
///
/// Only constructed once every field has a match, so lookups never fail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    columns: [String; 5],
}

impl ColumnMapping {
    pub(crate) fn new(columns: [String; 5]) -> Self {
        Self { columns }
    }

    /// The source header mapped to `field`.
    pub fn source(&self, field: CanonicalField) -> &str {
        &self.columns[field as usize]
    }

    /// `(field, source header)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &str)> {
        CanonicalField::ALL
            .iter()
            .map(move |&field| (field, self.source(field)))
    }
}

// ============================================================================
// Results
// ============================================================================

/// Counts produced by the record sanitizer.
///
/// Always `input_count >= after_dedup_count >= valid_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeCounts {
    pub input_count: usize,
    pub after_dedup_count: usize,
    pub valid_count: usize,
}

impl SanitizeCounts {
    pub fn duplicates_removed(&self) -> usize {
        self.input_count - self.after_dedup_count
    }

    pub fn invalid_removed(&self) -> usize {
        self.after_dedup_count - self.valid_count
    }
}

/// Result of the valid-leads path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidLeadsResult {
    pub output_file_name: String,
    pub total_uploaded: usize,
    pub duplicates_removed: usize,
    pub invalid_removed: usize,
    pub valid_count: usize,
    pub preview_rows: Vec<CanonicalRecord>,
}

impl ValidLeadsResult {
    /// One-line summary of the run.
    pub fn summary_line(&self) -> String {
        format!(
            "Successfully Processed: {} Records | {} Duplicate Emails Removed | {} Invalid Emails Removed | {} Valid Emails",
            self.total_uploaded, self.duplicates_removed, self.invalid_removed, self.valid_count
        )
    }
}

/// Result of the filtered-leads path.
///
/// Counts are relative to the uploaded row count: every row that did not
/// end up in the output is "non-matching", whether it was dropped as a
/// duplicate, as invalid, or by the role filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilteredLeadsResult {
    pub output_file_name: String,
    pub total_uploaded: usize,
    pub non_matching_removed: usize,
    pub matched_count: usize,
    pub preview_rows: Vec<CanonicalRecord>,
    /// Sanitizer counts before the role filter was applied.
    pub sanitize_counts: SanitizeCounts,
}

impl FilteredLeadsResult {
    /// One-line summary of the run.
    pub fn summary_line(&self) -> String {
        format!(
            "Filtered {} Records From {} Uploaded File After Removing {} Non-matching Records.",
            self.matched_count, self.total_uploaded, self.non_matching_removed
        )
    }
}
