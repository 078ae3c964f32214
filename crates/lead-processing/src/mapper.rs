//! Column inference: which source header holds each canonical field.
//!
//! Inference is keyword-based. For each field, in the fixed order Name,
//! Email, Phone, Company, Title, the source headers are scanned in table
//! order and the first header whose lowercased, trimmed text contains any of
//! the field's keywords is chosen. A header claimed by an earlier field is
//! skipped by later fields, so one column never feeds two fields.

use crate::error::{LeadError, Result};
use crate::types::{CanonicalField, CanonicalRecord, ColumnMapping};
use polars::prelude::*;
use tracing::debug;

const NAME_KEYWORDS: &[&str] = &[
    "name",
    "full name",
    "contact name",
    "person",
    "fullname",
    "first name",
    "last name",
];

const EMAIL_KEYWORDS: &[&str] = &[
    "email",
    "e-mail",
    "email address",
    "contact email",
    "e mail",
];

const PHONE_KEYWORDS: &[&str] = &[
    "phone",
    "mobile",
    "contact",
    "phone number",
    "telephone",
    "mobile no",
    "contact number",
    "phone no",
];

const COMPANY_KEYWORDS: &[&str] = &[
    "company",
    "organization",
    "firm",
    "company name",
    "employer",
    "organisation",
    "workplace",
];

const TITLE_KEYWORDS: &[&str] = &[
    "title",
    "position",
    "role",
    "job title",
    "designation",
    "occupation",
    "job role",
    "job position",
];

/// Candidate keywords for a canonical field (case-insensitive substrings).
pub fn keywords(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::Name => NAME_KEYWORDS,
        CanonicalField::Email => EMAIL_KEYWORDS,
        CanonicalField::Phone => PHONE_KEYWORDS,
        CanonicalField::Company => COMPANY_KEYWORDS,
        CanonicalField::Title => TITLE_KEYWORDS,
    }
}

fn header_matches(header: &str, keywords: &[&str]) -> bool {
    let lowered = header.trim().to_lowercase();
    keywords.iter().any(|k| lowered.contains(k))
}

/// Infer the column mapping for a set of headers.
///
/// Fails with [`LeadError::ColumnMappingIncomplete`] naming every field that
/// found no header.
pub fn map_columns<S: AsRef<str>>(headers: &[S]) -> Result<ColumnMapping> {
    let mut claimed = vec![false; headers.len()];
    let mut sources: [Option<String>; 5] = Default::default();

    for field in CanonicalField::ALL {
        let found = headers.iter().enumerate().find(|(idx, header)| {
            !claimed[*idx] && header_matches(header.as_ref(), keywords(field))
        });

        if let Some((idx, header)) = found {
            claimed[idx] = true;
            debug!("Mapped '{}' -> {}", header.as_ref(), field);
            sources[field as usize] = Some(header.as_ref().to_string());
        }
    }

    let missing: Vec<CanonicalField> = CanonicalField::ALL
        .into_iter()
        .filter(|field| sources[*field as usize].is_none())
        .collect();

    if !missing.is_empty() {
        return Err(LeadError::ColumnMappingIncomplete { missing });
    }

    Ok(ColumnMapping::new(sources.map(|s| s.unwrap_or_default())))
}

/// Rename mapped columns to canonical names and convert rows to records.
///
/// Consumes the frame. Each mapped column is released as soon as its values
/// are copied into the records, so the table and the records never both
/// exist in full. Columns not named by the mapping are dropped.
pub fn to_canonical_records(mut frame: DataFrame, mapping: &ColumnMapping) -> Result<Vec<CanonicalRecord>> {
    let mut records = vec![CanonicalRecord::default(); frame.height()];

    for (field, source) in mapping.iter() {
        let column = frame
            .drop_in_place(source)
            .map_err(|_| LeadError::ColumnNotFound(source.to_string()))?;
        let values = column.str()?;

        for (record, value) in records.iter_mut().zip(values.into_iter()) {
            record.set(field, value.unwrap_or(""));
        }
    }

    Ok(records)
}
