//! Record sanitization for canonical contacts.
//!
//! This module provides functionality for:
//! - Trimming email addresses
//! - Removing duplicate emails (case-insensitive, first occurrence wins)
//! - Dropping records whose email is not a valid address
//! - Sorting survivors by name

pub mod email;

pub use email::is_valid_email;

use crate::types::{CanonicalRecord, SanitizeCounts};
use std::collections::HashSet;
use tracing::{debug, info};

/// Output of [`RecordSanitizer::sanitize`].
#[derive(Debug, Clone)]
pub struct Sanitized {
    /// Deduplicated, valid records in case-insensitive name order.
    pub records: Vec<CanonicalRecord>,
    pub counts: SanitizeCounts,
}

/// Record sanitizer applied to every mapped table.
#[derive(Debug, Default, Clone, Copy)]
pub struct RecordSanitizer;

impl RecordSanitizer {
    /// Run the sanitization steps in order:
    ///
    /// 1. Trim the Email field
    /// 2. Deduplicate by lowercased email, keeping first occurrences in order
    /// 3. Drop records with an invalid email
    /// 4. Stable sort by lowercased Name
    pub fn sanitize(&self, records: Vec<CanonicalRecord>) -> Sanitized {
        let input_count = records.len();

        info!("Sanitizing {} records...", input_count);

        let records = Self::deduplicate(Self::trim_emails(records));
        let after_dedup_count = records.len();
        debug!(
            "Removed {} duplicate emails",
            input_count - after_dedup_count
        );

        let mut records: Vec<CanonicalRecord> = records
            .into_iter()
            .filter(|record| is_valid_email(&record.email))
            .collect();
        let valid_count = records.len();
        debug!(
            "Removed {} invalid emails",
            after_dedup_count - valid_count
        );

        Self::sort_by_name(&mut records);

        Sanitized {
            records,
            counts: SanitizeCounts {
                input_count,
                after_dedup_count,
                valid_count,
            },
        }
    }

    fn trim_emails(mut records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
        for record in records.iter_mut() {
            let trimmed = record.email.trim();
            if trimmed.len() != record.email.len() {
                record.email = trimmed.to_string();
            }
        }
        records
    }

    /// Keep the first record for each dedup key. Empty emails share one key.
    fn deduplicate(records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
        let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
        records
            .into_iter()
            .filter(|record| seen.insert(record.dedup_key()))
            .collect()
    }

    /// Case-insensitive, stable.
    pub(crate) fn sort_by_name(records: &mut [CanonicalRecord]) {
        records.sort_by_cached_key(|record| record.name.to_lowercase());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(name: &str, email: &str) -> CanonicalRecord {
        CanonicalRecord::new(name, email, "", "", "")
    }

    #[test]
    fn test_scenario_duplicate_and_invalid() {
        let input = vec![
            CanonicalRecord::new("Alice", "a@x.com", "1", "Co", "CEO"),
            CanonicalRecord::new("Bob", "bad-email", "2", "Co", "Manager"),
            CanonicalRecord::new("alice2", "A@X.com", "3", "Co", "Founder"),
        ];

        let result = RecordSanitizer.sanitize(input);

        assert_eq!(
            result.records,
            vec![CanonicalRecord::new("Alice", "a@x.com", "1", "Co", "CEO")]
        );
        assert_eq!(result.counts.input_count, 3);
        assert_eq!(result.counts.duplicates_removed(), 1);
        assert_eq!(result.counts.invalid_removed(), 1);
        assert_eq!(result.counts.valid_count, 1);
    }

    #[test]
    fn test_emails_are_trimmed_before_dedup() {
        let input = vec![record("A", "  dup@x.com "), record("B", "DUP@x.com")];
        let result = RecordSanitizer.sanitize(input);
        assert_eq!(result.records, vec![record("A", "dup@x.com")]);
        assert_eq!(result.counts.duplicates_removed(), 1);
    }

    #[test]
    fn test_first_occurrence_wins_even_if_invalid_later() {
        // the duplicate check runs before validation, so the first record's
        // key shadows a later copy regardless of validity
        let input = vec![record("Zed", "z@x.com"), record("Amy", "Z@X.COM")];
        let result = RecordSanitizer.sanitize(input);
        assert_eq!(result.records, vec![record("Zed", "z@x.com")]);
    }

    #[test]
    fn test_empty_emails_collapse_then_drop() {
        let input = vec![record("A", ""), record("B", "  "), record("C", "c@x.com")];
        let result = RecordSanitizer.sanitize(input);
        assert_eq!(result.counts.after_dedup_count, 2);
        assert_eq!(result.counts.valid_count, 1);
        assert_eq!(result.records, vec![record("C", "c@x.com")]);
    }

    #[test]
    fn test_sort_is_case_insensitive_and_stable() {
        let input = vec![
            record("bob", "1@x.com"),
            record("Alice", "2@x.com"),
            record("BOB", "3@x.com"),
            record("alice", "4@x.com"),
            record("Carol", "5@x.com"),
        ];
        let result = RecordSanitizer.sanitize(input);
        let emails: Vec<&str> = result.records.iter().map(|r| r.email.as_str()).collect();
        assert_eq!(
            emails,
            vec!["2@x.com", "4@x.com", "1@x.com", "3@x.com", "5@x.com"]
        );
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let input = vec![
            record("b", "b@x.com"),
            record("a", "a@x.com"),
            record("c", "B@x.com"),
            record("d", "not-an-email"),
        ];
        let once = RecordSanitizer.sanitize(input);
        let twice = RecordSanitizer.sanitize(once.records.clone());
        assert_eq!(once.records, twice.records);
        assert_eq!(twice.counts.duplicates_removed(), 0);
        assert_eq!(twice.counts.invalid_removed(), 0);
    }

    #[test]
    fn test_counts_add_up() {
        let input = vec![
            record("a", "a@x.com"),
            record("b", "a@x.com"),
            record("c", "c@"),
            record("d", "d@x.io"),
            record("e", "D@x.io"),
        ];
        let result = RecordSanitizer.sanitize(input);
        let counts = result.counts;
        assert_eq!(
            counts.duplicates_removed() + counts.invalid_removed() + counts.valid_count,
            counts.input_count
        );
        assert_eq!(counts.valid_count, 2);
    }

    #[test]
    fn test_empty_input() {
        let result = RecordSanitizer.sanitize(Vec::new());
        assert!(result.records.is_empty());
        assert_eq!(result.counts, SanitizeCounts::default());
    }
}
