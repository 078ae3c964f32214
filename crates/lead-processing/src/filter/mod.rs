//! Role filtering on the Title field.
//!
//! A title matches a token when, comparing both trimmed and lowercased, any
//! of these holds (checked in this order):
//!
//! 1. title and token are equal
//! 2. the token is a substring of the title
//! 3. the title is a substring of the token
//! 4. the token occurs in the title as a whole word
//!
//! A record is kept when its title matches at least one token. Tokens are
//! not deduplicated against each other, so overlapping tokens ("VP" and
//! "Vice President") match independently.

pub mod tokens;

pub use tokens::{COMMON_ROLE_TOKENS, RoleTokens};

use crate::error::{LeadError, Result};
use crate::types::CanonicalRecord;
use regex::Regex;
use tracing::{debug, info};

/// A single prepared token.
#[derive(Debug, Clone)]
struct RoleToken {
    lowered: String,
    whole_word: Regex,
}

impl RoleToken {
    fn new(raw: &str) -> Result<Self> {
        let lowered = raw.trim().to_lowercase();
        let whole_word = Regex::new(&format!(r"\b{}\b", regex::escape(&lowered)))
            .map_err(|e| LeadError::Internal(format!("role pattern for '{}': {}", raw, e)))?;
        Ok(Self {
            lowered,
            whole_word,
        })
    }

    /// `title` must already be trimmed and lowercased.
    fn matches(&self, title: &str) -> bool {
        title == self.lowered
            || title.contains(self.lowered.as_str())
            || self.lowered.contains(title)
            || self.whole_word.is_match(title)
    }
}

/// Matches titles against a non-empty set of role tokens.
#[derive(Debug, Clone)]
pub struct RoleMatcher {
    tokens: Vec<RoleToken>,
}

impl RoleMatcher {
    /// Prepare a matcher. Blank tokens are ignored.
    ///
    /// Fails with [`LeadError::EmptyRoleSelection`] if no usable token remains.
    pub fn new(tokens: &RoleTokens) -> Result<Self> {
        let tokens = tokens
            .iter()
            .filter(|token| !token.trim().is_empty())
            .map(RoleToken::new)
            .collect::<Result<Vec<_>>>()?;

        if tokens.is_empty() {
            return Err(LeadError::EmptyRoleSelection);
        }

        Ok(Self { tokens })
    }

    /// Check a single title. Empty or whitespace-only titles never match.
    pub fn matches(&self, title: &str) -> bool {
        let title = title.trim().to_lowercase();
        if title.is_empty() {
            return false;
        }
        self.tokens.iter().any(|token| token.matches(&title))
    }

    /// Keep records whose title matches, preserving their order.
    pub fn filter(&self, records: Vec<CanonicalRecord>) -> Vec<CanonicalRecord> {
        let before = records.len();
        info!("Filtering {} records by {} role token(s)...", before, self.tokens.len());

        let kept: Vec<CanonicalRecord> = records
            .into_iter()
            .filter(|record| self.matches(&record.title))
            .collect();

        debug!("{} of {} records matched a role", kept.len(), before);
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn matcher(tokens: &[&str]) -> RoleMatcher {
        RoleMatcher::new(&RoleTokens::from_selection(tokens.iter().copied())).unwrap()
    }

    fn titled(title: &str) -> CanonicalRecord {
        CanonicalRecord::new("n", "n@x.com", "", "", title)
    }

    #[test]
    fn test_exact_and_case_insensitive() {
        let m = matcher(&["CEO"]);
        assert!(m.matches("CEO"));
        assert!(m.matches("  ceo "));
    }

    #[test]
    fn test_token_substring_of_title() {
        let m = matcher(&["manager"]);
        assert!(m.matches("Senior Account Manager"));
        // plain substring, no word boundary required
        assert!(m.matches("Managers Lead"));
    }

    #[test]
    fn test_title_substring_of_token() {
        // multi-word token against a shorter single-word title
        let m = matcher(&["Vice President"]);
        assert!(m.matches("President"));
        assert!(m.matches("Vice"));
    }

    #[test]
    fn test_abbreviation_is_not_expanded() {
        let m = matcher(&["CEO", "Founder"]);
        assert!(m.matches("CEO"));
        assert!(!m.matches("Chief Executive Officer"));
        assert!(!m.matches("Sales Rep"));
    }

    #[test]
    fn test_short_token_matches_inside_words() {
        let m = matcher(&["CTO"]);
        assert!(m.matches("Director"));
    }

    #[test]
    fn test_empty_titles_never_match() {
        let m = matcher(&["CEO"]);
        assert!(!m.matches(""));
        assert!(!m.matches("   "));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let m = matcher(&["C++ Lead"]);
        assert!(m.matches("Senior C++ Lead"));
        assert!(!m.matches("Senior C Lead"));
    }

    #[test]
    fn test_blank_tokens_are_ignored() {
        let m = matcher(&["", "  ", "Owner"]);
        assert!(m.matches("Business Owner"));
        assert!(!m.matches("Analyst"));
    }

    #[test]
    fn test_all_blank_tokens_rejected() {
        let result = RoleMatcher::new(&RoleTokens::from_selection(["  ", ""]));
        assert!(matches!(result, Err(LeadError::EmptyRoleSelection)));
        let result = RoleMatcher::new(&RoleTokens::default());
        assert!(matches!(result, Err(LeadError::EmptyRoleSelection)));
    }

    #[test]
    fn test_overlapping_tokens_both_match() {
        let m = matcher(&["VP", "Vice President"]);
        assert!(m.matches("VP Engineering"));
        assert!(m.matches("Vice President of Sales"));
    }

    #[test]
    fn test_filter_preserves_order() {
        let m = matcher(&["CEO", "Founder"]);
        let records = vec![
            titled("Chief Executive Officer"),
            titled("Co-Founder"),
            titled("CEO"),
            titled("Sales Rep"),
        ];
        let kept = m.filter(records);
        let titles: Vec<&str> = kept.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Co-Founder", "CEO"]);
    }
}
