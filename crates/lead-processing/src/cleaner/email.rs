//! Email syntax validation.

use once_cell::sync::Lazy;
use regex::Regex;

// local@domain.tld, with a final label of two or more letters
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$")
        .expect("Invalid regex: email")
});

/// Check whether `email` is a syntactically valid address.
///
/// Surrounding whitespace is ignored; an empty value is never valid.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && EMAIL_PATTERN.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_addresses() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co.uk"));
        assert!(is_valid_email("user_name%x@host-name.io"));
        assert!(is_valid_email("  padded@example.org  "));
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("   "));
        assert!(!is_valid_email("bad-email"));
        assert!(!is_valid_email("no-at.example.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@example.c"));
        assert!(!is_valid_email("user@example.c0m"));
        assert!(!is_valid_email("two words@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
    }
}
