//! Role token sources.

use serde::{Deserialize, Serialize};

/// Common decision-maker role words offered as selectable options.
pub const COMMON_ROLE_TOKENS: [&str; 12] = [
    "Founder",
    "CEO",
    "CTO",
    "COO",
    "Director",
    "Head",
    "Manager",
    "Owner",
    "President",
    "Vice President",
    "VP",
    "Chief",
];

/// Ordered list of role tokens to filter titles by.
///
/// Duplicates are allowed and order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleTokens(Vec<String>);

impl RoleTokens {
    /// Tokens picked from a list of options, kept as given.
    pub fn from_selection<I, S>(selected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(selected.into_iter().map(Into::into).collect())
    }

    /// Tokens typed as free text: one per line, trimmed, blank lines skipped.
    pub fn parse_free_text(text: &str) -> Self {
        Self(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Pick the token source the way the upload form does: the selection if
    /// anything was selected, otherwise the free text.
    pub fn resolve<S: Into<String>>(selected: Vec<S>, free_text: Option<&str>) -> Self {
        let selection = Self::from_selection(selected);
        match free_text {
            Some(text) if selection.is_empty() && !text.is_empty() => Self::parse_free_text(text),
            _ => selection,
        }
    }

    /// The preset option list.
    pub fn common() -> Self {
        Self::from_selection(COMMON_ROLE_TOKENS)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for RoleTokens {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_selection(iter)
    }
}
