//! Header and cell normalization applied while loading.

use std::collections::HashSet;
use tracing::warn;

/// Cell texts treated as missing values and loaded as the empty string.
///
/// Matching is exact and case-sensitive.
pub const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Normalize a single cell: missing markers become the empty string.
pub(crate) fn normalize_cell(value: &str) -> String {
    if MISSING_MARKERS.contains(&value) {
        String::new()
    } else {
        value.to_string()
    }
}

/// Trim header names and make them unique.
///
/// Blank headers become `Unnamed: {index}`. A repeated name keeps its first
/// occurrence and later copies get `.1`, `.2`, ... suffixes.
pub(crate) fn normalize_headers<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut headers = Vec::new();

    for (idx, header) in raw.into_iter().enumerate() {
        let trimmed = header.as_ref().trim_start_matches('\u{feff}').trim();
        let base = if trimmed.is_empty() {
            format!("Unnamed: {}", idx)
        } else {
            trimmed.to_string()
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }

        if name != base {
            warn!("Duplicate column '{}' renamed to '{}'", base, name);
        }

        seen.insert(name.clone());
        headers.push(name);
    }

    headers
}
