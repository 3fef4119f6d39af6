//! Lenient parsing of raw query-string values into typed filter inputs
//!
//! Malformed input never rejects a request: every helper returns `None`
//! when the value is missing or unusable, and the caller omits the filter.

/// Longest search term kept, in characters
pub const MAX_TERM_CHARS: usize = 100;

/// Most tags accepted in one set-membership filter
pub const MAX_TAGS: usize = 25;

/// Normalize a free-text term: trim, collapse inner whitespace, cap length
pub fn text_term(raw: Option<&str>) -> Option<String> {
    let term = raw?
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_TERM_CHARS)
        .collect::<String>();
    let term = term.trim_end().to_string();
    (!term.is_empty()).then_some(term)
}

/// Parse a comma-separated tag list
///
/// Entries are trimmed, empty entries and duplicates dropped. An empty
/// result is absent.
pub fn tag_list(raw: Option<&str>) -> Option<Vec<String>> {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw?.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if tags.len() == MAX_TAGS {
            break;
        }
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    (!tags.is_empty()).then_some(tags)
}

/// Parse a finite numeric threshold
pub fn threshold(raw: Option<&str>) -> Option<f64> {
    raw?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}
