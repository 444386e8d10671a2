//! Shared checks and ordering for free-text fields.

use std::cmp::Ordering;

/// Return `value` unchanged unless it is blank once trimmed.
pub(crate) fn require_text<E>(value: String, error: E) -> Result<String, E> {
    if value.trim().is_empty() {
        Err(error)
    } else {
        Ok(value)
    }
}

/// Collapse blank optional text to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// Compare case-folded text first, falling back to bytes for ties.
///
/// Approximates the locale collation PostgreSQL applies to `ORDER BY` on
/// text columns closely enough for ASCII names.
pub(crate) fn collate(left: &str, right: &str) -> Ordering {
    left.to_lowercase()
        .cmp(&right.to_lowercase())
        .then_with(|| left.cmp(right))
}
