//! Helpers shared by the paginated Diesel repositories.

use pagination::PageRequest;

/// Build an `ILIKE` pattern that matches `needle` anywhere in a column.
///
/// `%`, `_` and `\` in the needle are escaped so they match literally.
pub(crate) fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// `OFFSET`/`LIMIT` pair for a page request, as Diesel expects them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageWindow {
    pub offset: i64,
    pub limit: i64,
}

impl PageWindow {
    /// Convert a page request, failing when the offset leaves the `i64` range.
    pub(crate) fn try_from_request(request: PageRequest) -> Result<Self, &'static str> {
        let offset =
            i64::try_from(request.offset()).map_err(|_| "page offset exceeds i64 range")?;
        let limit = i64::try_from(request.limit()).map_err(|_| "page size exceeds i64 range")?;
        Ok(Self { offset, limit })
    }
}

/// Convert a `COUNT(*)` result into the domain's unsigned total.
pub(crate) fn count_to_total(count: i64) -> Result<u64, &'static str> {
    u64::try_from(count).map_err(|_| "negative row count")
}

/// Convert a `latest(limit)` argument into a SQL limit.
pub(crate) fn latest_limit(limit: usize) -> Result<i64, &'static str> {
    i64::try_from(limit).map_err(|_| "requested limit exceeds i64 range")
}
