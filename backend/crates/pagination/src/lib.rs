//! Offset pagination primitives shared by course-admin list endpoints.
//!
//! A [`PageRequest`] captures the 1-indexed `page` and the `pageSize`
//! requested by a client and exposes the derived `offset`/`limit` pair used by
//! storage adapters. A [`Page`] pairs the returned slice with the total number
//! of matching rows so callers can render "page P of N" without a second
//! round trip.
//!
//! # Examples
//!
//! ```
//! use pagination::{Page, PageRequest};
//!
//! let request = PageRequest::new(2, 5)?;
//! assert_eq!(request.offset(), 5);
//!
//! let page = Page::from_sorted((1..=12).collect::<Vec<u32>>(), request);
//! assert_eq!(page.items(), &[6, 7, 8, 9, 10]);
//! assert_eq!(page.total(), 12);
//! assert_eq!(page.page_count(), 3);
//! # Ok::<(), pagination::PageRequestError>(())
//! ```

use serde::Serialize;
use thiserror::Error;

/// Page number used when the client omits `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the client omits `pageSize`.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors raised when a page request falls outside the accepted range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// `page` was zero or negative.
    #[error("page must be at least 1, got {value}")]
    PageOutOfRange {
        /// Rejected raw value.
        value: i64,
    },
    /// `pageSize` was zero, negative, or above [`MAX_PAGE_SIZE`].
    #[error("pageSize must be between 1 and {max}, got {value}")]
    PageSizeOutOfRange {
        /// Rejected raw value.
        value: i64,
        /// Inclusive upper bound.
        max: u32,
    },
}

/// Validated 1-indexed page request.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= page_size <= MAX_PAGE_SIZE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    /// Validate and construct a page request.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when either value is out of range.
    pub fn new(page: u32, page_size: u32) -> Result<Self, PageRequestError> {
        Self::from_raw(Some(i64::from(page)), Some(i64::from(page_size)))
    }

    /// Build a request from optional raw query values, applying defaults for
    /// missing values.
    ///
    /// # Errors
    /// Returns [`PageRequestError`] when a supplied value is out of range.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, PageRequestError};
    ///
    /// let defaults = PageRequest::from_raw(None, None)?;
    /// assert_eq!((defaults.page(), defaults.page_size()), (1, 10));
    ///
    /// let err = PageRequest::from_raw(Some(0), None).unwrap_err();
    /// assert_eq!(err, PageRequestError::PageOutOfRange { value: 0 });
    /// # Ok::<(), PageRequestError>(())
    /// ```
    pub fn from_raw(
        raw_page: Option<i64>,
        raw_page_size: Option<i64>,
    ) -> Result<Self, PageRequestError> {
        let page = match raw_page {
            None => DEFAULT_PAGE,
            Some(value) => u32::try_from(value)
                .ok()
                .filter(|parsed| *parsed >= 1)
                .ok_or(PageRequestError::PageOutOfRange { value })?,
        };
        let page_size = match raw_page_size {
            None => DEFAULT_PAGE_SIZE,
            Some(value) => u32::try_from(value)
                .ok()
                .filter(|parsed| (1..=MAX_PAGE_SIZE).contains(parsed))
                .ok_or(PageRequestError::PageSizeOutOfRange {
                    value,
                    max: MAX_PAGE_SIZE,
                })?,
        };
        Ok(Self { page, page_size })
    }

    /// 1-indexed page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items on the page.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows skipped before the page starts.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Number of rows to fetch.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.page_size)
    }
}

/// A slice of results plus the total count of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    items: Vec<T>,
    total: u64,
    request: PageRequest,
}

impl<T> Page<T> {
    /// Wrap an already-sliced result set.
    #[must_use]
    pub const fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    /// Slice an ordered, fully materialised result set.
    ///
    /// The total is the length of `ordered`; the page holds at most
    /// `page_size` items starting at the request offset.
    #[must_use]
    pub fn from_sorted(ordered: Vec<T>, request: PageRequest) -> Self {
        let total = u64::try_from(ordered.len()).unwrap_or(u64::MAX);
        let skip = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let items = ordered.into_iter().skip(skip).take(take).collect();
        Self {
            items,
            total,
            request,
        }
    }

    /// Items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Total matching rows, independent of slicing.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The request that produced this page.
    #[must_use]
    pub const fn request(&self) -> PageRequest {
        self.request
    }

    /// Number of pages needed to show every matching row.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        self.total.div_ceil(u64::from(self.request.page_size))
    }

    /// Consume the page, returning its items and total.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, u64) {
        (self.items, self.total)
    }

    /// Transform every item while keeping the total and request.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}
