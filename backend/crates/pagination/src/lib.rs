//! Shared limit/offset pagination window primitives for backend listing
//! endpoints.
//!
//! Listing endpoints accept a page window as query parameters and return a
//! page of items together with the total number of rows matching the same
//! filter. This crate owns the window invariants so adapters and repositories
//! agree on the bounds without re-checking them.

/// Page size applied when the client does not supply a `limit`.
pub const DEFAULT_LIMIT: i64 = 20;

/// Largest page size a client may request.
pub const MAX_LIMIT: i64 = 100;

/// Errors raised when constructing a [`PageRequest`] from raw bounds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageBoundsError {
    /// The requested limit falls outside `1..=MAX_LIMIT`.
    #[error("limit must be between 1 and {max}, got {got}")]
    LimitOutOfRange {
        /// Largest accepted limit.
        max: i64,
        /// Value the caller supplied.
        got: i64,
    },
    /// The requested offset is negative.
    #[error("offset must not be negative, got {got}")]
    OffsetNegative {
        /// Value the caller supplied.
        got: i64,
    },
}

/// Check one limit bound, for callers that collect violations exhaustively.
///
/// # Errors
/// Returns [`PageBoundsError::LimitOutOfRange`] outside `1..=MAX_LIMIT`.
pub fn check_limit(limit: i64) -> Result<i64, PageBoundsError> {
    if (1..=MAX_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(PageBoundsError::LimitOutOfRange {
            max: MAX_LIMIT,
            got: limit,
        })
    }
}

/// Check one offset bound, for callers that collect violations exhaustively.
///
/// # Errors
/// Returns [`PageBoundsError::OffsetNegative`] for negative offsets.
pub fn check_offset(offset: i64) -> Result<i64, PageBoundsError> {
    if offset >= 0 {
        Ok(offset)
    } else {
        Err(PageBoundsError::OffsetNegative { got: offset })
    }
}

/// Validated page window for a listing query.
///
/// ## Invariants
/// - `limit` is within `1..=MAX_LIMIT`.
/// - `offset` is non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: i64,
    offset: i64,
}

impl PageRequest {
    /// Validate raw bounds into a page window.
    ///
    /// # Errors
    /// Returns [`PageBoundsError`] when either bound is outside its range.
    pub fn new(limit: i64, offset: i64) -> Result<Self, PageBoundsError> {
        let limit = check_limit(limit)?;
        let offset = check_offset(offset)?;
        Ok(Self { limit, offset })
    }

    /// Number of items in the requested page.
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Number of items skipped before the page starts.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// One page of repository results plus the unpaged total.
///
/// `total` counts every live row matching the query's filter, not just the
/// rows in `items`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paged<T> {
    /// Items within the requested window.
    pub items: Vec<T>,
    /// Rows matching the filter across all pages.
    pub total: u64,
}

impl<T> Paged<T> {
    /// Build a page from its parts.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64) -> Self {
        Self { items, total }
    }

    /// Empty page with a zero total.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// Map every item of the page, preserving the total.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this crate.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 0)]
    #[case(DEFAULT_LIMIT, 0)]
    #[case(MAX_LIMIT, 500)]
    fn accepts_bounds_within_range(#[case] limit: i64, #[case] offset: i64) {
        let page = PageRequest::new(limit, offset).expect("bounds within range");
        assert_eq!(page.limit(), limit);
        assert_eq!(page.offset(), offset);
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    #[case(MAX_LIMIT + 1)]
    fn rejects_limit_outside_range(#[case] limit: i64) {
        let err = PageRequest::new(limit, 0).expect_err("limit outside range");
        assert_eq!(
            err,
            PageBoundsError::LimitOutOfRange {
                max: MAX_LIMIT,
                got: limit
            }
        );
    }

    #[test]
    fn rejects_negative_offset() {
        let err = PageRequest::new(DEFAULT_LIMIT, -1).expect_err("negative offset");
        assert_eq!(err, PageBoundsError::OffsetNegative { got: -1 });
    }

    #[test]
    fn per_bound_checks_mirror_the_constructor() {
        assert!(check_limit(MAX_LIMIT).is_ok());
        assert!(check_limit(0).is_err());
        assert!(check_offset(0).is_ok());
        assert!(check_offset(-1).is_err());
    }

    #[test]
    fn default_window_matches_documented_values() {
        let page = PageRequest::default();
        assert_eq!(page.limit(), DEFAULT_LIMIT);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn map_preserves_total() {
        let page = Paged::new(vec![1_i64, 2, 3], 42).map(|n| n * 2);
        assert_eq!(page.items, vec![2, 4, 6]);
        assert_eq!(page.total, 42);
    }

    #[test]
    fn empty_page_has_no_items() {
        let page = Paged::<i64>::empty();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }
}
