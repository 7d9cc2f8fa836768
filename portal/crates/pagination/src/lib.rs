//! Page-number pagination primitives shared by portal list views.
//!
//! The association backend paginates with 1-indexed page numbers and a page
//! size (`limit`), answering with a `{ data, meta }` envelope. This crate
//! owns the request side ([`PageRequest`]), the envelope ([`Paginated`] and
//! [`PageMeta`]) and the navigation state derived from it ([`PageNav`]), so
//! every list view clamps pages and disables controls the same way.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_LIMIT: u32 = 10;

/// Largest page size the portal will request from the backend.
pub const MAX_LIMIT: u32 = 100;

/// Validation failures raised by [`PageRequest::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PageRequestError {
    /// Pages are 1-indexed; zero is never a valid page.
    #[error("page numbers start at 1")]
    ZeroPage,
    /// The page size is zero or larger than [`MAX_LIMIT`].
    #[error("page size {limit} must be within 1..={max}")]
    LimitOutOfRange {
        /// Rejected page size.
        limit: u32,
        /// Largest accepted page size.
        max: u32,
    },
}

/// A validated request for one page of a collection.
///
/// ## Invariants
/// - `page >= 1`.
/// - `1 <= limit <= MAX_LIMIT`.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(2, 20).expect("valid request");
/// assert_eq!(request.page(), 2);
/// assert_eq!(request.limit(), 20);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a request, rejecting out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`PageRequestError`] when `page` is zero or `limit` falls
    /// outside `1..=MAX_LIMIT`.
    pub const fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page == 0 {
            return Err(PageRequestError::ZeroPage);
        }
        if limit == 0 || limit > MAX_LIMIT {
            return Err(PageRequestError::LimitOutOfRange {
                limit,
                max: MAX_LIMIT,
            });
        }
        Ok(Self { page, limit })
    }

    /// Build a request from untrusted query values, clamping instead of
    /// failing.
    ///
    /// Missing or zero pages become page 1; missing page sizes use
    /// [`DEFAULT_LIMIT`]; oversized ones are capped at [`MAX_LIMIT`].
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, MAX_LIMIT};
    ///
    /// let request = PageRequest::lenient(Some(0), Some(5_000));
    /// assert_eq!(request.page(), 1);
    /// assert_eq!(request.limit(), MAX_LIMIT);
    /// ```
    #[must_use]
    pub fn lenient(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    /// First page with the given size (clamped like [`Self::lenient`]).
    #[must_use]
    pub fn first(limit: u32) -> Self {
        Self::lenient(Some(1), Some(limit))
    }

    /// Same page size, different page (zero is treated as 1).
    #[must_use]
    pub fn with_page(self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }

    /// Requested 1-indexed page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Query parameters understood by the backend.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

/// Pagination metadata returned alongside a page of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Total number of records across all pages.
    pub total: u64,
    /// Page the backend served.
    pub page: u32,
    /// Page size the backend applied.
    pub limit: u32,
    /// Number of pages available; zero when the collection is empty.
    pub total_pages: u32,
}

impl PageMeta {
    /// Metadata describing an empty collection for `request`.
    #[must_use]
    pub const fn empty(request: PageRequest) -> Self {
        Self {
            total: 0,
            page: 1,
            limit: request.limit,
            total_pages: 0,
        }
    }

    /// Last reachable page; an empty collection still has one (empty) page.
    #[must_use]
    pub fn last_page(&self) -> u32 {
        self.total_pages.max(1)
    }
}

/// `{ data, meta }` envelope for one page of records.
///
/// # Examples
/// ```
/// use pagination::Paginated;
///
/// let json = r#"{"data":[1,2],"meta":{"total":12,"page":1,"limit":2,"totalPages":6}}"#;
/// let page: Paginated<u8> = serde_json::from_str(json).expect("valid envelope");
/// assert_eq!(page.meta.total_pages, 6);
/// assert_eq!(page.data, vec![1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Records on this page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

impl<T> Paginated<T> {
    /// Empty page shaped after `request`.
    #[must_use]
    pub const fn empty(request: PageRequest) -> Self {
        Self {
            data: Vec::new(),
            meta: PageMeta::empty(request),
        }
    }

    /// Whether this page carries no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Navigation state for this page.
    #[must_use]
    pub fn nav(&self) -> PageNav {
        PageNav::from_meta(&self.meta)
    }

    /// Transform every record while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

/// Previous/next navigation state for a paginated view.
///
/// ## Invariants
/// - `1 <= current <= last`.
///
/// # Examples
/// ```
/// use pagination::PageNav;
///
/// let nav = PageNav::new(9, 3);
/// assert_eq!(nav.current(), 3);
/// assert!(!nav.has_next());
/// assert!(nav.has_previous());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNav {
    current: u32,
    last: u32,
}

impl PageNav {
    /// Clamp `requested` into `[1, max(total_pages, 1)]`.
    #[must_use]
    pub fn new(requested: u32, total_pages: u32) -> Self {
        let last = total_pages.max(1);
        Self {
            current: requested.clamp(1, last),
            last,
        }
    }

    /// Navigation derived from backend metadata.
    #[must_use]
    pub fn from_meta(meta: &PageMeta) -> Self {
        Self::new(meta.page, meta.total_pages)
    }

    /// Page being displayed.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Last reachable page.
    #[must_use]
    pub const fn last(&self) -> u32 {
        self.last
    }

    /// `false` on the first page, where "previous" is disabled.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current > 1
    }

    /// `false` on the last page, where "next" is disabled.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current < self.last
    }

    /// Target of the "previous" control, if enabled.
    #[must_use]
    pub const fn previous(&self) -> Option<u32> {
        if self.has_previous() {
            Some(self.current - 1)
        } else {
            None
        }
    }

    /// Target of the "next" control, if enabled.
    #[must_use]
    pub const fn next(&self) -> Option<u32> {
        if self.has_next() {
            Some(self.current + 1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for request validation and navigation clamping.

    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, PageRequestError::ZeroPage)]
    #[case(1, 0, PageRequestError::LimitOutOfRange { limit: 0, max: MAX_LIMIT })]
    #[case(1, 101, PageRequestError::LimitOutOfRange { limit: 101, max: MAX_LIMIT })]
    fn rejects_invalid_requests(
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(page, limit), Err(expected));
    }

    #[rstest]
    #[case(None, None, 1, DEFAULT_LIMIT)]
    #[case(Some(0), Some(0), 1, 1)]
    #[case(Some(4), Some(25), 4, 25)]
    #[case(Some(2), Some(1_000), 2, MAX_LIMIT)]
    fn lenient_requests_clamp(
        #[case] page: Option<u32>,
        #[case] limit: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_limit: u32,
    ) {
        let request = PageRequest::lenient(page, limit);
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.limit(), expected_limit);
    }

    #[test]
    fn with_page_never_produces_page_zero() {
        let request = PageRequest::default().with_page(0);
        assert_eq!(request.page(), 1);
    }

    #[test]
    fn query_pairs_use_backend_names() {
        let request = PageRequest::new(3, 15).expect("valid request");
        assert_eq!(
            request.query_pairs(),
            [("page", "3".to_owned()), ("limit", "15".to_owned())]
        );
    }

    #[rstest]
    #[case(1, 1, false, false)]
    #[case(1, 4, false, true)]
    #[case(2, 4, true, true)]
    #[case(4, 4, true, false)]
    #[case(1, 0, false, false)]
    fn navigation_disables_controls_at_edges(
        #[case] page: u32,
        #[case] total_pages: u32,
        #[case] previous: bool,
        #[case] next: bool,
    ) {
        let nav = PageNav::new(page, total_pages);
        assert_eq!(nav.has_previous(), previous);
        assert_eq!(nav.has_next(), next);
    }

    #[rstest]
    #[case(7, 3, 3)]
    #[case(0, 3, 1)]
    #[case(5, 0, 1)]
    fn navigation_clamps_into_range(
        #[case] requested: u32,
        #[case] total_pages: u32,
        #[case] expected: u32,
    ) {
        let nav = PageNav::new(requested, total_pages);
        assert_eq!(nav.current(), expected);
        assert!(nav.current() >= 1 && nav.current() <= nav.last());
    }

    #[test]
    fn envelope_decodes_camel_case_meta() {
        let json = r#"{"data":["a"],"meta":{"total":1,"page":1,"limit":10,"totalPages":1}}"#;
        let page: Paginated<String> = serde_json::from_str(json).expect("envelope decodes");
        assert_eq!(page.meta.total_pages, 1);
        assert_eq!(page.nav().last(), 1);
        assert!(!page.is_empty());
    }

    #[test]
    fn empty_page_has_one_reachable_page() {
        let page: Paginated<u8> = Paginated::empty(PageRequest::default());
        assert!(page.is_empty());
        assert_eq!(page.meta.last_page(), 1);
        assert_eq!(page.nav().next(), None);
        assert_eq!(page.nav().previous(), None);
    }
}
