//! Shared contract of every paginated, filterable list view.
//!
//! A [`ListController`] owns the current [`ListQuery`] and the view state.
//! Loads are split into [`ListController::begin_load`] and
//! [`ListController::complete`] so that a completion which is no longer the
//! latest request is discarded instead of overwriting newer rows.
//!
//! The portal renders each list on the server with a fresh controller per
//! request, and its loads run one after another, so no completion is ever
//! superseded there. The ticket check only matters to callers that keep a
//! controller alive across overlapping loads.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use pagination::{PageNav, PageRequest, Paginated};

use super::{Error, ViewState};

/// Filters of one list view, rendered as backend query parameters.
pub trait ListFilters: Clone + Default {
    /// Non-empty filter values as `(name, value)` pairs.
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

impl ListFilters for () {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

/// Append `value` under `name` unless it is missing or blank.
///
/// # Examples
/// ```
/// use portal::domain::push_filter;
///
/// let mut pairs = Vec::new();
/// push_filter(&mut pairs, "search", Some("  "));
/// push_filter(&mut pairs, "status", Some("ACTIVE"));
/// assert_eq!(pairs, vec![("status", "ACTIVE".to_owned())]);
/// ```
pub fn push_filter(pairs: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<&str>) {
    if let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) {
        pairs.push((name, value.to_owned()));
    }
}

/// Trim a submitted filter value, mapping blanks to `None`.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|value| !value.is_empty())
}

/// Page plus filters of one list request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListQuery<F> {
    /// Requested page.
    pub page: PageRequest,
    /// Active filters.
    pub filters: F,
}

impl<F: ListFilters> ListQuery<F> {
    /// Query for `page` with `filters`.
    pub fn new(page: PageRequest, filters: F) -> Self {
        Self { page, filters }
    }

    /// Page, limit and non-empty filters as backend query parameters.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs: Vec<_> = self.page.query_pairs().into_iter().collect();
        pairs.extend(self.filters.query_pairs());
        pairs
    }
}

/// Ticket identifying one load request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Issues monotonically increasing tickets and remembers the latest.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: AtomicU64,
}

impl RequestSequencer {
    /// Issue a ticket that supersedes every earlier one.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Whether `ticket` is still the latest issued.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}

/// State holder shared by list views.
///
/// # Examples
/// ```
/// use pagination::{PageMeta, PageRequest, Paginated};
/// use portal::domain::ListController;
///
/// let mut list: ListController<&str, ()> = ListController::new(PageRequest::first(2), ());
/// let (ticket, query) = list.begin_load();
/// assert_eq!(query.page.page(), 1);
/// let page = Paginated {
///     data: vec!["a", "b"],
///     meta: PageMeta { total: 2, page: 1, limit: 2, total_pages: 1 },
/// };
/// assert!(list.complete(ticket, Ok(page)));
/// assert!(!list.nav().has_next());
/// ```
#[derive(Debug)]
pub struct ListController<T, F> {
    query: ListQuery<F>,
    state: ViewState<Paginated<T>>,
    sequencer: Arc<RequestSequencer>,
    past_end: bool,
}

impl<T, F: ListFilters> ListController<T, F> {
    /// Controller starting at `page` with `filters`.
    pub fn new(page: PageRequest, filters: F) -> Self {
        Self {
            query: ListQuery::new(page, filters),
            state: ViewState::Idle,
            sequencer: Arc::default(),
            past_end: false,
        }
    }

    /// Current query.
    pub fn query(&self) -> &ListQuery<F> {
        &self.query
    }

    /// Current load state.
    pub fn state(&self) -> &ViewState<Paginated<T>> {
        &self.state
    }

    /// Replace the filters; the page always goes back to 1.
    pub fn set_filters(&mut self, filters: F) {
        self.query.filters = filters;
        self.query.page = self.query.page.with_page(1);
    }

    /// Move to `page`; zero is treated as 1.
    pub fn set_page(&mut self, page: u32) {
        self.query.page = self.query.page.with_page(page);
    }

    /// Enter [`ViewState::Loading`] and hand out the query to fetch.
    pub fn begin_load(&mut self) -> (Ticket, ListQuery<F>) {
        self.state = ViewState::Loading;
        (self.sequencer.issue(), self.query.clone())
    }

    /// Apply a completed load; returns `false` when `ticket` was superseded.
    ///
    /// On success the displayed page is clamped into `[1, totalPages]`; the
    /// rows then belong to the requested page until [`Self::is_past_end`] is
    /// cleared by another load.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Paginated<T>, Error>) -> bool {
        if !self.sequencer.is_current(ticket) {
            return false;
        }
        self.past_end = false;
        if let Ok(page) = &result {
            let requested = self.query.page.page();
            let nav = PageNav::new(requested, page.meta.total_pages);
            self.past_end = page.meta.total_pages > 0 && requested > nav.current();
            self.query.page = self.query.page.with_page(nav.current());
        }
        self.state = ViewState::from_result(result);
        true
    }

    /// Fetch the current query with `fetch` and apply the result.
    pub async fn load<Fut>(&mut self, fetch: impl FnOnce(ListQuery<F>) -> Fut)
    where
        Fut: Future<Output = Result<Paginated<T>, Error>>,
    {
        let (ticket, query) = self.begin_load();
        let result = fetch(query).await;
        self.complete(ticket, result);
    }

    /// Load like [`Self::load`], fetching once more when the requested page
    /// lay past the last one, so the clamped page shows its own rows.
    pub async fn load_clamped<Fut>(&mut self, fetch: impl Fn(ListQuery<F>) -> Fut)
    where
        Fut: Future<Output = Result<Paginated<T>, Error>>,
    {
        self.load(&fetch).await;
        if self.past_end {
            self.load(&fetch).await;
        }
    }

    /// Whether the loaded rows came from a page past the last one.
    pub fn is_past_end(&self) -> bool {
        self.past_end
    }

    /// Rows on display; empty unless loaded.
    pub fn rows(&self) -> &[T] {
        self.state
            .loaded()
            .map(|page| page.data.as_slice())
            .unwrap_or_default()
    }

    /// Navigation for the current page; a failed or pending load counts as
    /// one empty page.
    pub fn nav(&self) -> PageNav {
        let total_pages = self.state.loaded().map_or(0, |page| page.meta.total_pages);
        PageNav::new(self.query.page.page(), total_pages)
    }

    /// Consume the controller, returning its query and state.
    pub fn into_parts(self) -> (ListQuery<F>, ViewState<Paginated<T>>) {
        (self.query, self.state)
    }
}
