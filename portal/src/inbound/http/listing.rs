//! Server-side driver for list views.
//!
//! A list request carries `page` plus the screen's filters in the query
//! string. [`load_list`] runs a [`ListController`] load and applies the
//! silent reporting policy: a failed fetch renders the empty state and is
//! only logged. A stale link past the last page is answered with the last
//! page's rows.

use std::future::Future;

use pagination::{PageNav, PageRequest, Paginated};
use serde::Deserialize;

use super::html::{FormData, pagination as pagination_bar};
use super::report::{ReportPolicy, report};
use crate::domain::{Error, ListController, ListFilters, ListQuery, ViewState};

/// Query string of a list page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams<F> {
    /// Requested page; garbage and zero fall back to 1.
    #[serde(default)]
    pub page: Option<String>,
    /// Screen filters.
    #[serde(flatten)]
    pub filters: F,
}

impl<F> ListParams<F> {
    /// Requested page, leniently parsed.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|raw| raw.trim().parse().ok())
            .filter(|page| *page > 0)
            .unwrap_or(1)
    }
}

/// Rows and navigation of one rendered list.
#[derive(Debug)]
pub struct Listing<T, F> {
    /// Rows to display; empty after a failed load.
    pub rows: Vec<T>,
    /// Clamped navigation.
    pub nav: PageNav,
    /// Filters applied.
    pub filters: F,
}

impl<T, F: ListFilters> Listing<T, F> {
    /// Filter values for repopulating the filter form.
    #[must_use]
    pub fn filter_form(&self) -> FormData {
        FormData::from_pairs(self.filters.query_pairs())
    }

    /// Pagination bar whose links keep the active filters.
    #[must_use]
    pub fn pagination(&self, base: &str) -> String {
        pagination_bar(base, &self.filters.query_pairs(), self.nav)
    }
}

/// Load one page through a [`ListController`]; `fetch` runs again for the
/// last page when the requested one lies beyond it.
///
/// # Errors
///
/// Only authorization failures propagate, so they still end in a redirect.
pub async fn load_list<T, F, Fut>(
    params: ListParams<F>,
    page_size: u32,
    fetch: impl Fn(ListQuery<F>) -> Fut,
) -> Result<Listing<T, F>, Error>
where
    F: ListFilters,
    Fut: Future<Output = Result<Paginated<T>, Error>>,
{
    let page = params.page();
    let mut controller = ListController::new(
        PageRequest::lenient(Some(page), Some(page_size)),
        params.filters,
    );
    controller.load_clamped(fetch).await;
    let nav = controller.nav();
    let (query, state) = controller.into_parts();
    let rows = match state {
        ViewState::Loaded(page) => page.data,
        ViewState::Failed(error) => {
            report::<()>(Err(error), ReportPolicy::Silent)?;
            Vec::new()
        }
        ViewState::Idle | ViewState::Loading => Vec::new(),
    };
    Ok(Listing {
        rows,
        nav,
        filters: query.filters,
    })
}
