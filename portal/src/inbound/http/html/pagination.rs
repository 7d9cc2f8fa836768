//! Previous/next controls for list views.

use ::pagination::PageNav;
use url::form_urlencoded::Serializer;

use super::escape;

/// Link to `page` of `base`, carrying `filters`.
#[must_use]
pub fn page_href(base: &str, filters: &[(&str, String)], page: u32) -> String {
    let mut query = Serializer::new(String::new());
    for (name, value) in filters {
        query.append_pair(name, value);
    }
    query.append_pair("page", &page.to_string());
    format!("{base}?{}", query.finish())
}

/// Pagination bar; disabled controls render as inert spans.
///
/// # Examples
/// ```
/// use pagination::PageNav;
/// use portal::inbound::http::html::pagination::pagination;
///
/// let html = pagination("/articles", &[], PageNav::new(1, 3));
/// assert!(html.contains("<span class=\"disabled\" aria-disabled=\"true\">Précédent</span>"));
/// assert!(html.contains("href=\"/articles?page=2\""));
/// assert!(html.contains("Page 1 sur 3"));
/// ```
#[must_use]
pub fn pagination(base: &str, filters: &[(&str, String)], nav: PageNav) -> String {
    let control = |target: Option<u32>, label: &str, rel: &str| match target {
        Some(page) => format!(
            "<a rel=\"{rel}\" href=\"{}\">{label}</a>",
            escape(&page_href(base, filters, page))
        ),
        None => format!("<span class=\"disabled\" aria-disabled=\"true\">{label}</span>"),
    };
    format!(
        "<nav class=\"pagination\" aria-label=\"Pagination\">{}<span class=\"current\">Page {} sur {}</span>{}</nav>",
        control(nav.previous(), "Précédent", "prev"),
        nav.current(),
        nav.last(),
        control(nav.next(), "Suivant", "next"),
    )
}
