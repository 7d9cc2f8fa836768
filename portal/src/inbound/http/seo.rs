//! `sitemap.xml` and `robots.txt`.

use std::future::Future;

use actix_web::http::header::{CACHE_CONTROL, ContentType};
use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, Utc};
use pagination::{MAX_LIMIT, PageRequest, Paginated};

use super::ApiResult;
use super::cache_control::PUBLIC_ONE_HOUR;
use super::report::{ReportPolicy, report};
use super::state::HttpState;
use crate::domain::models::{ArticleFilters, ProjectFilters};
use crate::domain::{Credentials, Error, ListFilters, ListQuery, escape_html};

const STATIC_PAGES: [&str; 7] = [
    "/",
    "/about",
    "/contact",
    "/articles",
    "/projects",
    "/events",
    "/trainings",
];
const DISALLOWED: [&str; 4] = ["/dashboard", "/admin", "/api", "/auth"];
const MAX_SITEMAP_PAGES: u32 = 20;

/// Every row of a collection, walking pages up to a fixed bound.
async fn collect_all<T, F, Fut>(
    filters: F,
    fetch: impl Fn(ListQuery<F>) -> Fut,
) -> Result<Vec<T>, Error>
where
    F: ListFilters,
    Fut: Future<Output = Result<Paginated<T>, Error>>,
{
    let mut rows = Vec::new();
    let mut request = PageRequest::first(MAX_LIMIT);
    loop {
        let page = fetch(ListQuery::new(request, filters.clone())).await?;
        let last = page.meta.last_page();
        rows.extend(page.data);
        if request.page() >= last || request.page() >= MAX_SITEMAP_PAGES {
            return Ok(rows);
        }
        request = request.with_page(request.page() + 1);
    }
}

fn url_entry(loc: &str, modified: Option<&DateTime<Utc>>) -> String {
    let lastmod = modified.map_or_else(String::new, |at| {
        format!("<lastmod>{}</lastmod>", at.format("%Y-%m-%d"))
    });
    format!("<url><loc>{}</loc>{lastmod}</url>", escape_html(loc))
}

/// Sitemap of the public pages, published articles and active projects.
#[get("/sitemap.xml")]
pub async fn sitemap(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let articles = report(
        collect_all(ArticleFilters::published(None), |query| {
            let articles = state.articles.clone();
            async move { articles.list(&Credentials::Anonymous, &query).await }
        })
        .await,
        ReportPolicy::Silent,
    )?
    .ready()
    .unwrap_or_default();
    let projects = report(
        collect_all(ProjectFilters::active(), |query| {
            let projects = state.projects.clone();
            async move { projects.list(&Credentials::Anonymous, &query).await }
        })
        .await,
        ReportPolicy::Silent,
    )?
    .ready()
    .unwrap_or_default();

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">",
    );
    for path in STATIC_PAGES {
        xml.push_str(&url_entry(&state.site.absolute(path), None));
    }
    for article in &articles {
        xml.push_str(&url_entry(
            &state.site.resource_url(&["articles", article.slug.as_str()]),
            article.last_modified(),
        ));
    }
    for project in &projects {
        xml.push_str(&url_entry(
            &state.site.resource_url(&["projects", project.id.as_str()]),
            project.updated_at.as_ref(),
        ));
    }
    xml.push_str("</urlset>");
    Ok(HttpResponse::Ok()
        .content_type(ContentType::xml())
        .insert_header((CACHE_CONTROL, PUBLIC_ONE_HOUR))
        .body(xml))
}

/// Crawler rules; protected areas are excluded.
#[get("/robots.txt")]
pub async fn robots(state: web::Data<HttpState>) -> HttpResponse {
    let mut body = String::from("User-agent: *\nAllow: /\n");
    for prefix in DISALLOWED {
        body.push_str(&format!("Disallow: {prefix}\n"));
    }
    body.push_str(&format!("Sitemap: {}\n", state.site.absolute("/sitemap.xml")));
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .insert_header((CACHE_CONTROL, PUBLIC_ONE_HOUR))
        .body(body)
}

#[cfg(test)]
mod tests {
    use actix_web::test as actix_test;
    use rstest::rstest;

    use super::*;
    use crate::inbound::http::test_utils::fixtures::{article, page, project};
    use crate::inbound::http::test_utils::{MockPorts, body_text, portal_app};

    #[rstest]
    #[actix_web::test]
    async fn robots_excludes_protected_areas() {
        let app = portal_app!(MockPorts::default());
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/robots.txt").to_request()).await;
        let body = body_text(res).await;
        for prefix in DISALLOWED {
            assert!(body.contains(&format!("Disallow: {prefix}\n")));
        }
        assert!(body.contains("Sitemap: https://portal.test/sitemap.xml"));
    }

    #[rstest]
    #[actix_web::test]
    async fn sitemap_lists_every_published_slug() {
        let mut ports = MockPorts::default();
        ports.articles.expect_list().returning(|_, query| {
            let slug = if query.page.page() == 1 { "hiver" } else { "printemps" };
            Ok(page(vec![article(slug)], query.page.page(), 2))
        });
        ports
            .projects
            .expect_list()
            .returning(|_, _| Ok(page(vec![project("p1")], 1, 1)));
        let app = portal_app!(ports);

        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/sitemap.xml").to_request()).await;
        let body = body_text(res).await;
        assert!(body.contains("<loc>https://portal.test/articles/hiver</loc><lastmod>2025-02-03</lastmod>"));
        assert!(body.contains("<loc>https://portal.test/articles/printemps</loc>"));
        assert!(body.contains("<loc>https://portal.test/projects/p1</loc>"));
        assert!(body.contains("<loc>https://portal.test/about</loc>"));
    }

    #[rstest]
    #[actix_web::test]
    async fn sitemap_percent_encodes_slugs() {
        let mut ports = MockPorts::default();
        ports
            .articles
            .expect_list()
            .returning(|_, _| Ok(page(vec![article("soupe chaude?1/2")], 1, 1)));
        ports
            .projects
            .expect_list()
            .returning(|_, _| Ok(page(vec![project("p 1")], 1, 1)));
        let app = portal_app!(ports);

        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/sitemap.xml").to_request()).await;
        let body = body_text(res).await;
        assert!(body.contains("<loc>https://portal.test/articles/soupe%20chaude%3F1%2F2</loc>"));
        assert!(body.contains("<loc>https://portal.test/projects/p%201</loc>"));
    }

    #[rstest]
    #[actix_web::test]
    async fn sitemap_falls_back_to_static_pages() {
        let mut ports = MockPorts::default();
        ports
            .articles
            .expect_list()
            .returning(|_, _| Err(Error::service_unavailable("down")));
        ports
            .projects
            .expect_list()
            .returning(|_, _| Err(Error::service_unavailable("down")));
        let app = portal_app!(ports);

        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/sitemap.xml").to_request()).await;
        assert!(res.status().is_success());
        let body = body_text(res).await;
        assert!(body.contains("<loc>https://portal.test/trainings</loc>"));
        assert!(!body.contains("/articles/"));
    }
}
