//! End-to-end flows through the assembled application.
//!
//! The backend is an `httpmock` server, so these tests exercise the reqwest
//! adapters, the session middleware and the route table together.

mod support;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use httpmock::prelude::*;
use portal::domain::TRACE_ID_HEADER;
use rstest::rstest;
use serde_json::json;

use support::{body_text, location, mock_account, page_body, portal_app, sign_in};

fn article_json(slug: &str) -> serde_json::Value {
    json!({
        "id": format!("a-{slug}"),
        "title": format!("Article {slug}"),
        "slug": slug,
        "content": "Merci.",
        "status": "PUBLISHED",
        "categories": [],
        "publishedAt": "2025-02-01T10:00:00Z",
        "updatedAt": "2025-02-03T10:00:00Z"
    })
}

#[rstest]
#[actix_web::test]
async fn anonymous_visitors_are_sent_to_login_with_their_destination() {
    let server = MockServer::start_async().await;
    let app = portal_app!(server);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/dashboard/membership").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&res).as_deref(),
        Some("/auth/login?redirect=%2Fdashboard%2Fmembership")
    );
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
}

#[rstest]
#[actix_web::test]
async fn sign_in_returns_to_the_requested_page_only_when_local() {
    let server = MockServer::start_async().await;
    mock_account(&server, "tok", "MEMBER").await;
    let app = portal_app!(server);

    for (redirect, expected) in [
        ("/dashboard/membership", "/dashboard/membership"),
        ("//evil.example/phish", "/dashboard"),
    ] {
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/auth/login")
                .set_form([
                    ("email", "ada@example.org"),
                    ("password", "correct horse"),
                    ("redirect", redirect),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(location(&res).as_deref(), Some(expected));
    }
}

#[rstest]
#[actix_web::test]
async fn members_are_kept_out_of_the_back_office() {
    let server = MockServer::start_async().await;
    mock_account(&server, "tok", "MEMBER").await;
    let articles = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/articles");
            then.status(200).json_body(page_body(json!([]), 1, 1));
        })
        .await;
    let app = portal_app!(server);
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/admin/articles").cookie(cookie).to_request(),
    )
    .await;
    assert_eq!(location(&res).as_deref(), Some("/dashboard"));
    articles.assert_hits_async(0).await;
}

#[rstest]
#[actix_web::test]
async fn last_page_disables_next_and_links_keep_filters() {
    let server = MockServer::start_async().await;
    mock_account(&server, "tok", "ADMIN").await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/articles")
                .query_param("page", "3")
                .query_param("search", "hiver");
            then.status(200)
                .json_body(page_body(json!([article_json("hiver")]), 3, 3));
        })
        .await;
    let app = portal_app!(server);
    let cookie = sign_in(&app).await;

    let body = body_text(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/admin/articles?search=hiver&page=3")
                .cookie(cookie)
                .to_request(),
        )
        .await,
    )
    .await;
    assert!(body.contains("<span class=\"disabled\" aria-disabled=\"true\">Suivant</span>"));
    assert!(body.contains("href=\"/admin/articles?search=hiver&amp;page=2\""));
    assert!(body.contains("Page 3 sur 3"));
}

#[rstest]
#[actix_web::test]
async fn stale_page_links_show_the_last_page_rows() {
    let server = MockServer::start_async().await;
    mock_account(&server, "tok", "ADMIN").await;
    let past_end = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/articles").query_param("page", "9");
            then.status(200).json_body(page_body(json!([]), 9, 3));
        })
        .await;
    let last = server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/articles").query_param("page", "3");
            then.status(200)
                .json_body(page_body(json!([article_json("printemps")]), 3, 3));
        })
        .await;
    let app = portal_app!(server);
    let cookie = sign_in(&app).await;

    let body = body_text(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/admin/articles?page=9")
                .cookie(cookie)
                .to_request(),
        )
        .await,
    )
    .await;
    assert!(body.contains("Article printemps"));
    assert!(body.contains("Page 3 sur 3"));
    past_end.assert_hits_async(1).await;
    last.assert_hits_async(1).await;
}

#[rstest]
#[actix_web::test]
async fn applying_a_filter_starts_again_from_page_one() {
    let server = MockServer::start_async().await;
    mock_account(&server, "tok", "ADMIN").await;
    let first_page = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/articles")
                .query_param("page", "1")
                .query_param("search", "soupe");
            then.status(200).json_body(page_body(json!([]), 1, 1));
        })
        .await;
    let app = portal_app!(server);
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/admin/articles?search=soupe")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    first_page.assert_async().await;
}

#[rstest]
#[actix_web::test]
async fn a_failing_list_renders_its_empty_state() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/projects");
            then.status(503).json_body(json!({ "message": "maintenance" }));
        })
        .await;
    let app = portal_app!(server);

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/projects").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_text(res).await;
    assert!(body.contains("class=\"empty\""));
    assert!(!body.contains("maintenance"));
}

#[rstest]
#[actix_web::test]
async fn membership_page_shows_number_and_dates() {
    let server = MockServer::start_async().await;
    mock_account(&server, "tok", "MEMBER").await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/memberships/me")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!({
                "data": {
                    "id": "m1",
                    "memberNumber": "NS-2025-0042",
                    "status": "ACTIVE",
                    "startDate": "2025-01-01",
                    "endDate": "2025-12-31"
                }
            }));
        })
        .await;
    let app = portal_app!(server);
    let cookie = sign_in(&app).await;

    let body = body_text(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/dashboard/membership").cookie(cookie).to_request(),
        )
        .await,
    )
    .await;
    assert!(body.contains("NS-2025-0042"));
    assert!(body.contains("01/01/2025"));
    assert!(body.contains("31/12/2025"));
}

#[rstest]
#[actix_web::test]
async fn confirmation_estimates_the_tax_reduction_and_polls_for_the_receipt() {
    let server = MockServer::start_async().await;
    mock_account(&server, "tok", "MEMBER").await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/donations/d1");
            then.status(200).json_body(json!({
                "data": {
                    "id": "d1",
                    "amount": "50",
                    "status": "COMPLETED",
                    "isAnonymous": false,
                    "createdAt": "2025-01-20T18:00:00Z"
                }
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/donations/d1/receipt");
            then.status(404).json_body(json!({ "message": "not generated" }));
        })
        .await;
    let app = portal_app!(server);
    let cookie = sign_in(&app).await;

    let body = body_text(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/dashboard/donations/confirmation?donation_id=d1")
                .cookie(cookie)
                .to_request(),
        )
        .await,
    )
    .await;
    assert!(body.contains("33.00 €"));
    assert!(body.contains("http-equiv=\"refresh\""));
    assert!(body.contains("donation_id=d1&amp;attempt=2"));
}

#[rstest]
#[actix_web::test]
async fn missing_annual_receipt_names_the_year() {
    let server = MockServer::start_async().await;
    mock_account(&server, "tok", "MEMBER").await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/donations/receipts/annual")
                .json_body(json!({ "year": 2023 }));
            then.status(404).json_body(json!({ "message": "no donations" }));
        })
        .await;
    let app = portal_app!(server);
    let cookie = sign_in(&app).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/dashboard/donations/receipts")
            .cookie(cookie)
            .set_form([("year", "2023")])
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(body_text(res).await.contains("Aucun don enregistré pour l'année 2023."));
}

#[rstest]
#[actix_web::test]
async fn robots_and_sitemap_describe_the_public_site() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/articles");
            then.status(200)
                .json_body(page_body(json!([article_json("hiver")]), 1, 1));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/v1/projects");
            then.status(200).json_body(page_body(json!([]), 1, 1));
        })
        .await;
    let app = portal_app!(server);

    let robots = body_text(
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/robots.txt").to_request()).await,
    )
    .await;
    assert!(robots.contains("Disallow: /admin"));
    assert!(robots.contains("Disallow: /dashboard"));

    let sitemap = body_text(
        actix_test::call_service(&app, actix_test::TestRequest::get().uri("/sitemap.xml").to_request()).await,
    )
    .await;
    assert!(sitemap.contains("<loc>https://portal.test/articles/hiver</loc>"));
}

#[rstest]
#[case("/health/live")]
#[case("/health/ready")]
#[actix_web::test]
async fn probes_answer_without_touching_the_backend(#[case] path: &str) {
    let server = MockServer::start_async().await;
    let app = portal_app!(server);

    let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri(path).to_request()).await;
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    assert!(res.status() == StatusCode::OK || res.status() == StatusCode::SERVICE_UNAVAILABLE);
}
