//! Harness running the full portal application against a mocked backend.

use std::time::Duration;

use actix_http::Request;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header::LOCATION;
use actix_web::{test as actix_test, web};
use httpmock::prelude::*;
use portal::inbound::http::health::HealthState;
use portal::inbound::http::state::SiteSettings;
use portal::outbound::api::ApiClient;
use portal::server::{AppDependencies, http_state};
use serde_json::{Value, json};
use url::Url;

/// Application wired to `server`, with insecure cookies for plain HTTP tests.
pub fn dependencies(server: &MockServer) -> AppDependencies {
    let api_url = Url::parse(&server.base_url()).expect("mock URL");
    let client = ApiClient::new(&api_url, Duration::from_secs(2)).expect("backend client");
    let site = SiteSettings {
        public_url: Url::parse("https://portal.test/").expect("static URL"),
        page_size: 10,
        payment_publishable_key: Some("pk_test_portal".to_owned()),
    };
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: http_state(&client, site),
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
    }
}

/// Initialised service over [`dependencies`].
macro_rules! portal_app {
    ($server:expr) => {
        actix_web::test::init_service(portal::server::build_app(
            crate::support::dependencies(&$server),
        ))
        .await
    };
}
pub(crate) use portal_app;

fn session_user(role: &str) -> Value {
    json!({
        "userId": "u1",
        "email": "ada@example.org",
        "role": role,
        "firstName": "Ada"
    })
}

/// Accept `token` at sign-in and session lookup, as a user with `role`.
pub async fn mock_account(server: &MockServer, token: &str, role: &str) {
    let signed_in = json!({ "data": { "accessToken": token, "user": session_user(role) } });
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/auth/signin");
            then.status(200).json_body(signed_in);
        })
        .await;
    let session = json!({ "data": session_user(role) });
    let bearer = format!("Bearer {token}");
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api/v1/auth/session")
                .header("authorization", bearer);
            then.status(200).json_body(session);
        })
        .await;
}

/// Sign in through the login form and return the session cookie.
pub async fn sign_in<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = actix_test::call_service(
        app,
        actix_test::TestRequest::post()
            .uri("/auth/login")
            .set_form([("email", "ada@example.org"), ("password", "correct horse")])
            .to_request(),
    )
    .await;
    assert_eq!(location(&res).as_deref(), Some("/dashboard"));
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// `Location` header of a redirect.
pub fn location<B>(res: &ServiceResponse<B>) -> Option<String> {
    res.headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Response body as text.
pub async fn body_text<B: actix_web::body::MessageBody>(res: ServiceResponse<B>) -> String {
    let bytes = actix_test::read_body(res).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// `{ data, meta }` envelope for one page of `rows`.
pub fn page_body(rows: Value, page: u32, total_pages: u32) -> Value {
    json!({
        "data": rows,
        "meta": { "total": total_pages * 10, "page": page, "limit": 10, "totalPages": total_pages }
    })
}
