//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::Key;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, test as actix_test, web};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use url::Url;

use super::session::SessionContext;
use super::state::{HttpState, HttpStatePorts, SiteSettings};
use crate::domain::ports::{
    MockArticlesPort, MockAuthGateway, MockBeneficiariesPort, MockDonationsPort, MockEventsPort,
    MockMaraudePort, MockMembershipsPort, MockProjectsPort, MockTrainingsPort, MockUsersPort,
};
use crate::domain::{AccessToken, Error, Role, SessionPayload};

/// Session middleware with a fresh key and an insecure cookie for HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Site settings pointing at a fake public origin.
pub fn test_site() -> SiteSettings {
    SiteSettings {
        public_url: Url::parse("https://portal.test/").expect("static URL"),
        page_size: 10,
        payment_publishable_key: Some("pk_test_portal".to_owned()),
    }
}

/// Mocks for every port; tests set expectations on the ones they exercise.
#[derive(Default)]
pub struct MockPorts {
    pub auth: MockAuthGateway,
    pub articles: MockArticlesPort,
    pub projects: MockProjectsPort,
    pub events: MockEventsPort,
    pub trainings: MockTrainingsPort,
    pub donations: MockDonationsPort,
    pub memberships: MockMembershipsPort,
    pub users: MockUsersPort,
    pub beneficiaries: MockBeneficiariesPort,
    pub maraude: MockMaraudePort,
}

impl MockPorts {
    /// Freeze the mocks into handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        let ports = HttpStatePorts {
            auth: Arc::new(self.auth),
            articles: Arc::new(self.articles),
            projects: Arc::new(self.projects),
            events: Arc::new(self.events),
            trainings: Arc::new(self.trainings),
            donations: Arc::new(self.donations),
            memberships: Arc::new(self.memberships),
            users: Arc::new(self.users),
            beneficiaries: Arc::new(self.beneficiaries),
            maraude: Arc::new(self.maraude),
        };
        web::Data::new(HttpState::new(ports, test_site()))
    }

    /// Accept `token` as a session with `role`.
    pub fn with_session(mut self, token: &'static str, role: Role) -> Self {
        self.auth
            .expect_session()
            .withf(move |candidate| candidate.expose() == token)
            .returning(move |_| Ok(Some(payload(role))));
        self
    }
}

/// Session payload for a test user.
pub fn payload(role: Role) -> SessionPayload {
    SessionPayload {
        user_id: "u1".to_owned(),
        email: "ada@example.org".to_owned(),
        role,
        first_name: Some("Ada".to_owned()),
    }
}

/// Token fixture.
pub fn token(raw: &str) -> AccessToken {
    AccessToken::new(raw).expect("non-blank token")
}

#[derive(Deserialize)]
pub struct TokenQuery {
    token: String,
}

/// Store `?token=` in the cookie session; mounted at `/test/session`.
pub async fn set_session_token(
    session: SessionContext,
    query: web::Query<TokenQuery>,
) -> Result<HttpResponse, Error> {
    session.persist_token(&token(&query.token))?;
    Ok(HttpResponse::Ok().finish())
}

/// Full route table over `ports`, plus the `/test/session` helper.
macro_rules! portal_app {
    ($ports:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ports.into_state())
                .wrap($crate::inbound::http::test_utils::test_session_middleware())
                .route(
                    "/test/session",
                    actix_web::web::get().to($crate::inbound::http::test_utils::set_session_token),
                )
                .configure($crate::inbound::http::routes::configure),
        )
        .await
    };
}
pub(crate) use portal_app;

/// Session cookie carrying `raw` as access token.
macro_rules! session_cookie {
    ($app:expr, $raw:expr) => {
        actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::get()
                .uri(&format!("/test/session?token={}", $raw))
                .to_request(),
        )
        .await
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(actix_web::cookie::Cookie::into_owned)
        .expect("session cookie set")
    };
}
pub(crate) use session_cookie;

/// Response body as text.
pub async fn body_text<B: MessageBody>(res: ServiceResponse<B>) -> String {
    String::from_utf8(actix_test::read_body(res).await.to_vec()).expect("utf-8 body")
}

/// `Location` header of a redirect.
pub fn location<B>(res: &ServiceResponse<B>) -> Option<String> {
    res.headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Fixed timestamp, 1 March 2025 at 09:30 UTC.
pub fn at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 9, 30, 0)
        .single()
        .expect("valid date")
}

/// Build a model from its backend JSON shape.
pub fn from_json<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> T {
    serde_json::from_value(value).expect("fixture matches the wire shape")
}

/// Sample records in their backend wire shape.
pub mod fixtures {
    use pagination::{PageMeta, Paginated};
    use serde_json::json;

    use super::from_json;
    use crate::domain::models::{
        Article, Beneficiary, Donation, Event, MaraudeSession, Membership, Project, Training,
        User,
    };

    /// One page of `rows` out of `total_pages`.
    pub fn page<T>(rows: Vec<T>, page: u32, total_pages: u32) -> Paginated<T> {
        Paginated {
            meta: PageMeta {
                total: u64::from(total_pages) * 10,
                page,
                limit: 10,
                total_pages,
            },
            data: rows,
        }
    }

    pub fn article(slug: &str) -> Article {
        from_json(json!({
            "id": format!("a-{slug}"),
            "title": "Maraude d'hiver",
            "slug": slug,
            "excerpt": "Retour sur la tournée",
            "content": "# Bilan\n\nMerci aux **bénévoles**.",
            "status": "PUBLISHED",
            "categories": [{ "id": "c1", "name": "Terrain", "slug": "terrain" }],
            "publishedAt": "2025-02-01T10:00:00Z",
            "updatedAt": "2025-02-03T10:00:00Z"
        }))
    }

    pub fn project(id: &str) -> Project {
        from_json(json!({
            "id": id,
            "title": "Douches mobiles",
            "description": "Un camion équipé.",
            "targetAmount": "1000",
            "collectedAmount": "250",
            "status": "ACTIVE",
            "updatedAt": "2025-02-10T00:00:00Z"
        }))
    }

    pub fn event(id: &str, capacity: u32, registered: u32) -> Event {
        from_json(json!({
            "id": id,
            "title": "Collecte de vêtements",
            "description": "Au local.",
            "location": "Lyon 7e",
            "startsAt": "2025-03-15T14:00:00Z",
            "capacity": capacity,
            "registrationCount": registered,
            "status": "PUBLISHED"
        }))
    }

    pub fn training(id: &str) -> Training {
        from_json(json!({
            "id": id,
            "title": "PSC1",
            "description": "Premiers secours.",
            "startsAt": "2025-04-05T09:00:00Z",
            "durationHours": 7,
            "capacity": 12,
            "enrolledCount": 3,
            "status": "PUBLISHED"
        }))
    }

    pub fn donation(id: &str, amount: &str) -> Donation {
        from_json(json!({
            "id": id,
            "amount": amount,
            "status": "COMPLETED",
            "isAnonymous": false,
            "createdAt": "2025-01-20T18:00:00Z",
            "project": { "id": "p1", "title": "Douches mobiles" }
        }))
    }

    pub fn membership(status: &str) -> Membership {
        from_json(json!({
            "id": "m1",
            "memberNumber": "NS-2025-0042",
            "status": status,
            "startDate": "2025-01-01",
            "endDate": "2025-12-31",
            "membershipType": {
                "id": "t1",
                "name": "Adhésion annuelle",
                "price": "20",
                "durationMonths": 12
            }
        }))
    }

    pub fn user(id: &str, role: &str) -> User {
        from_json(json!({
            "id": id,
            "email": "grace@example.org",
            "firstName": "Grace",
            "lastName": "Hopper",
            "role": role,
            "createdAt": "2024-11-02T08:00:00Z"
        }))
    }

    pub fn beneficiary(id: &str) -> Beneficiary {
        from_json(json!({
            "id": id,
            "alias": "Jo",
            "ageRange": "40-50",
            "housingStatus": "STREET",
            "consentStatus": "GIVEN",
            "lastSeenAt": "2025-02-20T21:00:00Z"
        }))
    }

    pub fn maraude_session(id: &str) -> MaraudeSession {
        from_json(json!({
            "id": id,
            "startsAt": "2025-02-20T20:00:00Z",
            "status": "PLANNED",
            "zone": { "id": "z1", "name": "Part-Dieu" },
            "encounters": [{
                "id": "e1",
                "needs": [{ "id": "n1", "name": "Hygiène" }],
                "referral": "Accueil de jour",
                "createdAt": "2025-02-20T21:00:00Z"
            }]
        }))
    }
}
