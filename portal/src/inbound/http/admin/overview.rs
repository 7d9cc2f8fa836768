//! Back-office landing page with headline counts.

use actix_web::{HttpResponse, get, web};
use pagination::{PageRequest, Paginated};

use super::admin_page;
use crate::domain::models::{
    ArticleFilters, DonationFilters, MembershipFilters, MembershipStatus, ProjectFilters,
    SessionFilters, UserFilters,
};
use crate::domain::{Error, ListFilters, ListQuery};
use crate::inbound::http::ApiResult;
use crate::inbound::http::html::escape;
use crate::inbound::http::report::{ReportPolicy, report};
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;

/// Only `meta.total` is read, so a single row is requested.
fn count_query<F: ListFilters>(filters: F) -> ListQuery<F> {
    ListQuery::new(PageRequest::first(1), filters)
}

fn total<T>(result: Result<Paginated<T>, Error>) -> ApiResult<Option<u64>> {
    Ok(report(result, ReportPolicy::Silent)?
        .ready()
        .map(|page| page.meta.total))
}

fn tile(href: &str, label: &str, count: Option<u64>) -> String {
    let value = count.map_or_else(|| "-".to_owned(), |count| count.to_string());
    format!(
        "<li><a href=\"{}\"><strong>{value}</strong> {}</a></li>",
        escape(href),
        escape(label)
    )
}

/// Counts per back-office area; an unavailable count shows as `-`.
#[get("/admin")]
pub async fn overview(state: web::Data<HttpState>, admin: AdminSession) -> ApiResult<HttpResponse> {
    let credentials = admin.credentials();
    let pending = MembershipFilters {
        status: Some(MembershipStatus::Pending.as_str().to_owned()),
        search: None,
    };
    let article_query = count_query(ArticleFilters::default());
    let project_query = count_query(ProjectFilters::active());
    let donation_query = count_query(DonationFilters::default());
    let membership_query = count_query(pending);
    let user_query = count_query(UserFilters::default());
    let session_query = count_query(SessionFilters::default());
    let (articles, projects, donations, memberships, users, sessions) = futures_util::join!(
        state.articles.list(&credentials, &article_query),
        state.projects.list(&credentials, &project_query),
        state.donations.list(&credentials, &donation_query),
        state.memberships.list(&credentials, &membership_query),
        state.users.list(&credentials, &user_query),
        state.maraude.list_sessions(&credentials, &session_query),
    );
    let tiles = [
        tile("/admin/articles", "articles", total(articles)?),
        tile("/admin/projects?status=ACTIVE", "projets en cours", total(projects)?),
        tile("/admin/donations", "dons", total(donations)?),
        tile(
            "/admin/memberships?status=PENDING",
            "adhésions à valider",
            total(memberships)?,
        ),
        tile("/admin/users", "comptes", total(users)?),
        tile("/admin/maraude/sessions", "maraudes", total(sessions)?),
    ];
    let body = format!("<ul class=\"tiles\">{}</ul>", tiles.concat());
    Ok(admin_page(&admin, "Vue d'ensemble").body(body).respond())
}

#[cfg(test)]
mod tests {
    use actix_web::test as actix_test;
    use rstest::rstest;

    use crate::domain::{Error, Role};
    use crate::inbound::http::test_utils::fixtures::page;
    use crate::inbound::http::test_utils::{
        MockPorts, body_text, location, portal_app, session_cookie,
    };

    fn all_counts(ports: &mut MockPorts) {
        ports.articles.expect_list().returning(|_, _| Ok(page(Vec::new(), 1, 4)));
        ports.projects.expect_list().returning(|_, _| Ok(page(Vec::new(), 1, 1)));
        ports
            .donations
            .expect_list()
            .returning(|_, _| Err(Error::service_unavailable("down")));
        ports
            .memberships
            .expect_list()
            .withf(|_, query| {
                query.filters.status.as_deref() == Some("PENDING") && query.page.limit() == 1
            })
            .returning(|_, _| Ok(page(Vec::new(), 1, 2)));
        ports.users.expect_list().returning(|_, _| Ok(page(Vec::new(), 1, 3)));
        ports.maraude.expect_list_sessions().returning(|_, _| Ok(page(Vec::new(), 1, 1)));
    }

    #[rstest]
    #[actix_web::test]
    async fn overview_counts_and_tolerates_outages() {
        let mut ports = MockPorts::default().with_session("tok", Role::Admin);
        all_counts(&mut ports);
        let app = portal_app!(ports);
        let cookie = session_cookie!(app, "tok");

        let body = body_text(
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/admin").cookie(cookie).to_request())
                .await,
        )
        .await;
        assert!(body.contains("<strong>40</strong> articles"));
        assert!(body.contains("<strong>20</strong> adhésions à valider"));
        assert!(body.contains("<strong>-</strong> dons"));
    }

    #[rstest]
    #[actix_web::test]
    async fn anonymous_visitors_are_sent_to_login() {
        let app = portal_app!(MockPorts::default());
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/admin").to_request()).await;
        assert_eq!(
            location(&res).as_deref(),
            Some("/auth/login?redirect=%2Fadmin")
        );
    }
}
