//! Read-only donation ledger.

use actix_web::{HttpResponse, get, web};

use super::admin_page;
use crate::domain::models::{Donation, DonationFilters, DonationStatus, format_date};
use crate::inbound::http::ApiResult;
use crate::inbound::http::html::{Form, Table};
use crate::inbound::http::listing::{ListParams, load_list};
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;

const BASE: &str = "/admin/donations";

fn donor(donation: &Donation) -> String {
    if donation.is_anonymous {
        return "Anonyme".to_owned();
    }
    donation
        .donor
        .as_ref()
        .map(|donor| donor.display_name())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "-".to_owned())
}

/// Every donation, newest first as returned by the backend.
#[get("/admin/donations")]
pub async fn list(
    state: web::Data<HttpState>,
    admin: AdminSession,
    query: web::Query<ListParams<DonationFilters>>,
) -> ApiResult<HttpResponse> {
    let credentials = admin.credentials();
    let port = &state.donations;
    let credentials = &credentials;
    let listing = load_list(query.into_inner(), state.site.page_size, |query| async move {
        port.list(credentials, &query).await
    })
    .await?;
    let filter_data = listing.filter_form();
    let filters = Form::filter(BASE, &filter_data)
        .text("search", "Donateur ou e-mail", false)
        .select("status", "Statut", &DonationStatus::options(), false)
        .render();
    let table = Table::new("Aucun don ne correspond à ces critères.")
        .column("Date", |donation: &Donation| format_date(&donation.created_at))
        .column("Donateur", donor)
        .column("Montant", |donation: &Donation| donation.amount.to_string())
        .column("Affectation", |donation: &Donation| donation.destination().to_owned())
        .column("Statut", |donation: &Donation| donation.status.label().to_owned());
    let body = format!(
        "{filters}{}{}",
        table.render(&listing.rows),
        listing.pagination(BASE)
    );
    Ok(admin_page(&admin, "Dons").body(body).respond())
}

#[cfg(test)]
mod tests {
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::{Error, Role};
    use crate::inbound::http::test_utils::fixtures::{donation, page};
    use crate::inbound::http::test_utils::{
        MockPorts, body_text, from_json, portal_app, session_cookie,
    };

    #[rstest]
    #[case(json!({ "isAnonymous": true, "donor": { "firstName": "Ada" } }), "Anonyme")]
    #[case(json!({ "donor": { "firstName": "Ada", "lastName": "Lovelace" } }), "Ada Lovelace")]
    #[case(json!({ "donor": { "email": "ada@example.org" } }), "ada@example.org")]
    #[case(json!({}), "-")]
    fn donor_column_respects_anonymity(#[case] extra: serde_json::Value, #[case] expected: &str) {
        let mut record = json!({
            "id": "d1",
            "amount": "10",
            "status": "COMPLETED",
            "createdAt": "2025-01-20T18:00:00Z"
        });
        if let (Some(base), Some(extra)) = (record.as_object_mut(), extra.as_object()) {
            base.extend(extra.clone());
        }
        let record: Donation = from_json(record);
        assert_eq!(donor(&record), expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn ledger_lists_amounts_and_destinations() {
        let mut ports = MockPorts::default().with_session("tok", Role::SuperAdmin);
        ports
            .donations
            .expect_list()
            .withf(|_, query| query.filters.status.as_deref() == Some("COMPLETED"))
            .returning(|_, _| Ok(page(vec![donation("d1", "50")], 1, 1)));
        let app = portal_app!(ports);
        let cookie = session_cookie!(app, "tok");

        let body = body_text(
            actix_test::call_service(
                &app,
                actix_test::TestRequest::get()
                    .uri("/admin/donations?status=COMPLETED")
                    .cookie(cookie)
                    .to_request(),
            )
            .await,
        )
        .await;
        assert!(body.contains("50.00 €"));
        assert!(body.contains("Douches mobiles"));
        assert!(body.contains("20/01/2025"));
    }

    #[rstest]
    #[actix_web::test]
    async fn outages_render_the_empty_state() {
        let mut ports = MockPorts::default().with_session("tok", Role::Admin);
        ports
            .donations
            .expect_list()
            .returning(|_, _| Err(Error::service_unavailable("backend down")));
        let app = portal_app!(ports);
        let cookie = session_cookie!(app, "tok");

        let body = body_text(
            actix_test::call_service(
                &app,
                actix_test::TestRequest::get().uri("/admin/donations").cookie(cookie).to_request(),
            )
            .await,
        )
        .await;
        assert!(body.contains("Aucun don ne correspond à ces critères."));
    }
}
