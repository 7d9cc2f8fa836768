//! Anonymised beneficiary records.
//!
//! ```text
//! GET  /admin/maraude/beneficiaries            Filtered list
//! GET  /admin/maraude/beneficiaries/new        Creation form
//! POST /admin/maraude/beneficiaries            Create
//! GET  /admin/maraude/beneficiaries/{id}/edit  Edit form
//! POST /admin/maraude/beneficiaries/{id}       Update
//! ```
//!
//! Records carry an alias and coarse facts only; identities stay off the
//! portal.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};

use crate::domain::models::{
    Beneficiary, BeneficiaryDraft, BeneficiaryFilters, ConsentStatus, HousingStatus,
    format_optional_date,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::admin::{admin_page, rejected_form, required_choice, submitted};
use crate::inbound::http::html::{Form, FormData, Table, link, see_other};
use crate::inbound::http::listing::{ListParams, load_list};
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;

const BASE: &str = "/admin/maraude/beneficiaries";

fn to_form(draft: &BeneficiaryDraft) -> FormData {
    FormData::from_pairs([
        ("alias", draft.alias.clone()),
        ("ageRange", draft.age_range.clone().unwrap_or_default()),
        ("housingStatus", draft.housing_status.as_str().to_owned()),
        ("consentStatus", draft.consent_status.as_str().to_owned()),
        ("notes", draft.notes.clone().unwrap_or_default()),
    ])
}

fn parse(data: &mut FormData) -> Option<BeneficiaryDraft> {
    let alias = data.required("alias");
    let housing_status = required_choice(data, "housingStatus", HousingStatus::parse);
    let consent_status = required_choice(data, "consentStatus", ConsentStatus::parse);
    let draft = BeneficiaryDraft {
        alias,
        age_range: data.optional("ageRange"),
        housing_status: housing_status?,
        consent_status: consent_status?,
        notes: data.optional("notes"),
    };
    data.is_valid().then_some(draft)
}

fn form(action: &str, data: &FormData) -> String {
    Form::post(action, data)
        .text("alias", "Alias", true)
        .text("ageRange", "Tranche d'âge", false)
        .select("housingStatus", "Hébergement", &HousingStatus::options(), true)
        .select("consentStatus", "Consentement", &ConsentStatus::options(), true)
        .textarea("notes", "Notes", false)
        .submit("Enregistrer")
        .render()
}

/// Filtered beneficiary list.
#[get("/admin/maraude/beneficiaries")]
pub async fn list(
    state: web::Data<HttpState>,
    admin: AdminSession,
    query: web::Query<ListParams<BeneficiaryFilters>>,
) -> ApiResult<HttpResponse> {
    let credentials = admin.credentials();
    let port = &state.beneficiaries;
    let credentials = &credentials;
    let listing = load_list(query.into_inner(), state.site.page_size, |query| async move {
        port.list(credentials, &query).await
    })
    .await?;
    let filter_data = listing.filter_form();
    let filters = Form::filter(BASE, &filter_data)
        .text("search", "Alias", false)
        .select("housingStatus", "Hébergement", &HousingStatus::options(), false)
        .select("consentStatus", "Consentement", &ConsentStatus::options(), false)
        .render();
    let table = Table::new("Aucun bénéficiaire ne correspond à ces critères.")
        .column("Alias", |person: &Beneficiary| person.alias.clone())
        .column("Âge", |person: &Beneficiary| {
            person.age_range.clone().unwrap_or_else(|| "-".to_owned())
        })
        .column("Hébergement", |person: &Beneficiary| person.housing_status.label().to_owned())
        .column("Consentement", |person: &Beneficiary| person.consent_status.label().to_owned())
        .column("Dernière rencontre", |person: &Beneficiary| {
            format_optional_date(person.last_seen_at.as_ref())
        })
        .html_column("", |person: &Beneficiary| {
            link(&format!("{BASE}/{}/edit", person.id), "Modifier")
        });
    let body = format!(
        "<p>{}</p>{filters}{}{}",
        link("/admin/maraude/beneficiaries/new", "Nouveau bénéficiaire"),
        table.render(&listing.rows),
        listing.pagination(BASE)
    );
    Ok(admin_page(&admin, "Bénéficiaires").body(body).respond())
}

/// Blank creation form.
#[get("/admin/maraude/beneficiaries/new")]
pub async fn new_beneficiary(admin: AdminSession) -> ApiResult<HttpResponse> {
    let body = form(BASE, &to_form(&BeneficiaryDraft::default()));
    Ok(admin_page(&admin, "Nouveau bénéficiaire").body(body).respond())
}

/// Create a record.
#[post("/admin/maraude/beneficiaries")]
pub async fn create(
    state: web::Data<HttpState>,
    admin: AdminSession,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse(&mut data) {
        Some(draft) => Some(state.beneficiaries.create(&admin.credentials(), &draft).await),
        None => None,
    };
    Ok(match submitted(admin.context(), &mut data, result, "Bénéficiaire enregistré.")? {
        Ok(_) => see_other(BASE),
        Err(banner) => rejected_form(admin_page(&admin, "Nouveau bénéficiaire"), banner, form(BASE, &data)),
    })
}

/// Edit form.
#[get("/admin/maraude/beneficiaries/{id}/edit")]
pub async fn edit(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let person = state.beneficiaries.get(&admin.credentials(), &id).await?;
    let body = form(
        &format!("{BASE}/{}", person.id),
        &to_form(&BeneficiaryDraft::from(&person)),
    );
    Ok(admin_page(&admin, &person.alias).body(body).respond())
}

/// Update a record.
#[post("/admin/maraude/beneficiaries/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse(&mut data) {
        Some(draft) => Some(state.beneficiaries.update(&admin.credentials(), &id, &draft).await),
        None => None,
    };
    Ok(match submitted(admin.context(), &mut data, result, "Bénéficiaire mis à jour.")? {
        Ok(_) => see_other(BASE),
        Err(banner) => rejected_form(
            admin_page(&admin, "Modifier le bénéficiaire"),
            banner,
            form(&format!("{BASE}/{id}"), &data),
        ),
    })
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;

    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::fixtures::{beneficiary, page};
    use crate::inbound::http::test_utils::{
        MockPorts, body_text, location, portal_app, session_cookie,
    };

    #[rstest]
    fn new_records_default_to_pending_consent() {
        let data = to_form(&BeneficiaryDraft::default());
        assert_eq!(data.value("consentStatus"), "PENDING");
        assert_eq!(data.value("housingStatus"), "UNKNOWN");
    }

    #[rstest]
    #[actix_web::test]
    async fn list_forwards_wire_filters() {
        let mut ports = MockPorts::default().with_session("tok", Role::Admin);
        ports
            .beneficiaries
            .expect_list()
            .withf(|_, query| {
                query.query_pairs().contains(&("housingStatus", "STREET".to_owned()))
            })
            .returning(|_, _| Ok(page(vec![beneficiary("b1")], 1, 1)));
        let app = portal_app!(ports);
        let cookie = session_cookie!(app, "tok");

        let body = body_text(
            actix_test::call_service(
                &app,
                actix_test::TestRequest::get()
                    .uri("/admin/maraude/beneficiaries?housingStatus=street")
                    .cookie(cookie)
                    .to_request(),
            )
            .await,
        )
        .await;
        assert!(body.contains("<td>Jo</td>"));
        assert!(body.contains("<td>Rue</td>"));
        assert!(body.contains("20/02/2025"));
        assert!(body.contains("/admin/maraude/beneficiaries/b1/edit"));
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_alias_is_rejected_locally() {
        let mut ports = MockPorts::default().with_session("tok", Role::Admin);
        ports.beneficiaries.expect_create().never();
        let app = portal_app!(ports);
        let cookie = session_cookie!(app, "tok");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/admin/maraude/beneficiaries")
                .cookie(cookie)
                .set_form([("alias", ""), ("housingStatus", "STREET"), ("consentStatus", "GIVEN")])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body_text(res).await.contains("id=\"alias-error\""));
    }

    #[rstest]
    #[actix_web::test]
    async fn volunteers_cannot_edit_records() {
        let mut ports = MockPorts::default().with_session("tok", Role::Volunteer);
        ports.beneficiaries.expect_update().never();
        let app = portal_app!(ports);
        let cookie = session_cookie!(app, "tok");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/admin/maraude/beneficiaries/b1")
                .cookie(cookie)
                .set_form([("alias", "Jo"), ("housingStatus", "STREET"), ("consentStatus", "GIVEN")])
                .to_request(),
        )
        .await;
        assert_eq!(location(&res).as_deref(), Some("/dashboard"));
    }

    #[rstest]
    #[actix_web::test]
    async fn admins_update_records() {
        let mut ports = MockPorts::default().with_session("tok", Role::Admin);
        ports
            .beneficiaries
            .expect_update()
            .withf(|_, id, draft| id == "b1" && draft.consent_status == ConsentStatus::Withdrawn)
            .returning(|_, id, _| Ok(beneficiary(id)));
        let app = portal_app!(ports);
        let cookie = session_cookie!(app, "tok");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/admin/maraude/beneficiaries/b1")
                .cookie(cookie)
                .set_form([("alias", "Jo"), ("housingStatus", "STREET"), ("consentStatus", "WITHDRAWN")])
                .to_request(),
        )
        .await;
        assert_eq!(location(&res).as_deref(), Some("/admin/maraude/beneficiaries"));
    }
}
