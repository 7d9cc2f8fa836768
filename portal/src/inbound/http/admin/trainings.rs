//! Volunteer training management.
//!
//! ```text
//! GET  /admin/trainings              Filtered list
//! GET  /admin/trainings/new          Creation form
//! POST /admin/trainings              Create
//! GET  /admin/trainings/{id}/edit    Edit form
//! POST /admin/trainings/{id}         Update
//! POST /admin/trainings/{id}/delete  Delete
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};

use super::{admin_page, rejected_form, required_choice, row_actions, submitted};
use crate::domain::models::{
    EventStatus, Training, TrainingDraft, TrainingFilters, format_datetime, to_form_datetime,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::html::{Form, FormData, Table, link, see_other};
use crate::inbound::http::listing::{ListParams, load_list};
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;

const BASE: &str = "/admin/trainings";

fn optional_number(value: Option<u32>) -> String {
    value.map(|number| number.to_string()).unwrap_or_default()
}

fn to_form(training: &Training) -> FormData {
    FormData::from_pairs([
        ("title", training.title.clone()),
        ("description", training.description.clone()),
        ("location", training.location.clone().unwrap_or_default()),
        ("startsAt", to_form_datetime(&training.starts_at)),
        ("durationHours", optional_number(training.duration_hours)),
        ("capacity", optional_number(training.capacity)),
        ("status", training.status.as_str().to_owned()),
    ])
}

fn parse(data: &mut FormData) -> Option<TrainingDraft> {
    let title = data.required("title");
    let description = data.required("description");
    let starts_at = data.required_datetime("startsAt");
    let duration_hours = data.parsed("durationHours", "Indiquez une durée en heures entières.");
    let capacity = data.parsed("capacity", "Indiquez un nombre de places entier.");
    let status = required_choice(data, "status", EventStatus::parse);
    let draft = TrainingDraft {
        title,
        description,
        location: data.optional("location"),
        starts_at: starts_at?,
        duration_hours,
        capacity,
        status: status?,
    };
    data.is_valid().then_some(draft)
}

fn form(action: &str, data: &FormData) -> String {
    Form::post(action, data)
        .text("title", "Intitulé", true)
        .textarea("description", "Programme", true)
        .text("location", "Lieu", false)
        .datetime("startsAt", "Début", true)
        .number("durationHours", "Durée (heures)", "1", false)
        .number("capacity", "Places", "1", false)
        .select("status", "Statut", &EventStatus::options(), true)
        .submit("Enregistrer")
        .render()
}

fn enrollment(training: &Training) -> String {
    match training.capacity {
        Some(capacity) => format!("{} / {capacity}", training.enrolled_count),
        None => training.enrolled_count.to_string(),
    }
}

/// Filtered training list.
#[get("/admin/trainings")]
pub async fn list(
    state: web::Data<HttpState>,
    admin: AdminSession,
    query: web::Query<ListParams<TrainingFilters>>,
) -> ApiResult<HttpResponse> {
    let credentials = admin.credentials();
    let port = &state.trainings;
    let credentials = &credentials;
    let listing = load_list(query.into_inner(), state.site.page_size, |query| async move {
        port.list(credentials, &query).await
    })
    .await?;
    let filter_data = listing.filter_form();
    let filters = Form::filter(BASE, &filter_data)
        .text("search", "Recherche", false)
        .select("status", "Statut", &EventStatus::options(), false)
        .render();
    let table = Table::new("Aucune formation ne correspond à ces critères.")
        .column("Intitulé", |training: &Training| training.title.clone())
        .column("Date", |training: &Training| format_datetime(&training.starts_at))
        .column("Statut", |training: &Training| training.status.label().to_owned())
        .column("Inscrits", enrollment)
        .html_column("", |training: &Training| row_actions(BASE, &training.id));
    let body = format!(
        "<p>{}</p>{filters}{}{}",
        link("/admin/trainings/new", "Nouvelle formation"),
        table.render(&listing.rows),
        listing.pagination(BASE)
    );
    Ok(admin_page(&admin, "Formations").body(body).respond())
}

/// Blank creation form.
#[get("/admin/trainings/new")]
pub async fn new_training(admin: AdminSession) -> ApiResult<HttpResponse> {
    let data = FormData::from_pairs([("status", EventStatus::Draft.as_str())]);
    Ok(admin_page(&admin, "Nouvelle formation").body(form(BASE, &data)).respond())
}

/// Create a training.
#[post("/admin/trainings")]
pub async fn create(
    state: web::Data<HttpState>,
    admin: AdminSession,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse(&mut data) {
        Some(draft) => Some(state.trainings.create(&admin.credentials(), &draft).await),
        None => None,
    };
    Ok(match submitted(admin.context(), &mut data, result, "Formation enregistrée.")? {
        Ok(_) => see_other(BASE),
        Err(banner) => rejected_form(admin_page(&admin, "Nouvelle formation"), banner, form(BASE, &data)),
    })
}

/// Edit form.
#[get("/admin/trainings/{id}/edit")]
pub async fn edit(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let training = state.trainings.get(&admin.credentials(), &id).await?;
    let body = form(&format!("{BASE}/{}", training.id), &to_form(&training));
    Ok(admin_page(&admin, &training.title).body(body).respond())
}

/// Update a training.
#[post("/admin/trainings/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse(&mut data) {
        Some(draft) => Some(state.trainings.update(&admin.credentials(), &id, &draft).await),
        None => None,
    };
    Ok(match submitted(admin.context(), &mut data, result, "Formation mise à jour.")? {
        Ok(_) => see_other(BASE),
        Err(banner) => rejected_form(
            admin_page(&admin, "Modifier la formation"),
            banner,
            form(&format!("{BASE}/{id}"), &data),
        ),
    })
}

/// Delete a training.
#[post("/admin/trainings/{id}/delete")]
pub async fn delete(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let outcome = state.trainings.delete(&admin.credentials(), &id).await;
    admin.context().flash_outcome(outcome, "Formation supprimée.")?;
    Ok(see_other(BASE))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;

    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::fixtures::{page, training};
    use crate::inbound::http::test_utils::{
        MockPorts, body_text, location, portal_app, session_cookie,
    };

    #[rstest]
    #[actix_web::test]
    async fn list_shows_enrollment() {
        let mut ports = MockPorts::default().with_session("tok", Role::Admin);
        ports
            .trainings
            .expect_list()
            .returning(|_, _| Ok(page(vec![training("t1")], 1, 1)));
        let app = portal_app!(ports);
        let cookie = session_cookie!(app, "tok");

        let body = body_text(
            actix_test::call_service(
                &app,
                actix_test::TestRequest::get().uri("/admin/trainings").cookie(cookie).to_request(),
            )
            .await,
        )
        .await;
        assert!(body.contains("<td>3 / 12</td>"));
        assert!(body.contains("/admin/trainings/t1/edit"));
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_start_is_reported_next_to_the_field() {
        let mut ports = MockPorts::default().with_session("tok", Role::Admin);
        ports.trainings.expect_create().never();
        let app = portal_app!(ports);
        let cookie = session_cookie!(app, "tok");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/admin/trainings")
                .cookie(cookie)
                .set_form([
                    ("title", "PSC1"),
                    ("description", "Premiers secours."),
                    ("durationHours", "7"),
                    ("status", "PUBLISHED"),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_text(res).await;
        assert!(body.contains("id=\"startsAt-error\""));
        assert!(body.contains("value=\"PSC1\""));
    }

    #[rstest]
    #[actix_web::test]
    async fn created_trainings_redirect_to_the_list() {
        let mut ports = MockPorts::default().with_session("tok", Role::Admin);
        ports
            .trainings
            .expect_create()
            .withf(|_, draft| draft.duration_hours == Some(7) && draft.capacity.is_none())
            .returning(|_, _| Ok(training("t2")));
        let app = portal_app!(ports);
        let cookie = session_cookie!(app, "tok");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/admin/trainings")
                .cookie(cookie)
                .set_form([
                    ("title", "PSC1"),
                    ("description", "Premiers secours."),
                    ("startsAt", "2025-04-05T09:00"),
                    ("durationHours", "7"),
                    ("status", "PUBLISHED"),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(location(&res).as_deref(), Some("/admin/trainings"));
    }
}
