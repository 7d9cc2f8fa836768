//! Event management.
//!
//! ```text
//! GET  /admin/events              Filtered list
//! GET  /admin/events/new          Creation form
//! POST /admin/events              Create
//! GET  /admin/events/{id}/edit    Edit form
//! POST /admin/events/{id}         Update
//! POST /admin/events/{id}/delete  Delete
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};

use super::{admin_page, rejected_form, required_choice, row_actions, submitted};
use crate::domain::models::{
    Event, EventDraft, EventFilters, EventStatus, format_datetime, to_form_datetime,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::html::{Form, FormData, Table, link, see_other};
use crate::inbound::http::listing::{ListParams, load_list};
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;

const BASE: &str = "/admin/events";

fn to_form(event: &Event) -> FormData {
    FormData::from_pairs([
        ("title", event.title.clone()),
        ("description", event.description.clone()),
        ("location", event.location.clone().unwrap_or_default()),
        ("startsAt", to_form_datetime(&event.starts_at)),
        (
            "endsAt",
            event.ends_at.as_ref().map(to_form_datetime).unwrap_or_default(),
        ),
        (
            "capacity",
            event.capacity.map(|capacity| capacity.to_string()).unwrap_or_default(),
        ),
        ("status", event.status.as_str().to_owned()),
    ])
}

fn parse(data: &mut FormData) -> Option<EventDraft> {
    let title = data.required("title");
    let description = data.required("description");
    let starts_at = data.required_datetime("startsAt");
    let ends_at = data.datetime("endsAt");
    let capacity = data.parsed("capacity", "Indiquez un nombre de places entier.");
    let status = required_choice(data, "status", EventStatus::parse);
    let starts_at = starts_at?;
    if ends_at.is_some_and(|end| end < starts_at) {
        data.reject("endsAt", "La fin doit suivre le début.");
    }
    let draft = EventDraft {
        title,
        description,
        location: data.optional("location"),
        starts_at,
        ends_at,
        capacity,
        status: status?,
    };
    data.is_valid().then_some(draft)
}

fn form(action: &str, data: &FormData) -> String {
    Form::post(action, data)
        .text("title", "Titre", true)
        .textarea("description", "Description", true)
        .text("location", "Lieu", false)
        .datetime("startsAt", "Début", true)
        .datetime("endsAt", "Fin", false)
        .number("capacity", "Places (vide : entrée libre)", "1", false)
        .select("status", "Statut", &EventStatus::options(), true)
        .submit("Enregistrer")
        .render()
}

fn attendance(event: &Event) -> String {
    match event.capacity {
        Some(capacity) => format!("{} / {capacity}", event.registration_count),
        None => event.registration_count.to_string(),
    }
}

/// Filtered event list.
#[get("/admin/events")]
pub async fn list(
    state: web::Data<HttpState>,
    admin: AdminSession,
    query: web::Query<ListParams<EventFilters>>,
) -> ApiResult<HttpResponse> {
    let credentials = admin.credentials();
    let port = &state.events;
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
    let table = Table::new("Aucun événement ne correspond à ces critères.")
        .column("Titre", |event: &Event| event.title.clone())
        .column("Date", |event: &Event| format_datetime(&event.starts_at))
        .column("Statut", |event: &Event| event.status.label().to_owned())
        .column("Inscrits", attendance)
        .html_column("", |event: &Event| row_actions(BASE, &event.id));
    let body = format!(
        "<p>{}</p>{filters}{}{}",
        link("/admin/events/new", "Nouvel événement"),
        table.render(&listing.rows),
        listing.pagination(BASE)
    );
    Ok(admin_page(&admin, "Événements").body(body).respond())
}

/// Blank creation form.
#[get("/admin/events/new")]
pub async fn new_event(admin: AdminSession) -> ApiResult<HttpResponse> {
    let data = FormData::from_pairs([("status", EventStatus::Draft.as_str())]);
    Ok(admin_page(&admin, "Nouvel événement").body(form(BASE, &data)).respond())
}

/// Create an event.
#[post("/admin/events")]
pub async fn create(
    state: web::Data<HttpState>,
    admin: AdminSession,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse(&mut data) {
        Some(draft) => Some(state.events.create(&admin.credentials(), &draft).await),
        None => None,
    };
    Ok(match submitted(admin.context(), &mut data, result, "Événement enregistré.")? {
        Ok(_) => see_other(BASE),
        Err(banner) => rejected_form(admin_page(&admin, "Nouvel événement"), banner, form(BASE, &data)),
    })
}

/// Edit form.
#[get("/admin/events/{id}/edit")]
pub async fn edit(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let event = state.events.get(&admin.credentials(), &id).await?;
    let body = form(&format!("{BASE}/{}", event.id), &to_form(&event));
    Ok(admin_page(&admin, &event.title).body(body).respond())
}

/// Update an event.
#[post("/admin/events/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse(&mut data) {
        Some(draft) => Some(state.events.update(&admin.credentials(), &id, &draft).await),
        None => None,
    };
    Ok(match submitted(admin.context(), &mut data, result, "Événement mis à jour.")? {
        Ok(_) => see_other(BASE),
        Err(banner) => rejected_form(
            admin_page(&admin, "Modifier l'événement"),
            banner,
            form(&format!("{BASE}/{id}"), &data),
        ),
    })
}

/// Delete an event.
#[post("/admin/events/{id}/delete")]
pub async fn delete(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let outcome = state.events.delete(&admin.credentials(), &id).await;
    admin.context().flash_outcome(outcome, "Événement supprimé.")?;
    Ok(see_other(BASE))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;

    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::fixtures::{event, page};
    use crate::inbound::http::test_utils::{
        MockPorts, body_text, location, portal_app, session_cookie,
    };

    fn submitted_event(ends_at: &str, capacity: &str) -> FormData {
        FormData::from_pairs([
            ("title", "Collecte"),
            ("description", "Au local."),
            ("startsAt", "2025-03-15T14:00"),
            ("endsAt", ends_at),
            ("capacity", capacity),
            ("status", "PUBLISHED"),
        ])
    }

    #[rstest]
    #[case("", "", true)]
    #[case("2025-03-15T18:00", "30", true)]
    #[case("2025-03-15T10:00", "30", false)]
    #[case("", "trente", false)]
    fn schedule_and_capacity_are_checked(
        #[case] ends_at: &str,
        #[case] capacity: &str,
        #[case] valid: bool,
    ) {
        let mut data = submitted_event(ends_at, capacity);
        assert_eq!(parse(&mut data).is_some(), valid);
    }

    #[rstest]
    #[actix_web::test]
    async fn list_shows_attendance() {
        let mut ports = MockPorts::default().with_session("tok", Role::Admin);
        ports
            .events
            .expect_list()
            .returning(|_, _| Ok(page(vec![event("e1", 20, 5)], 1, 1)));
        let app = portal_app!(ports);
        let cookie = session_cookie!(app, "tok");

        let body = body_text(
            actix_test::call_service(
                &app,
                actix_test::TestRequest::get().uri("/admin/events").cookie(cookie).to_request(),
            )
            .await,
        )
        .await;
        assert!(body.contains("<td>5 / 20</td>"));
        assert!(body.contains("15/03/2025 14:00"));
    }

    #[rstest]
    #[actix_web::test]
    async fn edit_form_uses_local_datetime_values() {
        let mut ports = MockPorts::default().with_session("tok", Role::Admin);
        ports
            .events
            .expect_get()
            .returning(|_, id| Ok(event(id, 20, 5)));
        let app = portal_app!(ports);
        let cookie = session_cookie!(app, "tok");

        let body = body_text(
            actix_test::call_service(
                &app,
                actix_test::TestRequest::get().uri("/admin/events/e1/edit").cookie(cookie).to_request(),
            )
            .await,
        )
        .await;
        assert!(body.contains("value=\"2025-03-15T14:00\""));
        assert!(body.contains("value=\"20\""));
    }

    #[rstest]
    #[actix_web::test]
    async fn updates_redirect_with_a_flash() {
        let mut ports = MockPorts::default().with_session("tok", Role::Admin);
        ports
            .events
            .expect_update()
            .withf(|_, id, draft| id == "e1" && draft.capacity == Some(30))
            .returning(|_, id, _| Ok(event(id, 30, 5)));
        let app = portal_app!(ports);
        let cookie = session_cookie!(app, "tok");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/admin/events/e1")
                .cookie(cookie)
                .set_form([
                    ("title", "Collecte"),
                    ("description", "Au local."),
                    ("startsAt", "2025-03-15T14:00"),
                    ("capacity", "30"),
                    ("status", "PUBLISHED"),
                ])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res).as_deref(), Some("/admin/events"));
    }
}
