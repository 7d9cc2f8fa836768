//! Outreach sessions and the encounters logged during them.
//!
//! ```text
//! GET  /admin/maraude/sessions                  Filtered list
//! GET  /admin/maraude/sessions/new              Planning form
//! POST /admin/maraude/sessions                  Plan a session
//! GET  /admin/maraude/sessions/{id}             Detail with encounters
//! POST /admin/maraude/sessions/{id}/encounters  Log an encounter
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};
use pagination::{MAX_LIMIT, PageRequest};

use crate::domain::models::{
    BeneficiaryFilters, Encounter, EncounterDraft, MaraudeSession, MaraudeStatus, MaraudeZone,
    SessionDraft, SessionFilters, format_datetime,
};
use crate::domain::ListQuery;
use crate::inbound::http::ApiResult;
use crate::inbound::http::admin::{admin_page, rejected_form, submitted};
use crate::inbound::http::html::{Form, FormData, Page, Table, details, link, see_other};
use crate::inbound::http::listing::{ListParams, load_list};
use crate::inbound::http::report::{Banner, ReportPolicy, report};
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;

const BASE: &str = "/admin/maraude/sessions";

async fn zones(state: &HttpState, admin: &AdminSession) -> ApiResult<Vec<MaraudeZone>> {
    Ok(report(state.maraude.zones(&admin.credentials()).await, ReportPolicy::Silent)?
        .ready()
        .unwrap_or_default())
}

fn zone_options(zones: &[MaraudeZone]) -> Vec<(&str, &str)> {
    zones
        .iter()
        .map(|zone| (zone.id.as_str(), zone.name.as_str()))
        .collect()
}

fn parse_session(data: &mut FormData) -> Option<SessionDraft> {
    let starts_at = data.required_datetime("startsAt");
    let ends_at = data.datetime("endsAt");
    let starts_at = starts_at?;
    if ends_at.is_some_and(|end| end < starts_at) {
        data.reject("endsAt", "La fin doit suivre le début.");
    }
    let draft = SessionDraft {
        starts_at,
        ends_at,
        zone_id: data.optional("zoneId"),
        notes: data.optional("notes"),
    };
    data.is_valid().then_some(draft)
}

fn session_form(data: &FormData, zones: &[MaraudeZone]) -> String {
    Form::post(BASE, data)
        .datetime("startsAt", "Départ", true)
        .datetime("endsAt", "Retour prévu", false)
        .optional_select("zoneId", "Zone", &zone_options(zones), "Zone non définie")
        .textarea("notes", "Consignes", false)
        .submit("Planifier")
        .render()
}

/// An encounter needs at least one need or a note to be worth logging.
fn parse_encounter(data: &mut FormData) -> Option<EncounterDraft> {
    let draft = EncounterDraft {
        beneficiary_id: data.optional("beneficiaryId"),
        need_ids: data.checked_ids("need"),
        referral: data.optional("referral"),
        notes: data.optional("notes"),
    };
    if draft.need_ids.is_empty() && draft.notes.is_none() {
        data.reject("notes", "Cochez un besoin ou ajoutez une note.");
        return None;
    }
    Some(draft)
}

fn encounter_person(encounter: &Encounter) -> String {
    encounter
        .beneficiary
        .as_ref()
        .map_or_else(|| "Personne non identifiée".to_owned(), |person| person.alias.clone())
}

fn encounter_needs(encounter: &Encounter) -> String {
    encounter
        .needs
        .iter()
        .map(|need| need.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Detail page with the encounter form populated from `data`.
async fn detail_page(
    state: &HttpState,
    admin: &AdminSession,
    session: &MaraudeSession,
    data: &FormData,
) -> ApiResult<Page> {
    let credentials = admin.credentials();
    let people_query = ListQuery::new(PageRequest::first(MAX_LIMIT), BeneficiaryFilters::default());
    let (people, needs) = futures_util::join!(
        state.beneficiaries.list(&credentials, &people_query),
        state.maraude.categories(&credentials),
    );
    let people = report(people, ReportPolicy::Silent)?
        .ready()
        .map(|page| page.data)
        .unwrap_or_default();
    let needs = report(needs, ReportPolicy::Silent)?.ready().unwrap_or_default();

    let summary = details(&[
        ("Départ", format_datetime(&session.starts_at)),
        (
            "Retour",
            session
                .ends_at
                .as_ref()
                .map_or_else(|| "-".to_owned(), format_datetime),
        ),
        ("Zone", session.zone_name().to_owned()),
        ("Statut", session.status.label().to_owned()),
        ("Consignes", session.notes.clone().unwrap_or_else(|| "-".to_owned())),
    ]);
    let encounters = Table::new("Aucune rencontre enregistrée.")
        .column("Heure", |encounter: &Encounter| {
            encounter.created_at.format("%H:%M").to_string()
        })
        .column("Personne", encounter_person)
        .column("Besoins", encounter_needs)
        .column("Orientation", |encounter: &Encounter| {
            encounter.referral.clone().unwrap_or_default()
        })
        .column("Notes", |encounter: &Encounter| encounter.notes.clone().unwrap_or_default())
        .render(&session.encounters);

    let people: Vec<(&str, &str)> = people
        .iter()
        .map(|person| (person.id.as_str(), person.alias.as_str()))
        .collect();
    let needs: Vec<(&str, &str)> = needs
        .iter()
        .map(|need| (need.id.as_str(), need.name.as_str()))
        .collect();
    let form = Form::post(&format!("{BASE}/{}/encounters", session.id), data)
        .optional_select("beneficiaryId", "Personne rencontrée", &people, "Personne non identifiée")
        .checkboxes("need", "Besoins exprimés", &needs)
        .text("referral", "Orientation", false)
        .textarea("notes", "Notes", false)
        .submit("Enregistrer la rencontre")
        .render();

    let body = format!(
        "{summary}<h2>Rencontres</h2>{encounters}<h2>Nouvelle rencontre</h2>{form}<p>{}</p>",
        link(BASE, "Retour aux maraudes")
    );
    Ok(admin_page(admin, &format!("Maraude du {}", format_datetime(&session.starts_at))).body(body))
}

/// Filtered session list.
#[get("/admin/maraude/sessions")]
pub async fn list(
    state: web::Data<HttpState>,
    admin: AdminSession,
    query: web::Query<ListParams<SessionFilters>>,
) -> ApiResult<HttpResponse> {
    let credentials = admin.credentials();
    let zones = zones(&state, &admin).await?;
    let port = &state.maraude;
    let credentials = &credentials;
    let listing = load_list(query.into_inner(), state.site.page_size, |query| async move {
        port.list_sessions(credentials, &query).await
    })
    .await?;
    let filter_data = listing.filter_form();
    let filters = Form::filter(BASE, &filter_data)
        .select("status", "Statut", &MaraudeStatus::options(), false)
        .select("zoneId", "Zone", &zone_options(&zones), false)
        .render();
    let table = Table::new("Aucune maraude ne correspond à ces critères.")
        .column("Départ", |session: &MaraudeSession| format_datetime(&session.starts_at))
        .column("Zone", |session: &MaraudeSession| session.zone_name().to_owned())
        .column("Statut", |session: &MaraudeSession| session.status.label().to_owned())
        .column("Rencontres", |session: &MaraudeSession| session.encounters.len().to_string())
        .html_column("", |session: &MaraudeSession| {
            link(&format!("{BASE}/{}", session.id), "Détail")
        });
    let body = format!(
        "<p>{}</p>{filters}{}{}",
        link("/admin/maraude/sessions/new", "Planifier une maraude"),
        table.render(&listing.rows),
        listing.pagination(BASE)
    );
    Ok(admin_page(&admin, "Maraudes").body(body).respond())
}

/// Planning form.
#[get("/admin/maraude/sessions/new")]
pub async fn new_session(state: web::Data<HttpState>, admin: AdminSession) -> ApiResult<HttpResponse> {
    let zones = zones(&state, &admin).await?;
    let body = session_form(&FormData::default(), &zones);
    Ok(admin_page(&admin, "Planifier une maraude").body(body).respond())
}

/// Plan a session, then open its detail page.
#[post("/admin/maraude/sessions")]
pub async fn create(
    state: web::Data<HttpState>,
    admin: AdminSession,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse_session(&mut data) {
        Some(draft) => Some(state.maraude.create_session(&admin.credentials(), &draft).await),
        None => None,
    };
    match submitted(admin.context(), &mut data, result, "Maraude planifiée.")? {
        Ok(session) => Ok(see_other(format!("{BASE}/{}", session.id))),
        Err(banner) => {
            let zones = zones(&state, &admin).await?;
            Ok(rejected_form(
                admin_page(&admin, "Planifier une maraude"),
                banner,
                session_form(&data, &zones),
            ))
        }
    }
}

/// Session detail.
#[get("/admin/maraude/sessions/{id}")]
pub async fn detail(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let session = state.maraude.get_session(&admin.credentials(), &id).await?;
    let page = detail_page(&state, &admin, &session, &FormData::default()).await?;
    Ok(page.respond())
}

/// Log an encounter on a session.
#[post("/admin/maraude/sessions/{id}/encounters")]
pub async fn add_encounter(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let credentials = admin.credentials();
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse_encounter(&mut data) {
        Some(draft) => Some(state.maraude.add_encounter(&credentials, &id, &draft).await),
        None => None,
    };
    let banner: Banner = match submitted(admin.context(), &mut data, result, "Rencontre enregistrée.")? {
        Ok(_) => return Ok(see_other(format!("{BASE}/{id}"))),
        Err(banner) => banner,
    };
    let session = state.maraude.get_session(&credentials, &id).await?;
    let page = detail_page(&state, &admin, &session, &data).await?;
    Ok(rejected_form(page, banner, String::new()))
}
