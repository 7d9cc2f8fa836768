//! Fundraising project management.
//!
//! ```text
//! GET  /admin/projects              Filtered list
//! GET  /admin/projects/new          Creation form
//! POST /admin/projects              Create
//! GET  /admin/projects/{id}/edit    Edit form
//! POST /admin/projects/{id}         Update
//! POST /admin/projects/{id}/delete  Delete
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};

use super::{admin_page, rejected_form, required_choice, row_actions, submitted};
use crate::domain::models::{Project, ProjectDraft, ProjectFilters, ProjectStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::html::{Form, FormData, Table, link, see_other};
use crate::inbound::http::listing::{ListParams, load_list};
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;

const BASE: &str = "/admin/projects";

fn to_form(draft: &ProjectDraft) -> FormData {
    FormData::from_pairs([
        ("title", draft.title.clone()),
        ("description", draft.description.clone()),
        (
            "targetAmount",
            draft
                .target_amount
                .map(|amount| amount.value().to_string())
                .unwrap_or_default(),
        ),
        ("status", draft.status.as_str().to_owned()),
    ])
}

fn parse(data: &mut FormData) -> Option<ProjectDraft> {
    let title = data.required("title");
    let description = data.required("description");
    let target_amount = data.amount("targetAmount");
    let status = required_choice(data, "status", ProjectStatus::parse)?;
    data.is_valid().then_some(ProjectDraft {
        title,
        description,
        target_amount,
        status,
    })
}

fn form(action: &str, data: &FormData) -> String {
    Form::post(action, data)
        .text("title", "Titre", true)
        .textarea("description", "Description", true)
        .number("targetAmount", "Objectif de collecte (€)", "0.01", false)
        .select("status", "Statut", &ProjectStatus::options(), true)
        .submit("Enregistrer")
        .render()
}

fn progress(project: &Project) -> String {
    match project.target_amount {
        Some(target) => format!("{} / {target}", project.collected_amount),
        None => project.collected_amount.to_string(),
    }
}

/// Filtered project list.
#[get("/admin/projects")]
pub async fn list(
    state: web::Data<HttpState>,
    admin: AdminSession,
    query: web::Query<ListParams<ProjectFilters>>,
) -> ApiResult<HttpResponse> {
    let credentials = admin.credentials();
    let port = &state.projects;
    let credentials = &credentials;
    let listing = load_list(query.into_inner(), state.site.page_size, |query| async move {
        port.list(credentials, &query).await
    })
    .await?;
    let filter_data = listing.filter_form();
    let filters = Form::filter(BASE, &filter_data)
        .text("search", "Recherche", false)
        .select("status", "Statut", &ProjectStatus::options(), false)
        .render();
    let table = Table::new("Aucun projet ne correspond à ces critères.")
        .column("Titre", |project: &Project| project.title.clone())
        .column("Statut", |project: &Project| project.status.label().to_owned())
        .column("Collecte", progress)
        .html_column("", |project: &Project| row_actions(BASE, &project.id));
    let body = format!(
        "<p>{}</p>{filters}{}{}",
        link("/admin/projects/new", "Nouveau projet"),
        table.render(&listing.rows),
        listing.pagination(BASE)
    );
    Ok(admin_page(&admin, "Projets").body(body).respond())
}

/// Blank creation form.
#[get("/admin/projects/new")]
pub async fn new_project(admin: AdminSession) -> ApiResult<HttpResponse> {
    let body = form(BASE, &to_form(&ProjectDraft::default()));
    Ok(admin_page(&admin, "Nouveau projet").body(body).respond())
}

/// Create a project.
#[post("/admin/projects")]
pub async fn create(
    state: web::Data<HttpState>,
    admin: AdminSession,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse(&mut data) {
        Some(draft) => Some(state.projects.create(&admin.credentials(), &draft).await),
        None => None,
    };
    Ok(match submitted(admin.context(), &mut data, result, "Projet enregistré.")? {
        Ok(_) => see_other(BASE),
        Err(banner) => rejected_form(admin_page(&admin, "Nouveau projet"), banner, form(BASE, &data)),
    })
}

/// Edit form.
#[get("/admin/projects/{id}/edit")]
pub async fn edit(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let project = state.projects.get(&admin.credentials(), &id).await?;
    let body = form(
        &format!("{BASE}/{}", project.id),
        &to_form(&ProjectDraft::from(&project)),
    );
    Ok(admin_page(&admin, &project.title).body(body).respond())
}

/// Update a project.
#[post("/admin/projects/{id}")]
pub async fn update(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse(&mut data) {
        Some(draft) => Some(state.projects.update(&admin.credentials(), &id, &draft).await),
        None => None,
    };
    Ok(match submitted(admin.context(), &mut data, result, "Projet mis à jour.")? {
        Ok(_) => see_other(BASE),
        Err(banner) => rejected_form(
            admin_page(&admin, "Modifier le projet"),
            banner,
            form(&format!("{BASE}/{id}"), &data),
        ),
    })
}

/// Delete a project.
#[post("/admin/projects/{id}/delete")]
pub async fn delete(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let outcome = state.projects.delete(&admin.credentials(), &id).await;
    admin.context().flash_outcome(outcome, "Projet supprimé.")?;
    Ok(see_other(BASE))
}
