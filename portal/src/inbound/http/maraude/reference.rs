//! Reference data for outreach: zones and need categories.
//!
//! ```text
//! GET  /admin/maraude/zones                   List plus creation form
//! POST /admin/maraude/zones                   Create
//! POST /admin/maraude/zones/{id}/delete       Delete
//! GET  /admin/maraude/categories              List plus creation form
//! POST /admin/maraude/categories              Create
//! POST /admin/maraude/categories/{id}/delete  Delete
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};

use crate::domain::models::{MaraudeZone, NamedDraft, NeedCategory};
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::admin::{admin_page, rejected_form, submitted};
use crate::inbound::http::html::{Form, FormData, Page, Table, button_form, see_other};
use crate::inbound::http::report::{ReportPolicy, report};
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;

/// Labels and paths of one reference list.
struct Catalogue {
    base: &'static str,
    title: &'static str,
    empty: &'static str,
    created: &'static str,
    deleted: &'static str,
}

const ZONES: Catalogue = Catalogue {
    base: "/admin/maraude/zones",
    title: "Zones de maraude",
    empty: "Aucune zone définie.",
    created: "Zone ajoutée.",
    deleted: "Zone supprimée.",
};

const CATEGORIES: Catalogue = Catalogue {
    base: "/admin/maraude/categories",
    title: "Catégories de besoins",
    empty: "Aucune catégorie définie.",
    created: "Catégorie ajoutée.",
    deleted: "Catégorie supprimée.",
};

trait Entry {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn description(&self) -> Option<&str>;
}

impl Entry for MaraudeZone {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl Entry for NeedCategory {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

fn parse(data: &mut FormData) -> Option<NamedDraft> {
    let draft = NamedDraft {
        name: data.required("name"),
        description: data.optional("description"),
    };
    data.is_valid().then_some(draft)
}

/// Listing page over `entries`; a failed load shows the empty state.
fn catalogue_page<T: Entry>(
    admin: &AdminSession,
    catalogue: &Catalogue,
    entries: Result<Vec<T>, Error>,
) -> ApiResult<Page> {
    let entries = report(entries, ReportPolicy::Silent)?.ready().unwrap_or_default();
    let table = Table::new(catalogue.empty)
        .column("Nom", |entry: &T| entry.name().to_owned())
        .column("Description", |entry: &T| {
            entry.description().unwrap_or("-").to_owned()
        })
        .html_column("", |entry: &T| {
            button_form(
                &format!("{}/{}/delete", catalogue.base, entry.id()),
                "Supprimer",
                Some("Supprimer cet élément ?"),
            )
        });
    Ok(admin_page(admin, catalogue.title).body(table.render(&entries)))
}

fn creation_form(catalogue: &Catalogue, data: &FormData) -> String {
    Form::post(catalogue.base, data)
        .text("name", "Nom", true)
        .textarea("description", "Description", false)
        .submit("Ajouter")
        .render()
}

fn show<T: Entry>(
    admin: &AdminSession,
    catalogue: &Catalogue,
    entries: Result<Vec<T>, Error>,
) -> ApiResult<HttpResponse> {
    let form = creation_form(catalogue, &FormData::default());
    Ok(catalogue_page(admin, catalogue, entries)?.body(form).respond())
}

/// Redirect on success, otherwise re-render the list under the rejected form.
async fn created<T, E, F, Fut>(
    admin: &AdminSession,
    catalogue: &Catalogue,
    mut data: FormData,
    result: Option<Result<T, Error>>,
    reload: F,
) -> ApiResult<HttpResponse>
where
    E: Entry,
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<Vec<E>, Error>>,
{
    match submitted(admin.context(), &mut data, result, catalogue.created)? {
        Ok(_) => Ok(see_other(catalogue.base)),
        Err(banner) => {
            let page = catalogue_page(admin, catalogue, reload().await)?;
            Ok(rejected_form(page, banner, creation_form(catalogue, &data)))
        }
    }
}

/// Zone list.
#[get("/admin/maraude/zones")]
pub async fn zones(state: web::Data<HttpState>, admin: AdminSession) -> ApiResult<HttpResponse> {
    let entries = state.maraude.zones(&admin.credentials()).await;
    show(&admin, &ZONES, entries)
}

/// Add a zone.
#[post("/admin/maraude/zones")]
pub async fn create_zone(
    state: web::Data<HttpState>,
    admin: AdminSession,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let credentials = admin.credentials();
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse(&mut data) {
        Some(draft) => Some(state.maraude.create_zone(&credentials, &draft).await),
        None => None,
    };
    created(&admin, &ZONES, data, result, || state.maraude.zones(&credentials)).await
}

/// Remove a zone.
#[post("/admin/maraude/zones/{id}/delete")]
pub async fn delete_zone(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let outcome = state.maraude.delete_zone(&admin.credentials(), &id).await;
    admin.context().flash_outcome(outcome, ZONES.deleted)?;
    Ok(see_other(ZONES.base))
}

/// Need category list.
#[get("/admin/maraude/categories")]
pub async fn categories(state: web::Data<HttpState>, admin: AdminSession) -> ApiResult<HttpResponse> {
    let entries = state.maraude.categories(&admin.credentials()).await;
    show(&admin, &CATEGORIES, entries)
}

/// Add a need category.
#[post("/admin/maraude/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    admin: AdminSession,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let credentials = admin.credentials();
    let mut data = FormData::from(form_data.into_inner());
    let result = match parse(&mut data) {
        Some(draft) => Some(state.maraude.create_category(&credentials, &draft).await),
        None => None,
    };
    created(&admin, &CATEGORIES, data, result, || state.maraude.categories(&credentials)).await
}

/// Remove a need category.
#[post("/admin/maraude/categories/{id}/delete")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let outcome = state.maraude.delete_category(&admin.credentials(), &id).await;
    admin.context().flash_outcome(outcome, CATEGORIES.deleted)?;
    Ok(see_other(CATEGORIES.base))
}
