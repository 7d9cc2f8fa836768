//! Membership review.
//!
//! ```text
//! GET  /admin/memberships              Filtered list
//! POST /admin/memberships/{id}/status  Request a status transition
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};

use super::admin_page;
use crate::domain::models::{Membership, MembershipFilters, MembershipStatus, format_optional_date};
use crate::inbound::http::ApiResult;
use crate::inbound::http::html::{Form, FormData, Table, see_other};
use crate::inbound::http::listing::{ListParams, load_list};
use crate::inbound::http::report::Banner;
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;

const BASE: &str = "/admin/memberships";

fn member(membership: &Membership) -> String {
    membership
        .user
        .as_ref()
        .map_or_else(|| "-".to_owned(), crate::domain::models::User::full_name)
}

fn status_form(membership: &Membership) -> String {
    let data = FormData::from_pairs([("status", membership.status.as_str())]);
    Form::post(&format!("{BASE}/{}/status", membership.id), &data)
        .select("status", "Statut", &MembershipStatus::options(), true)
        .submit("Appliquer")
        .render()
}

/// Every membership with its status control.
#[get("/admin/memberships")]
pub async fn list(
    state: web::Data<HttpState>,
    admin: AdminSession,
    query: web::Query<ListParams<MembershipFilters>>,
) -> ApiResult<HttpResponse> {
    let credentials = admin.credentials();
    let port = &state.memberships;
    let credentials = &credentials;
    let listing = load_list(query.into_inner(), state.site.page_size, |query| async move {
        port.list(credentials, &query).await
    })
    .await?;
    let filter_data = listing.filter_form();
    let filters = Form::filter(BASE, &filter_data)
        .text("search", "Adhérent ou numéro", false)
        .select("status", "Statut", &MembershipStatus::options(), false)
        .render();
    let table = Table::new("Aucune adhésion ne correspond à ces critères.")
        .column("N°", |membership: &Membership| {
            membership.member_number.clone().unwrap_or_else(|| "-".to_owned())
        })
        .column("Adhérent", member)
        .column("Formule", |membership: &Membership| {
            membership
                .membership_type
                .as_ref()
                .map_or_else(|| "-".to_owned(), |offer| offer.name.clone())
        })
        .column("Fin", |membership: &Membership| {
            format_optional_date(membership.end_date.as_ref())
        })
        .html_column("Statut", status_form);
    let body = format!(
        "{filters}{}{}",
        table.render(&listing.rows),
        listing.pagination(BASE)
    );
    Ok(admin_page(&admin, "Adhésions").body(body).respond())
}

/// Ask the backend for a status transition; it decides which are allowed.
#[post("/admin/memberships/{id}/status")]
pub async fn change_status(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let data = FormData::from(form_data.into_inner());
    match MembershipStatus::parse(data.value("status")) {
        Some(status) => {
            let outcome = state
                .memberships
                .change_status(&admin.credentials(), &id, status)
                .await;
            admin
                .context()
                .flash_outcome(outcome, &format!("Adhésion passée au statut « {} ».", status.label()))?;
        }
        None => admin.context().flash(&Banner::error("Statut d'adhésion inconnu.")),
    }
    Ok(see_other(BASE))
}
