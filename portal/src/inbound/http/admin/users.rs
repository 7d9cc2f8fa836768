//! Account list and role assignment.
//!
//! ```text
//! GET  /admin/users            Filtered list
//! POST /admin/users/{id}/role  Assign a role
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};

use super::admin_page;
use crate::domain::models::{User, UserFilters, format_optional_date};
use crate::domain::Role;
use crate::inbound::http::ApiResult;
use crate::inbound::http::html::{Form, FormData, Table, see_other};
use crate::inbound::http::listing::{ListParams, load_list};
use crate::inbound::http::report::Banner;
use crate::inbound::http::session::AdminSession;
use crate::inbound::http::state::HttpState;

const BASE: &str = "/admin/users";

fn role_options() -> Vec<(&'static str, &'static str)> {
    Role::ASSIGNABLE
        .iter()
        .map(|role| (role.as_str(), role.label()))
        .collect()
}

fn role_form(user: &User) -> String {
    let data = FormData::from_pairs([("role", user.role.as_str())]);
    Form::post(&format!("{BASE}/{}/role", user.id), &data)
        .select("role", "Rôle", &role_options(), true)
        .submit("Appliquer")
        .render()
}

/// Accounts with their role control.
#[get("/admin/users")]
pub async fn list(
    state: web::Data<HttpState>,
    admin: AdminSession,
    query: web::Query<ListParams<UserFilters>>,
) -> ApiResult<HttpResponse> {
    let credentials = admin.credentials();
    let port = &state.users;
    let credentials = &credentials;
    let listing = load_list(query.into_inner(), state.site.page_size, |query| async move {
        port.list(credentials, &query).await
    })
    .await?;
    let filter_data = listing.filter_form();
    let filters = Form::filter(BASE, &filter_data)
        .text("search", "Nom ou e-mail", false)
        .select("role", "Rôle", &role_options(), false)
        .render();
    let table = Table::new("Aucun compte ne correspond à ces critères.")
        .column("Nom", User::full_name)
        .column("E-mail", |user: &User| user.email.clone())
        .column("Inscription", |user: &User| format_optional_date(user.created_at.as_ref()))
        .html_column("Rôle", role_form);
    let body = format!(
        "{filters}{}{}",
        table.render(&listing.rows),
        listing.pagination(BASE)
    );
    Ok(admin_page(&admin, "Utilisateurs").body(body).respond())
}

/// Assign one of the assignable roles.
#[post("/admin/users/{id}/role")]
pub async fn change_role(
    state: web::Data<HttpState>,
    admin: AdminSession,
    id: web::Path<String>,
    form_data: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let data = FormData::from(form_data.into_inner());
    match Role::parse(data.value("role")) {
        Some(role) => {
            let outcome = state.users.change_role(&admin.credentials(), &id, role).await;
            if let Some(user) = admin.context().flash_outcome(outcome, "Rôle mis à jour.")? {
                tracing::info!(user_id = %user.id, role = role.as_str(), "role assigned");
            }
        }
        None => admin.context().flash(&Banner::error("Rôle inconnu.")),
    }
    Ok(see_other(BASE))
}
