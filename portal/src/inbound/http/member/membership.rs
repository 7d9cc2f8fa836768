//! The member's own membership.
//!
//! ```text
//! GET  /dashboard/membership             Current membership or the offers
//! POST /dashboard/membership             Subscribe to an offer
//! POST /dashboard/membership/{id}/renew  Renew an expired or ending membership
//! ```

use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};

use super::member_page;
use crate::domain::models::{Membership, MembershipType, NewMembership, format_optional_date};
use crate::inbound::http::ApiResult;
use crate::inbound::http::html::{Form, FormData, button_form, details, escape, see_other};
use crate::inbound::http::report::{Banner, ReportPolicy, Reported, report};
use crate::inbound::http::session::MemberSession;
use crate::inbound::http::state::HttpState;

const MEMBERSHIP_PATH: &str = "/dashboard/membership";

fn membership_details(membership: &Membership) -> String {
    let offer = membership.membership_type.as_ref();
    let mut html = details(&[
        (
            "Numéro d'adhérent",
            membership
                .member_number
                .clone()
                .unwrap_or_else(|| "En cours d'attribution".to_owned()),
        ),
        ("Statut", membership.status.label().to_owned()),
        (
            "Formule",
            offer.map_or_else(|| "-".to_owned(), |offer| offer.name.clone()),
        ),
        (
            "Cotisation",
            offer.map_or_else(|| "-".to_owned(), |offer| offer.price.to_string()),
        ),
        ("Début", format_optional_date(membership.start_date.as_ref())),
        ("Fin", format_optional_date(membership.end_date.as_ref())),
    ]);
    if membership.status.is_renewable() {
        html.push_str(&button_form(
            &format!("{MEMBERSHIP_PATH}/{}/renew", membership.id),
            "Renouveler mon adhésion",
            None,
        ));
    }
    html
}

fn offer_label(offer: &MembershipType) -> String {
    format!("{} · {} · {} mois", offer.name, offer.price, offer.duration_months)
}

fn subscribe_form(offers: &[MembershipType], data: &FormData) -> String {
    if offers.is_empty() {
        return "<p class=\"empty\">Aucune formule d'adhésion n'est proposée pour le moment.</p>"
            .to_owned();
    }
    let labels: Vec<(String, String)> = offers
        .iter()
        .map(|offer| (offer.id.clone(), offer_label(offer)))
        .collect();
    let options: Vec<(&str, &str)> = labels
        .iter()
        .map(|(id, label)| (id.as_str(), label.as_str()))
        .collect();
    let mut html = String::from("<ul class=\"offers\">");
    for offer in offers {
        if let Some(description) = &offer.description {
            html.push_str(&format!(
                "<li><strong>{}</strong> {}</li>",
                escape(&offer.name),
                escape(description)
            ));
        }
    }
    html.push_str("</ul>");
    html.push_str(
        &Form::post(MEMBERSHIP_PATH, data)
            .select("membershipTypeId", "Formule", &options, true)
            .submit("Adhérer")
            .render(),
    );
    html
}

/// Current membership, or the subscription form.
#[get("/dashboard/membership")]
pub async fn show(state: web::Data<HttpState>, member: MemberSession) -> ApiResult<HttpResponse> {
    let credentials = member.credentials();
    let page = member_page(&member, "Mon adhésion");
    let body = match state.memberships.mine(&credentials).await? {
        Some(membership) => membership_details(&membership),
        None => {
            let offers = state.memberships.types(&credentials).await?;
            subscribe_form(&offers, &FormData::default())
        }
    };
    Ok(page.body(body).respond())
}

/// Subscribe to an offer.
#[post("/dashboard/membership")]
pub async fn create(
    state: web::Data<HttpState>,
    member: MemberSession,
    form: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let credentials = member.credentials();
    let mut data = FormData::from(form.into_inner());
    let membership_type_id = data.required("membershipTypeId");
    let banner = if data.is_valid() {
        let request = NewMembership { membership_type_id };
        match report(state.memberships.create(&credentials, &request).await, ReportPolicy::Inline)? {
            Reported::Ready(_) => {
                member
                    .context()
                    .flash(&Banner::success("Votre demande d'adhésion a été enregistrée."));
                return Ok(see_other(MEMBERSHIP_PATH));
            }
            Reported::Inline(banner) => banner,
            Reported::Empty => Banner::error("L'adhésion n'a pas pu être enregistrée."),
        }
    } else {
        Banner::invalid(data.errors().clone())
    };
    data.merge_errors(&banner.fields);
    let offers = report(state.memberships.types(&credentials).await, ReportPolicy::Silent)?
        .ready()
        .unwrap_or_default();
    Ok(member_page(&member, "Mon adhésion")
        .banner(banner)
        .status(StatusCode::UNPROCESSABLE_ENTITY)
        .body(subscribe_form(&offers, &data))
        .respond())
}

/// Renew a membership.
#[post("/dashboard/membership/{id}/renew")]
pub async fn renew(
    state: web::Data<HttpState>,
    member: MemberSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let outcome = state.memberships.renew(&member.credentials(), &id).await;
    member
        .context()
        .flash_outcome(outcome, "Votre demande de renouvellement a été enregistrée.")?;
    Ok(see_other(MEMBERSHIP_PATH))
}
