//! Member home.

use actix_web::{HttpResponse, get, web};
use pagination::PageRequest;

use super::member_page;
use crate::domain::ListQuery;
use crate::domain::models::{DonationFilters, format_date, format_optional_date};
use crate::inbound::http::ApiResult;
use crate::inbound::http::html::{details, escape, link};
use crate::inbound::http::report::{ReportPolicy, report};
use crate::inbound::http::session::MemberSession;
use crate::inbound::http::state::HttpState;

const RECENT_DONATIONS: u32 = 3;

/// Membership status, recent donations and upcoming registrations.
#[get("/dashboard")]
pub async fn dashboard(state: web::Data<HttpState>, member: MemberSession) -> ApiResult<HttpResponse> {
    let credentials = member.credentials();
    let membership = report(state.memberships.mine(&credentials).await, ReportPolicy::Silent)?
        .ready()
        .flatten();
    let donations = report(
        state
            .donations
            .list_mine(
                &credentials,
                &ListQuery::new(PageRequest::first(RECENT_DONATIONS), DonationFilters::default()),
            )
            .await,
        ReportPolicy::Silent,
    )?
    .ready()
    .map(|page| page.data)
    .unwrap_or_default();
    let registrations = report(state.events.my_registrations(&credentials).await, ReportPolicy::Silent)?
        .ready()
        .unwrap_or_default();

    let mut body = String::from("<section><h2>Mon adhésion</h2>");
    match &membership {
        Some(membership) => body.push_str(&details(&[
            ("Statut", membership.status.label().to_owned()),
            (
                "Fin de validité",
                format_optional_date(membership.end_date.as_ref()),
            ),
        ])),
        None => body.push_str(&format!(
            "<p>Vous n'êtes pas encore adhérent. {}</p>",
            link("/dashboard/membership", "Adhérer")
        )),
    }
    body.push_str("</section><section><h2>Mes derniers dons</h2>");
    if donations.is_empty() {
        body.push_str("<p class=\"empty\">Aucun don pour le moment.</p>");
    } else {
        body.push_str("<ul>");
        for donation in &donations {
            body.push_str(&format!(
                "<li>{} · {} · {}</li>",
                format_date(&donation.created_at),
                escape(&donation.amount.to_string()),
                escape(donation.destination())
            ));
        }
        body.push_str("</ul>");
    }
    body.push_str(&format!(
        "<p>{}</p></section><section><h2>Mes événements</h2>",
        link("/dashboard/donations/new", "Faire un don")
    ));
    if registrations.is_empty() {
        body.push_str("<p class=\"empty\">Aucune inscription.</p>");
    } else {
        body.push_str("<ul>");
        for registration in &registrations {
            body.push_str(&format!(
                "<li>{} · {}</li>",
                format_date(&registration.event.starts_at),
                escape(&registration.event.title)
            ));
        }
        body.push_str("</ul>");
    }
    body.push_str("</section>");
    Ok(member_page(&member, "Tableau de bord").body(body).respond())
}
