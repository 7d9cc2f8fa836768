//! Donations and the payment hand-off.
//!
//! ```text
//! GET  /dashboard/donations               History and annual receipt form
//! GET  /dashboard/donations/new           Donation form
//! POST /dashboard/donations               Create the donation, mount the payment element
//! GET  /dashboard/donations/confirmation  Tax estimate and receipt polling
//! POST /dashboard/donations/receipts      Annual receipt for a year
//! ```
//!
//! The payment provider confirms in the browser and sends the member back to
//! the confirmation page with the donation id. Receipts are generated by the
//! backend asynchronously; until then the page re-polls itself.

use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use chrono::{Datelike, Utc};
use pagination::{MAX_LIMIT, PageRequest};
use serde::Deserialize;
use tracing::info;

use super::member_page;
use crate::domain::models::{
    Donation, DonationFilters, DonationIntent, NewDonation, ProjectFilters, Receipt, format_date,
};
use crate::domain::{Credentials, ErrorCode, ListQuery};
use crate::inbound::http::ApiResult;
use crate::inbound::http::html::{Form, FormData, Page, Table, details, escape, link};
use crate::inbound::http::listing::{ListParams, load_list};
use crate::inbound::http::report::{Banner, ReportPolicy, Reported, report};
use crate::inbound::http::session::MemberSession;
use crate::inbound::http::state::HttpState;

/// Seconds between two receipt polls.
pub const RECEIPT_POLL_SECONDS: u32 = 5;
/// Polls before the page stops refreshing.
pub const RECEIPT_POLL_ATTEMPTS: u32 = 12;

const CONFIRMATION_PATH: &str = "/dashboard/donations/confirmation";
const PAYMENT_SCRIPT: &str = "<script src=\"https://js.stripe.com/v3/\"></script>";
const PAYMENT_MOUNT: &str = "<script>(function () {\
var node = document.getElementById('payment-element');\
var stripe = Stripe(node.dataset.publishableKey);\
var elements = stripe.elements({ clientSecret: node.dataset.clientSecret });\
elements.create('payment').mount(node);\
document.getElementById('payment-form').addEventListener('submit', function (event) {\
event.preventDefault();\
stripe.confirmPayment({ elements: elements, confirmParams: { return_url: node.dataset.returnUrl } })\
.then(function (result) { if (result.error) {\
document.getElementById('payment-error').textContent = result.error.message; } });\
});\
})();</script>";

fn tax_notice(donation: &Donation) -> String {
    format!(
        "<p class=\"tax\">Réduction d'impôt estimée : <strong>{}</strong> (66 % du montant).</p>",
        escape(&donation.amount.tax_deduction().to_string())
    )
}

fn receipt_link(receipt: &Receipt) -> String {
    format!(
        "<p class=\"receipt\">Reçu fiscal n° {} : {}</p>",
        escape(&receipt.receipt_number),
        link(&receipt.file_url, "télécharger")
    )
}

fn annual_receipt_form(data: &FormData) -> String {
    Form::post("/dashboard/donations/receipts", data)
        .number("year", "Année", "1", true)
        .submit("Obtenir le reçu annuel")
        .render()
}

fn default_year_form() -> FormData {
    FormData::from_pairs([("year", (Utc::now().year() - 1).to_string())])
}

fn receipt_page(member: &MemberSession, data: &FormData) -> Page {
    member_page(member, "Reçu fiscal annuel").body(annual_receipt_form(data))
}

fn history_page(member: &MemberSession, rows: &[Donation], pagination: &str) -> Page {
    let table = Table::new("Vous n'avez pas encore fait de don.")
        .column("Date", |donation: &Donation| format_date(&donation.created_at))
        .column("Montant", |donation| donation.amount.to_string())
        .column("Destination", |donation| donation.destination().to_owned())
        .column("Statut", |donation| donation.status.label().to_owned())
        .html_column("Reçu", |donation| {
            link(
                &format!("{CONFIRMATION_PATH}?donation_id={}", donation.id),
                "Voir",
            )
        });
    let body = format!(
        "<p>{}</p>{}{}<section><h2>Reçu fiscal annuel</h2>{}</section>",
        link("/dashboard/donations/new", "Faire un don"),
        table.render(rows),
        pagination,
        annual_receipt_form(&default_year_form())
    );
    member_page(member, "Mes dons").body(body)
}

/// Donation history.
#[get("/dashboard/donations")]
pub async fn list(
    state: web::Data<HttpState>,
    member: MemberSession,
    query: web::Query<ListParams<DonationFilters>>,
) -> ApiResult<HttpResponse> {
    let credentials = member.credentials();
    let port = &state.donations;
    let credentials = &credentials;
    let listing = load_list(query.into_inner(), state.site.page_size, |query| async move {
        port.list_mine(credentials, &query).await
    })
    .await?;
    let pagination = listing.pagination("/dashboard/donations");
    Ok(history_page(&member, &listing.rows, &pagination).respond())
}

/// Preselected project of the donation form.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDonationQuery {
    /// Project to earmark the donation to.
    #[serde(default)]
    pub project_id: Option<String>,
}

async fn donation_form(state: &HttpState, data: &FormData) -> ApiResult<String> {
    let projects = report(
        state
            .projects
            .list(
                &Credentials::Anonymous,
                &ListQuery::new(PageRequest::first(MAX_LIMIT), ProjectFilters::active()),
            )
            .await,
        ReportPolicy::Silent,
    )?
    .ready()
    .map(|page| page.data)
    .unwrap_or_default();
    let options: Vec<(&str, &str)> = projects
        .iter()
        .map(|project| (project.id.as_str(), project.title.as_str()))
        .collect();
    Ok(Form::post("/dashboard/donations", data)
        .number("amount", "Montant (€)", "0.01", true)
        .optional_select("projectId", "Projet soutenu", &options, "Fonds général")
        .checkbox("isAnonymous", "Rester anonyme")
        .textarea("message", "Message", false)
        .submit("Continuer vers le paiement")
        .render())
}

fn payments_disabled(state: &HttpState) -> bool {
    state.site.payment_publishable_key.is_none()
}

/// Donation form.
#[get("/dashboard/donations/new")]
pub async fn new_donation(
    state: web::Data<HttpState>,
    member: MemberSession,
    query: web::Query<NewDonationQuery>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::default();
    if let Some(project_id) = query.into_inner().project_id {
        data.set("projectId", project_id);
    }
    let mut page = member_page(&member, "Faire un don");
    if payments_disabled(&state) {
        page = page.banner(Banner::info("Les paiements en ligne sont momentanément indisponibles."));
    }
    Ok(page.body(donation_form(&state, &data).await?).respond())
}

fn payment_page(state: &HttpState, member: &MemberSession, intent: &DonationIntent, key: &str) -> Page {
    let donation = &intent.donation;
    let return_url = state
        .site
        .absolute(&format!("{CONFIRMATION_PATH}?donation_id={}", donation.id));
    let body = format!(
        "{}{}<form id=\"payment-form\"><div id=\"payment-element\" data-publishable-key=\"{}\" \
data-client-secret=\"{}\" data-return-url=\"{}\"></div><p id=\"payment-error\" role=\"alert\"></p>\
<button type=\"submit\">Payer {}</button></form>{PAYMENT_MOUNT}",
        details(&[
            ("Montant", donation.amount.to_string()),
            ("Destination", donation.destination().to_owned()),
        ]),
        tax_notice(donation),
        escape(key),
        escape(&intent.client_secret),
        escape(&return_url),
        escape(&donation.amount.to_string())
    );
    member_page(member, "Paiement").head(PAYMENT_SCRIPT).body(body)
}

/// Create the donation and hand off to the payment provider.
#[post("/dashboard/donations")]
pub async fn create(
    state: web::Data<HttpState>,
    member: MemberSession,
    form: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form.into_inner());
    let Some(key) = state.site.payment_publishable_key.clone() else {
        let page = member_page(&member, "Faire un don")
            .banner(Banner::error("Les paiements en ligne sont momentanément indisponibles."))
            .status(StatusCode::SERVICE_UNAVAILABLE);
        return Ok(page.body(donation_form(&state, &data).await?).respond());
    };
    let amount = data.required_amount("amount");
    let request = amount.map(|amount| NewDonation {
        amount,
        project_id: data.optional("projectId"),
        is_anonymous: data.checked("isAnonymous"),
        message: data.optional("message"),
    });
    let banner = match request {
        Some(request) if data.is_valid() => {
            match report(
                state.donations.create(&member.credentials(), &request).await,
                ReportPolicy::Inline,
            )? {
                Reported::Ready(intent) => {
                    info!(donation_id = %intent.donation.id, "donation created");
                    return Ok(payment_page(&state, &member, &intent, &key).respond());
                }
                Reported::Inline(banner) => banner,
                Reported::Empty => Banner::error("Le don n'a pas pu être enregistré."),
            }
        }
        _ => Banner::invalid(data.errors().clone()),
    };
    data.merge_errors(&banner.fields);
    let page = member_page(&member, "Faire un don")
        .banner(banner)
        .status(StatusCode::UNPROCESSABLE_ENTITY);
    Ok(page.body(donation_form(&state, &data).await?).respond())
}

/// Return URL parameters of the payment provider.
#[derive(Debug, Deserialize)]
pub struct ConfirmationQuery {
    /// Donation being confirmed.
    pub donation_id: String,
    /// Poll counter, starting at 1.
    #[serde(default)]
    pub attempt: Option<u32>,
}

/// Next poll URL, or `None` once the attempts are exhausted.
#[must_use]
pub fn next_poll(donation_id: &str, attempt: u32) -> Option<String> {
    (attempt < RECEIPT_POLL_ATTEMPTS).then(|| {
        let query: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("donation_id", donation_id)
            .append_pair("attempt", &(attempt + 1).to_string())
            .finish();
        format!("{CONFIRMATION_PATH}?{query}")
    })
}

/// Confirmation page: amount, tax estimate and the receipt once generated.
#[get("/dashboard/donations/confirmation")]
pub async fn confirmation(
    state: web::Data<HttpState>,
    member: MemberSession,
    query: web::Query<ConfirmationQuery>,
) -> ApiResult<HttpResponse> {
    let ConfirmationQuery { donation_id, attempt } = query.into_inner();
    let attempt = attempt.unwrap_or(1).max(1);
    let credentials = member.credentials();
    let donation = state.donations.get(&credentials, &donation_id).await?;

    let mut page = member_page(&member, "Merci pour votre don");
    let mut body = details(&[
        ("Montant", donation.amount.to_string()),
        ("Destination", donation.destination().to_owned()),
        ("Statut", donation.status.label().to_owned()),
    ]) + &tax_notice(&donation);
    match report(state.donations.receipt(&credentials, &donation.id).await, ReportPolicy::Inline)? {
        Reported::Ready(Some(receipt)) => body.push_str(&receipt_link(&receipt)),
        Reported::Ready(None) => match next_poll(&donation.id, attempt) {
            Some(next) => {
                page = page
                    .banner(Banner::info(
                        "Votre reçu fiscal est en cours de génération. Cette page se met à jour automatiquement.",
                    ))
                    .head(format!(
                        "<meta http-equiv=\"refresh\" content=\"{RECEIPT_POLL_SECONDS};url={}\">",
                        escape(&next)
                    ));
            }
            None => {
                page = page.banner(Banner::info(
                    "Votre reçu fiscal sera disponible prochainement dans l'historique de vos dons.",
                ));
            }
        },
        Reported::Inline(banner) => page = page.banner(banner),
        Reported::Empty => {}
    }
    body.push_str(&format!("<p>{}</p>", link("/dashboard/donations", "Retour à mes dons")));
    Ok(page.body(body).respond())
}

/// Annual receipt for the submitted year.
#[post("/dashboard/donations/receipts")]
pub async fn annual_receipt(
    state: web::Data<HttpState>,
    member: MemberSession,
    form: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form.into_inner());
    let year = data.required("year");
    let Some(year) = year.parse::<i32>().ok().filter(|year| *year > 0) else {
        data.reject("year", "Année invalide.");
        let page = receipt_page(&member, &data)
            .banner(Banner::invalid(data.errors().clone()))
            .status(StatusCode::UNPROCESSABLE_ENTITY);
        return Ok(page.respond());
    };

    let (banner, status) = match state.donations.annual_receipt(&member.credentials(), year).await {
        Ok(receipt) => {
            let body = details(&[
                ("Année", year.to_string()),
                ("Montant total", receipt.amount.to_string()),
            ]) + &receipt_link(&receipt);
            return Ok(member_page(&member, &format!("Reçu fiscal {year}"))
                .body(body)
                .respond());
        }
        Err(error) if error.code() == ErrorCode::NotFound => (
            Banner::error(format!("Aucun don enregistré pour l'année {year}.")),
            StatusCode::NOT_FOUND,
        ),
        Err(error) => match report::<()>(Err(error), ReportPolicy::Inline)? {
            Reported::Inline(banner) => (
                Banner::error(format!(
                    "Le reçu fiscal {year} n'a pas pu être obtenu : {}",
                    banner.message
                )),
                StatusCode::OK,
            ),
            Reported::Ready(()) | Reported::Empty => (
                Banner::error(format!("Le reçu fiscal {year} n'a pas pu être obtenu.")),
                StatusCode::OK,
            ),
        },
    };
    let page = receipt_page(&member, &data).banner(banner).status(status);
    Ok(page.respond())
}
