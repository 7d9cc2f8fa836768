//! Event registrations and training enrollments.
//!
//! ```text
//! GET  /dashboard/events                   Registrations
//! POST /dashboard/events/{id}/register     Register to an event
//! POST /dashboard/events/{id}/unregister   Cancel a registration
//! GET  /dashboard/trainings                Enrollments
//! POST /dashboard/trainings/{id}/enroll    Enroll in a training
//! ```

use actix_web::{HttpResponse, get, post, web};

use super::member_page;
use crate::domain::models::{EventRegistration, TrainingEnrollment, format_date, format_datetime};
use crate::inbound::http::ApiResult;
use crate::inbound::http::html::{Table, button_form, link, see_other};
use crate::inbound::http::report::{ReportPolicy, report};
use crate::inbound::http::session::MemberSession;
use crate::inbound::http::state::HttpState;

/// Registrations of the member.
#[get("/dashboard/events")]
pub async fn registrations(state: web::Data<HttpState>, member: MemberSession) -> ApiResult<HttpResponse> {
    let rows = report(
        state.events.my_registrations(&member.credentials()).await,
        ReportPolicy::Silent,
    )?
    .ready()
    .unwrap_or_default();
    let table = Table::new("Vous n'êtes inscrit à aucun événement.")
        .html_column("Événement", |row: &EventRegistration| {
            link(&format!("/events/{}", row.event.id), &row.event.title)
        })
        .column("Date", |row| format_datetime(&row.event.starts_at))
        .column("Lieu", |row| row.event.location.clone().unwrap_or_default())
        .column("Inscrit le", |row| format_date(&row.created_at))
        .html_column("", |row| {
            button_form(
                &format!("/dashboard/events/{}/unregister", row.event.id),
                "Se désinscrire",
                Some("Annuler votre inscription ?"),
            )
        });
    let body = format!(
        "{}<p>{}</p>",
        table.render(&rows),
        link("/events", "Voir les événements à venir")
    );
    Ok(member_page(&member, "Mes événements").body(body).respond())
}

/// Register to an event.
#[post("/dashboard/events/{id}/register")]
pub async fn register(
    state: web::Data<HttpState>,
    member: MemberSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let outcome = state.events.register(&member.credentials(), &id).await;
    let registered = member
        .context()
        .flash_outcome(outcome, "Votre inscription est confirmée.")?;
    Ok(match registered {
        Some(_) => see_other("/dashboard/events"),
        None => see_other(format!("/events/{id}")),
    })
}

/// Cancel a registration.
#[post("/dashboard/events/{id}/unregister")]
pub async fn unregister(
    state: web::Data<HttpState>,
    member: MemberSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let outcome = state.events.unregister(&member.credentials(), &id).await;
    member
        .context()
        .flash_outcome(outcome, "Votre inscription a été annulée.")?;
    Ok(see_other("/dashboard/events"))
}

/// Enrollments of the member.
#[get("/dashboard/trainings")]
pub async fn enrollments(state: web::Data<HttpState>, member: MemberSession) -> ApiResult<HttpResponse> {
    let rows = report(
        state.trainings.my_enrollments(&member.credentials()).await,
        ReportPolicy::Silent,
    )?
    .ready()
    .unwrap_or_default();
    let table = Table::new("Vous n'êtes inscrit à aucune formation.")
        .column("Formation", |row: &TrainingEnrollment| row.training.title.clone())
        .column("Date", |row| format_datetime(&row.training.starts_at))
        .column("Lieu", |row| row.training.location.clone().unwrap_or_default())
        .column("Inscrit le", |row| format_date(&row.created_at));
    let body = format!(
        "{}<p>{}</p>",
        table.render(&rows),
        link("/trainings", "Voir les formations")
    );
    Ok(member_page(&member, "Mes formations").body(body).respond())
}

/// Enroll in a training.
#[post("/dashboard/trainings/{id}/enroll")]
pub async fn enroll(
    state: web::Data<HttpState>,
    member: MemberSession,
    id: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let outcome = state.trainings.enroll(&member.credentials(), &id).await;
    let enrolled = member
        .context()
        .flash_outcome(outcome, "Votre inscription à la formation est confirmée.")?;
    Ok(match enrolled {
        Some(_) => see_other("/dashboard/trainings"),
        None => see_other("/trainings"),
    })
}
