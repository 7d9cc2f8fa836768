//! HTTP adapter mapping for domain errors.
//!
//! Authorization failures become redirects: to the login page when the
//! session is missing or expired, to the member dashboard when the role is
//! insufficient. Every other failure renders an HTML error page that prints
//! the trace identifier.

use actix_web::http::StatusCode;
use actix_web::http::header::{HeaderName, HeaderValue, LOCATION};
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

use super::html::{Nav, Page, escape};
use super::report::user_message;
use crate::domain::{DASHBOARD_PATH, Error, ErrorCode, LOGIN_PATH, TRACE_ID_HEADER, TraceId};

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized | ErrorCode::Forbidden => StatusCode::SEE_OTHER,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redirect_for(code: ErrorCode) -> Option<&'static str> {
    match code {
        ErrorCode::Unauthorized => Some(LOGIN_PATH),
        ErrorCode::Forbidden => Some(DASHBOARD_PATH),
        _ => None,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

fn title_for(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::NotFound => "Page introuvable",
        ErrorCode::InvalidRequest => "Requête invalide",
        ErrorCode::Conflict => "Action impossible",
        ErrorCode::ServiceUnavailable => "Service indisponible",
        _ => "Erreur",
    }
}

/// Render the error page for `error`; internal details are redacted.
#[must_use]
pub fn error_page(error: &Error) -> Page {
    let visible = redact_if_internal(error);
    let trace_id = visible
        .trace_id()
        .map(str::to_owned)
        .or_else(|| TraceId::current().map(|id| id.to_string()));
    let mut body = format!(
        "<section class=\"error\"><p>{}</p>",
        escape(&user_message(&visible))
    );
    if let Some(id) = &trace_id {
        body.push_str(&format!(
            "<p class=\"trace-id\">Référence de l'incident : <code>{}</code></p>",
            escape(id)
        ));
    }
    body.push_str("<p><a href=\"/\">Retour à l'accueil</a></p></section>");
    Page::new(title_for(visible.code()))
        .nav(Nav::Public { signed_in: false })
        .status(status_for(visible.code()))
        .body(body)
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        if let Some(location) = redirect_for(self.code()) {
            return HttpResponse::SeeOther()
                .insert_header((LOCATION, location))
                .finish();
        }
        let mut response = error_page(self).respond();
        if let Some(value) = self.trace_id().and_then(|id| HeaderValue::from_str(id).ok()) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        response
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Self::internal("Internal server error")
    }
}
