//! Admin back-office.
//!
//! Handlers take an [`AdminSession`], so a non-admin role is redirected to
//! the member dashboard before any admin content is fetched. Create and edit
//! screens follow post/redirect/get: success answers `303` to the list with
//! a flash message, failure re-renders the submitted form.

pub mod articles;
pub mod donations;
pub mod events;
pub mod memberships;
pub mod overview;
pub mod projects;
pub mod trainings;
pub mod users;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;

use super::html::{FormData, Nav, Page, button_form, link};
use super::report::{Banner, ReportPolicy, Reported, report};
use super::session::{AdminSession, SessionContext};
use crate::domain::Error;

/// Back-office page with the queued flash message.
pub(crate) fn admin_page(admin: &AdminSession, title: &str) -> Page {
    Page::new(title)
        .nav(Nav::Admin)
        .banner_opt(admin.context().take_flash())
}

/// Route a form submission result.
///
/// `result` is `None` when local parsing already failed. Yields the saved
/// record once a success flash is queued, or the banner to show above the
/// re-rendered form; backend field errors are merged into `data`.
///
/// # Errors
///
/// Authorization failures propagate so they still end in a redirect.
pub(crate) fn submitted<T>(
    context: &SessionContext,
    data: &mut FormData,
    result: Option<Result<T, Error>>,
    success: &str,
) -> Result<Result<T, Banner>, Error> {
    let banner = match result {
        Some(result) if data.is_valid() => match report(result, ReportPolicy::Inline)? {
            Reported::Ready(saved) => {
                context.flash(&Banner::success(success));
                return Ok(Ok(saved));
            }
            Reported::Inline(banner) => banner,
            Reported::Empty => Banner::error("L'enregistrement a échoué."),
        },
        _ => Banner::invalid(data.errors().clone()),
    };
    data.merge_errors(&banner.fields);
    Ok(Err(banner))
}

/// Re-rendered form after a rejected submission.
pub(crate) fn rejected_form(page: Page, banner: Banner, form: String) -> HttpResponse {
    page.banner(banner)
        .status(StatusCode::UNPROCESSABLE_ENTITY)
        .body(form)
        .respond()
}

/// Mandatory drop-down value parsed with `parse`.
pub(crate) fn required_choice<T>(
    data: &mut FormData,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let parsed = parse(data.value(name));
    if parsed.is_none() {
        data.reject(name, "Valeur invalide.");
    }
    parsed
}

/// Edit link plus delete button of a CRUD row.
pub(crate) fn row_actions(base: &str, id: &str) -> String {
    format!(
        "{} {}",
        link(&format!("{base}/{id}/edit"), "Modifier"),
        button_form(
            &format!("{base}/{id}/delete"),
            "Supprimer",
            Some("Supprimer définitivement cet élément ?"),
        )
    )
}

#[cfg(test)]
mod tests {
    use actix_session::SessionExt;
    use actix_web::test as actix_test;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[actix_web::test]
    async fn local_errors_skip_the_backend_result() {
        let req = actix_test::TestRequest::default().to_http_request();
        let context = SessionContext::new(req.get_session());
        let mut data = FormData::default();
        data.required("title");

        let banner = submitted::<()>(&context, &mut data, None, "ok")
            .expect("not an authorization failure")
            .expect_err("rejected");
        assert_eq!(banner.field("title"), Some("Ce champ est obligatoire."));
    }

    #[rstest]
    #[actix_web::test]
    async fn backend_field_errors_reach_the_form() {
        let req = actix_test::TestRequest::default().to_http_request();
        let context = SessionContext::new(req.get_session());
        let mut data = FormData::from_pairs([("slug", "hiver")]);
        let error = Error::invalid_request("Validation failed")
            .with_field_errors([("slug".to_owned(), "Déjà utilisé.".to_owned())].into());

        let banner = submitted::<()>(&context, &mut data, Some(Err(error)), "ok")
            .expect("inline")
            .expect_err("rejected");
        assert_eq!(banner.message, "Validation failed");
        assert_eq!(data.errors().get("slug").map(String::as_str), Some("Déjà utilisé."));
    }

    #[rstest]
    #[actix_web::test]
    async fn saved_records_queue_a_flash() {
        let req = actix_test::TestRequest::default().to_http_request();
        let context = SessionContext::new(req.get_session());
        let mut data = FormData::default();

        let outcome = submitted(&context, &mut data, Some(Ok(7)), "Projet enregistré.").expect("saved");
        assert_eq!(outcome, Ok(7));
        assert_eq!(
            context.take_flash().map(|banner| banner.message),
            Some("Projet enregistré.".to_owned())
        );
    }
}
