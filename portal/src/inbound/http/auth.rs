//! Sign-in, registration, sign-out and password-reset screens.
//!
//! ```text
//! GET  /auth/login            Sign-in form; keeps `?redirect=`
//! POST /auth/login            Sign in and return to the sanitized target
//! GET  /auth/register         Registration form
//! POST /auth/register         Create the account and sign in
//! GET  /auth/logout           Sign-out confirmation
//! POST /auth/logout           Sign out and clear the cookie session
//! GET  /auth/forgot-password  Reset request form
//! POST /auth/forgot-password  Ask the auth recipe to send a reset link
//! ```
//!
//! The token returned by the auth recipe is stored in the encrypted cookie
//! session; the session is rotated on every sign-in.

use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use tracing::{info, warn};

use super::ApiResult;
use super::html::{Form, FormData, Nav, Page, see_other};
use super::report::{Banner, ReportPolicy, Reported, report};
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::{
    DASHBOARD_PATH, ErrorCode, LoginCredentials, REDIRECT_PARAM, Registration,
    sanitize_return_path,
};

const INVALID_CREDENTIALS: &str = "Identifiants invalides.";
const RESET_SENT: &str =
    "Si un compte existe pour cette adresse, un lien de réinitialisation vient d'être envoyé.";

/// `?redirect=` of the sign-in page.
#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    /// Path to return to after sign-in.
    #[serde(default)]
    pub redirect: Option<String>,
}

fn auth_page(title: &str, session: &SessionContext) -> Page {
    Page::new(title)
        .nav(Nav::Public {
            signed_in: session.has_token(),
        })
        .banner_opt(session.take_flash())
}

fn login_form(data: &FormData) -> String {
    let mut form = Form::post("/auth/login", data)
        .email("email", "Adresse e-mail", true)
        .password("password", "Mot de passe")
        .submit("Se connecter");
    let redirect = data.value(REDIRECT_PARAM);
    if !redirect.is_empty() {
        form = form.hidden(REDIRECT_PARAM, redirect);
    }
    form.render()
        + "<p><a href=\"/auth/forgot-password\">Mot de passe oublié ?</a> · \
<a href=\"/auth/register\">Créer un compte</a></p>"
}

fn rejected(page: Page, body: String) -> HttpResponse {
    page.body(body)
        .status(StatusCode::UNPROCESSABLE_ENTITY)
        .respond()
}

/// Sign-in form.
#[get("/auth/login")]
pub async fn login_page(session: SessionContext, query: web::Query<LoginQuery>) -> HttpResponse {
    let mut data = FormData::default();
    if let Some(target) = query.redirect.as_deref().and_then(sanitize_return_path) {
        data.set(REDIRECT_PARAM, target);
    }
    auth_page("Connexion", &session).body(login_form(&data)).respond()
}

/// Sign in and redirect.
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form.into_inner());
    let credentials = match LoginCredentials::try_from_parts(data.value("email"), data.value("password")) {
        Ok(credentials) => credentials,
        Err(error) => {
            data.reject(error.field(), &error.to_string());
            let page = auth_page("Connexion", &session).banner(Banner::invalid(data.errors().clone()));
            return Ok(rejected(page, login_form(&data)));
        }
    };

    let banner = match state.auth.sign_in(&credentials).await {
        Ok(signed_in) => {
            session.persist_token(&signed_in.token)?;
            info!(user_id = %signed_in.session.user_id, "signed in");
            let target = sanitize_return_path(data.value(REDIRECT_PARAM))
                .unwrap_or(DASHBOARD_PATH)
                .to_owned();
            return Ok(see_other(target));
        }
        Err(error) if error.code() == ErrorCode::Unauthorized => Banner::error(INVALID_CREDENTIALS),
        Err(error) => match report::<()>(Err(error), ReportPolicy::Inline)? {
            Reported::Inline(banner) => banner,
            Reported::Ready(()) | Reported::Empty => Banner::error(INVALID_CREDENTIALS),
        },
    };
    let page = auth_page("Connexion", &session).banner(banner);
    Ok(rejected(page, login_form(&data)))
}

fn register_form(data: &FormData) -> String {
    Form::post("/auth/register", data)
        .text("firstName", "Prénom", true)
        .text("lastName", "Nom", true)
        .email("email", "Adresse e-mail", true)
        .password("password", "Mot de passe")
        .submit("Créer mon compte")
        .render()
}

/// Registration form.
#[get("/auth/register")]
pub async fn register_page(session: SessionContext) -> HttpResponse {
    auth_page("Créer un compte", &session)
        .body(register_form(&FormData::default()))
        .respond()
}

/// Create an account, sign in and continue to the membership page.
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form.into_inner());
    let registration = match Registration::try_from_parts(
        data.value("firstName"),
        data.value("lastName"),
        data.value("email"),
        data.value("password"),
    ) {
        Ok(registration) => registration,
        Err(error) => {
            data.reject(error.field(), &error.to_string());
            let page = auth_page("Créer un compte", &session)
                .banner(Banner::invalid(data.errors().clone()));
            return Ok(rejected(page, register_form(&data)));
        }
    };

    match report(state.auth.sign_up(&registration).await, ReportPolicy::Inline)? {
        Reported::Ready(signed_in) => {
            session.persist_token(&signed_in.token)?;
            session.flash(&Banner::success(
                "Bienvenue ! Votre compte est créé, vous pouvez maintenant adhérer.",
            ));
            info!(user_id = %signed_in.session.user_id, "account created");
            Ok(see_other("/dashboard/membership"))
        }
        Reported::Inline(banner) => {
            data.merge_errors(&banner.fields);
            let page = auth_page("Créer un compte", &session).banner(banner);
            Ok(rejected(page, register_form(&data)))
        }
        Reported::Empty => Ok(see_other("/auth/register")),
    }
}

/// Sign-out confirmation.
#[get("/auth/logout")]
pub async fn logout_page(session: SessionContext) -> HttpResponse {
    let body = if session.has_token() {
        "<p>Voulez-vous vous déconnecter ?</p><form method=\"post\" action=\"/auth/logout\">\
<button type=\"submit\">Se déconnecter</button></form>"
    } else {
        "<p>Vous n'êtes pas connecté.</p><p><a href=\"/\">Retour à l'accueil</a></p>"
    };
    auth_page("Déconnexion", &session).body(body).respond()
}

/// Revoke the backend session and clear the cookie.
#[post("/auth/logout")]
pub async fn logout(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    if let Some(token) = session.token()? {
        if let Err(error) = state.auth.sign_out(&token).await {
            warn!(code = error.code().as_str(), "sign-out failed; clearing the local session anyway");
        }
    }
    session.purge();
    Ok(see_other("/"))
}

fn reset_form(data: &FormData) -> String {
    Form::post("/auth/forgot-password", data)
        .email("email", "Adresse e-mail", true)
        .submit("Envoyer le lien")
        .render()
}

/// Password-reset request form.
#[get("/auth/forgot-password")]
pub async fn forgot_password_page(session: SessionContext) -> HttpResponse {
    auth_page("Mot de passe oublié", &session)
        .body(reset_form(&FormData::default()))
        .respond()
}

/// Ask for a reset link; the answer never reveals whether the account exists.
#[post("/auth/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let mut data = FormData::from(form.into_inner());
    let Some(email) = data.optional("email") else {
        data.reject("email", "L'adresse e-mail est obligatoire.");
        let page = auth_page("Mot de passe oublié", &session)
            .banner(Banner::invalid(data.errors().clone()));
        return Ok(rejected(page, reset_form(&data)));
    };
    let outcome = state.auth.request_password_reset(&email).await;
    let banner = match outcome {
        Ok(()) => Banner::success(RESET_SENT),
        Err(error) if error.code() == ErrorCode::NotFound => Banner::success(RESET_SENT),
        Err(error) => match report::<()>(Err(error), ReportPolicy::Inline)? {
            Reported::Inline(banner) => banner,
            Reported::Ready(()) | Reported::Empty => Banner::success(RESET_SENT),
        },
    };
    let page = auth_page("Mot de passe oublié", &session).banner(banner);
    Ok(page.body(reset_form(&FormData::default())).respond())
}
