//! Session helpers and guard extractors.
//!
//! [`SessionContext`] wraps the cookie session so handlers only deal with
//! the access token and flash messages. [`MemberSession`] and
//! [`AdminSession`] are the precise guard: they validate the token with the
//! auth gateway before the handler runs and reject with a redirect when the
//! session is missing, expired or under-privileged.

use std::ops::Deref;

use actix_session::Session;
use actix_web::http::StatusCode;
use actix_web::http::header::LOCATION;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::html::Nav;
use super::report::{Banner, ReportPolicy, Reported, Tone, report};
use super::state::HttpState;
use crate::domain::{
    AccessToken, Credentials, Error, GuardDecision, RouteAccess, SessionPayload,
};

pub(crate) const ACCESS_TOKEN_KEY: &str = "access_token";
const FLASH_KEY: &str = "flash";

#[derive(Debug, Serialize, Deserialize)]
struct Flash {
    tone: Tone,
    message: String,
}

/// Newtype wrapper exposing the portal's session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Wrap an Actix session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the access token after sign-in, rotating the session.
    ///
    /// # Errors
    ///
    /// Returns an internal [`Error`] when the cookie session rejects the
    /// value.
    pub fn persist_token(&self, token: &AccessToken) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACCESS_TOKEN_KEY, token.expose())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Stored access token, if any; a tampered value counts as none.
    ///
    /// # Errors
    ///
    /// Returns an internal [`Error`] when the session cannot be read.
    pub fn token(&self) -> Result<Option<AccessToken>, Error> {
        let raw = self
            .0
            .get::<String>(ACCESS_TOKEN_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(AccessToken::new))
    }

    /// Whether a token is stored; used for public navigation only.
    #[must_use]
    pub fn has_token(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }

    /// Forget everything, including the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// Queue a message for the next rendered page.
    pub fn flash(&self, banner: &Banner) {
        let flash = Flash {
            tone: banner.tone,
            message: banner.message.clone(),
        };
        if let Err(error) = self.0.insert(FLASH_KEY, flash) {
            warn!(%error, "failed to store flash message");
        }
    }

    /// Report an action outcome as the next page's flash message.
    ///
    /// Success flashes `success`; other failures flash their inline banner.
    ///
    /// # Errors
    ///
    /// Authorization failures propagate so they still end in a redirect.
    pub fn flash_outcome<T>(&self, result: Result<T, Error>, success: &str) -> Result<Option<T>, Error> {
        match report(result, ReportPolicy::Inline)? {
            Reported::Ready(value) => {
                self.flash(&Banner::success(success));
                Ok(Some(value))
            }
            Reported::Inline(banner) => {
                self.flash(&banner);
                Ok(None)
            }
            Reported::Empty => Ok(None),
        }
    }

    /// Take the queued message, if any.
    #[must_use]
    pub fn take_flash(&self) -> Option<Banner> {
        let flash = self.0.remove_as::<Flash>(FLASH_KEY)?.ok()?;
        Some(match flash.tone {
            Tone::Success => Banner::success(flash.message),
            Tone::Error => Banner::error(flash.message),
            Tone::Info => Banner::info(flash.message),
        })
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

/// Why a guard extractor refused the request.
#[derive(Debug, thiserror::Error)]
pub enum GuardRejection {
    /// Send the browser elsewhere (login or dashboard).
    #[error("redirecting to {0}")]
    Redirect(String),
    /// The guard could not decide, typically because the auth recipe is down.
    #[error(transparent)]
    Failed(#[from] Error),
}

impl ResponseError for GuardRejection {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Redirect(_) => StatusCode::SEE_OTHER,
            Self::Failed(error) => error.status_code(),
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Redirect(location) => HttpResponse::SeeOther()
                .insert_header((LOCATION, location.as_str()))
                .finish(),
            Self::Failed(error) => error.error_response(),
        }
    }
}

/// Signed-in user of a member route.
#[derive(Clone)]
pub struct MemberSession {
    context: SessionContext,
    token: AccessToken,
    payload: SessionPayload,
}

impl MemberSession {
    /// Credentials for backend calls on the user's behalf.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::Bearer(self.token.clone())
    }

    /// Session payload from the auth recipe.
    #[must_use]
    pub const fn payload(&self) -> &SessionPayload {
        &self.payload
    }

    /// Underlying cookie session.
    #[must_use]
    pub const fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Member-area navigation.
    #[must_use]
    pub fn nav(&self) -> Nav {
        Nav::Member {
            name: self.payload.display_name().to_owned(),
            admin: self.payload.role.is_admin(),
        }
    }
}

/// Signed-in user holding an admin role.
#[derive(Clone)]
pub struct AdminSession(MemberSession);

impl Deref for AdminSession {
    type Target = MemberSession;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn requested_target(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map_or_else(|| req.path().to_owned(), |target| target.as_str().to_owned())
}

async fn resolve(
    access: RouteAccess,
    context: SessionContext,
    state: Option<web::Data<HttpState>>,
    requested: String,
) -> Result<MemberSession, GuardRejection> {
    let state = state.ok_or_else(|| Error::internal("HTTP state is not registered"))?;
    let signed_in = match context.token()? {
        Some(token) => state
            .auth
            .session(&token)
            .await?
            .map(|payload| (token, payload)),
        None => None,
    };
    let decision = GuardDecision::decide(access, signed_in.as_ref().map(|(_, p)| p), &requested);
    match (decision.location(), signed_in) {
        (None, Some((token, payload))) => Ok(MemberSession {
            context,
            token,
            payload,
        }),
        (Some(location), signed_in) => {
            if signed_in.is_none() {
                context.purge();
            }
            debug!(%requested, %location, "guard redirect");
            Err(GuardRejection::Redirect(location))
        }
        (None, None) => Err(Error::internal("guard allowed an anonymous session").into()),
    }
}

fn extract(
    access: RouteAccess,
    req: &HttpRequest,
    payload: &mut Payload,
) -> LocalBoxFuture<'static, Result<MemberSession, GuardRejection>> {
    let session = Session::from_request(req, payload);
    let state = req.app_data::<web::Data<HttpState>>().cloned();
    let requested = requested_target(req);
    Box::pin(async move {
        let context = session.await.map(SessionContext::new).map_err(Error::from)?;
        resolve(access, context, state, requested).await
    })
}

impl FromRequest for MemberSession {
    type Error = GuardRejection;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        extract(RouteAccess::Member, req, payload)
    }
}

impl FromRequest for AdminSession {
    type Error = GuardRejection;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = extract(RouteAccess::Admin, req, payload);
        Box::pin(async move { fut.await.map(AdminSession) })
    }
}
