//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{api_ports, build_http_state, http_state};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::routes;
use crate::inbound::http::state::HttpState;
use crate::middleware::session_gate::SESSION_COOKIE;
use crate::middleware::{SessionGate, Trace};

const SESSION_TTL_HOURS: i64 = 2;

/// Shared state and cookie settings for one application instance.
#[derive(Clone)]
pub struct AppDependencies {
    /// Readiness flags behind the health probes.
    pub health_state: web::Data<HealthState>,
    /// Port bundle and site settings.
    pub http_state: web::Data<HttpState>,
    /// Session cookie key.
    pub key: Key,
    /// `Secure` cookie attribute.
    pub cookie_secure: bool,
    /// `SameSite` cookie attribute.
    pub same_site: SameSite,
}

/// Assemble the portal application.
///
/// `Trace` wraps everything so every response, redirects from the session
/// gate included, carries a `trace-id` header.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::hours(SESSION_TTL_HOURS)),
        )
        .build();

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session)
        .wrap(SessionGate)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .configure(routes::configure)
}

/// Construct an Actix HTTP server over the backend adapters.
///
/// # Errors
/// Propagates [`std::io::Error`] when the backend client cannot be built or
/// binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config).map_err(std::io::Error::other)?;
    let server_health_state = health_state.clone();
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        ..
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "portal listening");
    health_state.mark_ready();
    Ok(server)
}
