//! Portal entry-point: loads settings, wires the backend adapters and serves
//! the rendered pages.

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use portal::inbound::http::health::HealthState;
use portal::inbound::http::session_config::fingerprint::key_fingerprint;
use portal::inbound::http::session_config::{BuildMode, session_settings_from_env};
use portal::server::{ServerConfig, create_server};
use portal::settings::PortalSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = PortalSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load portal settings: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(
        fingerprint = %key_fingerprint(&session.key),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );
    if settings.payment_publishable_key.is_none() {
        warn!("no payment publishable key configured; online donations are disabled");
    }

    let config = ServerConfig::new(
        session,
        settings.bind_addr()?,
        settings.api_url()?,
        settings.request_timeout(),
        settings.site()?,
    );
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start the portal")?;
    server.await.wrap_err("portal server stopped with an error")
}
