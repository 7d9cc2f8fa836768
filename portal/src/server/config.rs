//! HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use url::Url;

use crate::inbound::http::session_config::SessionSettings;
use crate::inbound::http::state::SiteSettings;

/// Everything needed to bind and wire the portal.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) api_url: Url,
    pub(crate) request_timeout: Duration,
    pub(crate) site: SiteSettings,
}

impl ServerConfig {
    /// Combine cookie settings with the listener address and backend target.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        api_url: Url,
        request_timeout: Duration,
        site: SiteSettings,
    ) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            api_url,
            request_timeout,
            site,
        }
    }

    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
