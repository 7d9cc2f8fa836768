//! Portal settings loaded via OrthoConfig.
//!
//! Values come from `PORTAL_*` environment variables, CLI flags or a config
//! file; anything unset falls back to a local development default.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use pagination::MAX_LIMIT;
use serde::Deserialize;
use url::Url;

use crate::inbound::http::state::SiteSettings;

const DEFAULT_API_URL: &str = "http://localhost:4000/";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:8080/";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Unusable portal setting.
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// A URL setting failed to parse.
    #[error("invalid URL for {name}='{value}': {source}")]
    InvalidUrl {
        /// Setting name.
        name: &'static str,
        /// Value found.
        value: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The bind address failed to parse.
    #[error("invalid bind address '{value}': {source}")]
    InvalidBindAddr {
        /// Value found.
        value: String,
        /// Parser failure.
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Runtime settings of the portal.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Association backend origin; `/api/v1` is appended.
    pub api_url: Option<String>,
    /// Public origin of the portal, used in the sitemap and payment return URL.
    pub public_url: Option<String>,
    /// Listener address.
    pub bind_addr: Option<String>,
    /// Payment provider publishable key; online payment is disabled without it.
    pub payment_publishable_key: Option<String>,
    /// Backend request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Rows per list page.
    pub page_size: Option<u32>,
}

fn parse_url(name: &'static str, value: Option<&str>, fallback: &str) -> Result<Url, SettingsError> {
    let value = value.unwrap_or(fallback);
    Url::parse(value).map_err(|source| SettingsError::InvalidUrl {
        name,
        value: value.to_owned(),
        source,
    })
}

impl PortalSettings {
    /// Backend origin.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value is not a URL.
    pub fn api_url(&self) -> Result<Url, SettingsError> {
        parse_url("api_url", self.api_url.as_deref(), DEFAULT_API_URL)
    }

    /// Public origin.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the value is not a URL.
    pub fn public_url(&self) -> Result<Url, SettingsError> {
        parse_url("public_url", self.public_url.as_deref(), DEFAULT_PUBLIC_URL)
    }

    /// Listener address.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value is not a
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value
            .parse()
            .map_err(|source| SettingsError::InvalidBindAddr {
                value: value.to_owned(),
                source,
            })
    }

    /// Backend request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS).max(1))
    }

    /// Rows per list page, clamped to the backend maximum.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_LIMIT)
    }

    /// Rendering settings handed to the HTTP adapter.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidUrl`] when the public origin is invalid.
    pub fn site(&self) -> Result<SiteSettings, SettingsError> {
        Ok(SiteSettings {
            public_url: self.public_url()?,
            page_size: self.page_size(),
            payment_publishable_key: self
                .payment_publishable_key
                .clone()
                .filter(|key| !key.trim().is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Environment parsing of portal settings.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "PORTAL_API_URL",
        "PORTAL_PUBLIC_URL",
        "PORTAL_BIND_ADDR",
        "PORTAL_PAYMENT_PUBLISHABLE_KEY",
        "PORTAL_REQUEST_TIMEOUT_SECS",
        "PORTAL_PAGE_SIZE",
    ];

    fn load(overrides: &[(&str, &str)]) -> PortalSettings {
        let _guard = lock_env(VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        }));
        PortalSettings::load_from_iter([OsString::from("portal")]).expect("config should load")
    }

    #[rstest]
    fn defaults_target_a_local_backend() {
        let settings = load(&[]);
        assert_eq!(
            settings.api_url().expect("default URL").as_str(),
            "http://localhost:4000/"
        );
        assert_eq!(settings.bind_addr().expect("default addr").port(), 8080);
        assert_eq!(settings.request_timeout(), Duration::from_secs(10));
        assert_eq!(settings.page_size(), 10);
        assert!(settings.site().expect("site").payment_publishable_key.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load(&[
            ("PORTAL_API_URL", "https://api.nouveausouffle.org"),
            ("PORTAL_PUBLIC_URL", "https://nouveausouffle.org"),
            ("PORTAL_PAYMENT_PUBLISHABLE_KEY", "pk_live_x"),
            ("PORTAL_REQUEST_TIMEOUT_SECS", "3"),
            ("PORTAL_PAGE_SIZE", "500"),
        ]);
        assert_eq!(
            settings.api_url().expect("URL").host_str(),
            Some("api.nouveausouffle.org")
        );
        assert_eq!(settings.request_timeout(), Duration::from_secs(3));
        assert_eq!(settings.page_size(), MAX_LIMIT);
        let site = settings.site().expect("site");
        assert_eq!(site.payment_publishable_key.as_deref(), Some("pk_live_x"));
        assert_eq!(site.absolute("/robots.txt"), "https://nouveausouffle.org/robots.txt");
    }

    #[rstest]
    #[case(PortalSettings { api_url: Some("not a url".to_owned()), ..PortalSettings::default() })]
    #[case(PortalSettings { public_url: Some("::".to_owned()), ..PortalSettings::default() })]
    fn invalid_urls_are_reported(#[case] settings: PortalSettings) {
        assert!(settings.api_url().is_err() || settings.public_url().is_err());
    }

    #[rstest]
    fn invalid_bind_addresses_name_the_value() {
        let settings = PortalSettings {
            bind_addr: Some("localhost".to_owned()),
            ..PortalSettings::default()
        };
        let err = settings.bind_addr().expect_err("hostname without port");
        assert!(err.to_string().contains("'localhost'"));
    }
}
