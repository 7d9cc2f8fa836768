//! Builders wiring the reqwest adapters into handler state.

use std::sync::Arc;

use actix_web::web;

use super::ServerConfig;
use crate::inbound::http::state::{HttpState, HttpStatePorts, SiteSettings};
use crate::outbound::api::{
    ApiClient, ApiError, ArticlesApi, AuthApi, BeneficiariesApi, DonationsApi, EventsApi,
    MaraudeApi, MembershipsApi, ProjectsApi, TrainingsApi, UsersApi,
};

/// Every port backed by one shared backend client.
#[must_use]
pub fn api_ports(client: &ApiClient) -> HttpStatePorts {
    HttpStatePorts {
        auth: Arc::new(AuthApi::new(client.clone())),
        articles: Arc::new(ArticlesApi::new(client.clone())),
        projects: Arc::new(ProjectsApi::new(client.clone())),
        events: Arc::new(EventsApi::new(client.clone())),
        trainings: Arc::new(TrainingsApi::new(client.clone())),
        donations: Arc::new(DonationsApi::new(client.clone())),
        memberships: Arc::new(MembershipsApi::new(client.clone())),
        users: Arc::new(UsersApi::new(client.clone())),
        beneficiaries: Arc::new(BeneficiariesApi::new(client.clone())),
        maraude: Arc::new(MaraudeApi::new(client.clone())),
    }
}

/// Handler state for a backend at `config.api_url`.
///
/// # Errors
///
/// Returns [`ApiError`] when the backend client cannot be built.
pub fn build_http_state(config: &ServerConfig) -> Result<web::Data<HttpState>, ApiError> {
    let client = ApiClient::new(&config.api_url, config.request_timeout)?;
    Ok(http_state(&client, config.site.clone()))
}

/// Handler state over an existing client.
#[must_use]
pub fn http_state(client: &ApiClient, site: SiteSettings) -> web::Data<HttpState> {
    web::Data::new(HttpState::new(api_ports(client), site))
}
