//! Outreach adapters: sessions, case records and reference data.

use async_trait::async_trait;
use pagination::Paginated;
use reqwest::Method;

use super::client::{ApiClient, NO_BODY};
use crate::domain::models::{
    Beneficiary, BeneficiaryDraft, BeneficiaryFilters, Encounter, EncounterDraft, MaraudeSession,
    MaraudeZone, NamedDraft, NeedCategory, SessionDraft, SessionFilters,
};
use crate::domain::ports::{BeneficiariesPort, MaraudePort};
use crate::domain::{Credentials, Error, ListQuery};

const MARAUDE: &str = "maraude";

/// [`BeneficiariesPort`] backed by `/maraude/beneficiaries`.
#[derive(Debug, Clone)]
pub struct BeneficiariesApi {
    client: ApiClient,
}

impl BeneficiariesApi {
    /// Wrap a shared backend client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BeneficiariesPort for BeneficiariesApi {
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<BeneficiaryFilters>,
    ) -> Result<Paginated<Beneficiary>, Error> {
        Ok(self
            .client
            .get_page(&[MARAUDE, "beneficiaries"], credentials, &query.query_pairs())
            .await?)
    }

    async fn get(&self, credentials: &Credentials, id: &str) -> Result<Beneficiary, Error> {
        Ok(self
            .client
            .get_data(&[MARAUDE, "beneficiaries", id], credentials, &[])
            .await?)
    }

    async fn create(&self, credentials: &Credentials, draft: &BeneficiaryDraft) -> Result<Beneficiary, Error> {
        Ok(self
            .client
            .send_data(Method::POST, &[MARAUDE, "beneficiaries"], credentials, Some(draft))
            .await?)
    }

    async fn update(
        &self,
        credentials: &Credentials,
        id: &str,
        draft: &BeneficiaryDraft,
    ) -> Result<Beneficiary, Error> {
        Ok(self
            .client
            .send_data(Method::PATCH, &[MARAUDE, "beneficiaries", id], credentials, Some(draft))
            .await?)
    }
}

/// [`MaraudePort`] backed by `/maraude`.
#[derive(Debug, Clone)]
pub struct MaraudeApi {
    client: ApiClient,
}

impl MaraudeApi {
    /// Wrap a shared backend client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MaraudePort for MaraudeApi {
    async fn list_sessions(
        &self,
        credentials: &Credentials,
        query: &ListQuery<SessionFilters>,
    ) -> Result<Paginated<MaraudeSession>, Error> {
        Ok(self
            .client
            .get_page(&[MARAUDE, "sessions"], credentials, &query.query_pairs())
            .await?)
    }

    async fn get_session(&self, credentials: &Credentials, id: &str) -> Result<MaraudeSession, Error> {
        Ok(self
            .client
            .get_data(&[MARAUDE, "sessions", id], credentials, &[])
            .await?)
    }

    async fn create_session(&self, credentials: &Credentials, draft: &SessionDraft) -> Result<MaraudeSession, Error> {
        Ok(self
            .client
            .send_data(Method::POST, &[MARAUDE, "sessions"], credentials, Some(draft))
            .await?)
    }

    async fn add_encounter(
        &self,
        credentials: &Credentials,
        session_id: &str,
        draft: &EncounterDraft,
    ) -> Result<Encounter, Error> {
        Ok(self
            .client
            .send_data(
                Method::POST,
                &[MARAUDE, "sessions", session_id, "encounters"],
                credentials,
                Some(draft),
            )
            .await?)
    }

    async fn zones(&self, credentials: &Credentials) -> Result<Vec<MaraudeZone>, Error> {
        Ok(self
            .client
            .get_data(&[MARAUDE, "zones"], credentials, &[])
            .await?)
    }

    async fn create_zone(&self, credentials: &Credentials, draft: &NamedDraft) -> Result<MaraudeZone, Error> {
        Ok(self
            .client
            .send_data(Method::POST, &[MARAUDE, "zones"], credentials, Some(draft))
            .await?)
    }

    async fn delete_zone(&self, credentials: &Credentials, id: &str) -> Result<(), Error> {
        Ok(self
            .client
            .send_empty(Method::DELETE, &[MARAUDE, "zones", id], credentials, NO_BODY)
            .await?)
    }

    async fn categories(&self, credentials: &Credentials) -> Result<Vec<NeedCategory>, Error> {
        Ok(self
            .client
            .get_data(&[MARAUDE, "categories"], credentials, &[])
            .await?)
    }

    async fn create_category(&self, credentials: &Credentials, draft: &NamedDraft) -> Result<NeedCategory, Error> {
        Ok(self
            .client
            .send_data(Method::POST, &[MARAUDE, "categories"], credentials, Some(draft))
            .await?)
    }

    async fn delete_category(&self, credentials: &Credentials, id: &str) -> Result<(), Error> {
        Ok(self
            .client
            .send_empty(Method::DELETE, &[MARAUDE, "categories", id], credentials, NO_BODY)
            .await?)
    }
}
