//! Events and trainings adapters.

use async_trait::async_trait;
use pagination::Paginated;
use reqwest::Method;

use super::client::{ApiClient, NO_BODY};
use crate::domain::models::{
    Event, EventDraft, EventFilters, EventRegistration, Training, TrainingDraft,
    TrainingEnrollment, TrainingFilters,
};
use crate::domain::ports::{EventsPort, TrainingsPort};
use crate::domain::{Credentials, Error, ListQuery};

/// [`EventsPort`] backed by `/events`.
#[derive(Debug, Clone)]
pub struct EventsApi {
    client: ApiClient,
}

impl EventsApi {
    /// Wrap a shared backend client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EventsPort for EventsApi {
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<EventFilters>,
    ) -> Result<Paginated<Event>, Error> {
        Ok(self
            .client
            .get_page(&["events"], credentials, &query.query_pairs())
            .await?)
    }

    async fn get(&self, credentials: &Credentials, id: &str) -> Result<Event, Error> {
        Ok(self.client.get_data(&["events", id], credentials, &[]).await?)
    }

    async fn register(&self, credentials: &Credentials, id: &str) -> Result<EventRegistration, Error> {
        Ok(self
            .client
            .send_data(Method::POST, &["events", id, "registration"], credentials, NO_BODY)
            .await?)
    }

    async fn unregister(&self, credentials: &Credentials, id: &str) -> Result<(), Error> {
        Ok(self
            .client
            .send_empty(Method::DELETE, &["events", id, "registration"], credentials, NO_BODY)
            .await?)
    }

    async fn my_registrations(&self, credentials: &Credentials) -> Result<Vec<EventRegistration>, Error> {
        Ok(self
            .client
            .get_data(&["events", "registrations", "me"], credentials, &[])
            .await?)
    }

    async fn create(&self, credentials: &Credentials, draft: &EventDraft) -> Result<Event, Error> {
        Ok(self
            .client
            .send_data(Method::POST, &["events"], credentials, Some(draft))
            .await?)
    }

    async fn update(&self, credentials: &Credentials, id: &str, draft: &EventDraft) -> Result<Event, Error> {
        Ok(self
            .client
            .send_data(Method::PATCH, &["events", id], credentials, Some(draft))
            .await?)
    }

    async fn delete(&self, credentials: &Credentials, id: &str) -> Result<(), Error> {
        Ok(self
            .client
            .send_empty(Method::DELETE, &["events", id], credentials, NO_BODY)
            .await?)
    }
}

/// [`TrainingsPort`] backed by `/trainings`.
#[derive(Debug, Clone)]
pub struct TrainingsApi {
    client: ApiClient,
}

impl TrainingsApi {
    /// Wrap a shared backend client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TrainingsPort for TrainingsApi {
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<TrainingFilters>,
    ) -> Result<Paginated<Training>, Error> {
        Ok(self
            .client
            .get_page(&["trainings"], credentials, &query.query_pairs())
            .await?)
    }

    async fn get(&self, credentials: &Credentials, id: &str) -> Result<Training, Error> {
        Ok(self.client.get_data(&["trainings", id], credentials, &[]).await?)
    }

    async fn enroll(&self, credentials: &Credentials, id: &str) -> Result<TrainingEnrollment, Error> {
        Ok(self
            .client
            .send_data(Method::POST, &["trainings", id, "enrollment"], credentials, NO_BODY)
            .await?)
    }

    async fn my_enrollments(&self, credentials: &Credentials) -> Result<Vec<TrainingEnrollment>, Error> {
        Ok(self
            .client
            .get_data(&["trainings", "enrollments", "me"], credentials, &[])
            .await?)
    }

    async fn create(&self, credentials: &Credentials, draft: &TrainingDraft) -> Result<Training, Error> {
        Ok(self
            .client
            .send_data(Method::POST, &["trainings"], credentials, Some(draft))
            .await?)
    }

    async fn update(
        &self,
        credentials: &Credentials,
        id: &str,
        draft: &TrainingDraft,
    ) -> Result<Training, Error> {
        Ok(self
            .client
            .send_data(Method::PATCH, &["trainings", id], credentials, Some(draft))
            .await?)
    }

    async fn delete(&self, credentials: &Credentials, id: &str) -> Result<(), Error> {
        Ok(self
            .client
            .send_empty(Method::DELETE, &["trainings", id], credentials, NO_BODY)
            .await?)
    }
}
