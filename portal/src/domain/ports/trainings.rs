//! Driven port for trainings and member enrollments.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::models::{Training, TrainingDraft, TrainingEnrollment, TrainingFilters};
use crate::domain::{Credentials, Error, ListQuery};

/// Training operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TrainingsPort: Send + Sync {
    /// One page of trainings.
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<TrainingFilters>,
    ) -> Result<Paginated<Training>, Error>;

    /// Training by identifier.
    async fn get(&self, credentials: &Credentials, id: &str) -> Result<Training, Error>;

    /// Enroll the signed-in member.
    async fn enroll(&self, credentials: &Credentials, id: &str) -> Result<TrainingEnrollment, Error>;

    /// Enrollments of the signed-in member.
    async fn my_enrollments(&self, credentials: &Credentials) -> Result<Vec<TrainingEnrollment>, Error>;

    /// Create a training.
    async fn create(&self, credentials: &Credentials, draft: &TrainingDraft) -> Result<Training, Error>;

    /// Replace a training's editable fields.
    async fn update(
        &self,
        credentials: &Credentials,
        id: &str,
        draft: &TrainingDraft,
    ) -> Result<Training, Error>;

    /// Delete a training.
    async fn delete(&self, credentials: &Credentials, id: &str) -> Result<(), Error>;
}
