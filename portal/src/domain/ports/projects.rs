//! Driven port for fundraising projects.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::models::{Project, ProjectDraft, ProjectFilters};
use crate::domain::{Credentials, Error, ListQuery};

/// Project operations; writes require an admin session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectsPort: Send + Sync {
    /// One page of projects.
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<ProjectFilters>,
    ) -> Result<Paginated<Project>, Error>;

    /// Project by identifier.
    async fn get(&self, credentials: &Credentials, id: &str) -> Result<Project, Error>;

    /// Create a project.
    async fn create(&self, credentials: &Credentials, draft: &ProjectDraft) -> Result<Project, Error>;

    /// Replace a project's editable fields.
    async fn update(
        &self,
        credentials: &Credentials,
        id: &str,
        draft: &ProjectDraft,
    ) -> Result<Project, Error>;

    /// Delete a project.
    async fn delete(&self, credentials: &Credentials, id: &str) -> Result<(), Error>;
}
