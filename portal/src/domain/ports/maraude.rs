//! Driven port for outreach sessions and their reference data.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::models::{
    Encounter, EncounterDraft, MaraudeSession, MaraudeZone, NamedDraft, NeedCategory,
    SessionDraft, SessionFilters,
};
use crate::domain::{Credentials, Error, ListQuery};

/// Outreach operations (admin).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MaraudePort: Send + Sync {
    /// One page of sessions.
    async fn list_sessions(
        &self,
        credentials: &Credentials,
        query: &ListQuery<SessionFilters>,
    ) -> Result<Paginated<MaraudeSession>, Error>;

    /// Session with its encounters.
    async fn get_session(&self, credentials: &Credentials, id: &str) -> Result<MaraudeSession, Error>;

    /// Schedule a session.
    async fn create_session(&self, credentials: &Credentials, draft: &SessionDraft) -> Result<MaraudeSession, Error>;

    /// Log an encounter in a session.
    async fn add_encounter(
        &self,
        credentials: &Credentials,
        session_id: &str,
        draft: &EncounterDraft,
    ) -> Result<Encounter, Error>;

    /// Every zone.
    async fn zones(&self, credentials: &Credentials) -> Result<Vec<MaraudeZone>, Error>;

    /// Create a zone.
    async fn create_zone(&self, credentials: &Credentials, draft: &NamedDraft) -> Result<MaraudeZone, Error>;

    /// Delete a zone.
    async fn delete_zone(&self, credentials: &Credentials, id: &str) -> Result<(), Error>;

    /// Every need category.
    async fn categories(&self, credentials: &Credentials) -> Result<Vec<NeedCategory>, Error>;

    /// Create a need category.
    async fn create_category(&self, credentials: &Credentials, draft: &NamedDraft) -> Result<NeedCategory, Error>;

    /// Delete a need category.
    async fn delete_category(&self, credentials: &Credentials, id: &str) -> Result<(), Error>;
}
