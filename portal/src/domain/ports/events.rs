//! Driven port for events and member registrations.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::models::{Event, EventDraft, EventFilters, EventRegistration};
use crate::domain::{Credentials, Error, ListQuery};

/// Event operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventsPort: Send + Sync {
    /// One page of events.
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<EventFilters>,
    ) -> Result<Paginated<Event>, Error>;

    /// Event by identifier.
    async fn get(&self, credentials: &Credentials, id: &str) -> Result<Event, Error>;

    /// Register the signed-in member.
    async fn register(&self, credentials: &Credentials, id: &str) -> Result<EventRegistration, Error>;

    /// Cancel the signed-in member's registration.
    async fn unregister(&self, credentials: &Credentials, id: &str) -> Result<(), Error>;

    /// Registrations of the signed-in member.
    async fn my_registrations(&self, credentials: &Credentials) -> Result<Vec<EventRegistration>, Error>;

    /// Create an event.
    async fn create(&self, credentials: &Credentials, draft: &EventDraft) -> Result<Event, Error>;

    /// Replace an event's editable fields.
    async fn update(&self, credentials: &Credentials, id: &str, draft: &EventDraft) -> Result<Event, Error>;

    /// Delete an event.
    async fn delete(&self, credentials: &Credentials, id: &str) -> Result<(), Error>;
}
