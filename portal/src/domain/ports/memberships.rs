//! Driven port for memberships.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::models::{
    Membership, MembershipFilters, MembershipStatus, MembershipType, NewMembership,
};
use crate::domain::{Credentials, Error, ListQuery};

/// Membership operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipsPort: Send + Sync {
    /// Offers available for subscription.
    async fn types(&self, credentials: &Credentials) -> Result<Vec<MembershipType>, Error>;

    /// Subscribe the signed-in member.
    async fn create(&self, credentials: &Credentials, request: &NewMembership) -> Result<Membership, Error>;

    /// Current membership of the signed-in member, if any.
    async fn mine(&self, credentials: &Credentials) -> Result<Option<Membership>, Error>;

    /// Request a renewal.
    async fn renew(&self, credentials: &Credentials, id: &str) -> Result<Membership, Error>;

    /// Every membership (admin).
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<MembershipFilters>,
    ) -> Result<Paginated<Membership>, Error>;

    /// Request a status transition (admin).
    async fn change_status(
        &self,
        credentials: &Credentials,
        id: &str,
        status: MembershipStatus,
    ) -> Result<Membership, Error>;
}
