//! Driven port for outreach case records.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::models::{Beneficiary, BeneficiaryDraft, BeneficiaryFilters};
use crate::domain::{Credentials, Error, ListQuery};

/// Beneficiary operations (admin).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BeneficiariesPort: Send + Sync {
    /// One page of case records.
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<BeneficiaryFilters>,
    ) -> Result<Paginated<Beneficiary>, Error>;

    /// Case record by identifier.
    async fn get(&self, credentials: &Credentials, id: &str) -> Result<Beneficiary, Error>;

    /// Open a case record.
    async fn create(&self, credentials: &Credentials, draft: &BeneficiaryDraft) -> Result<Beneficiary, Error>;

    /// Update a case record.
    async fn update(
        &self,
        credentials: &Credentials,
        id: &str,
        draft: &BeneficiaryDraft,
    ) -> Result<Beneficiary, Error>;
}
