//! Driven port for donations and fiscal receipts.

use async_trait::async_trait;
use pagination::Paginated;

use crate::domain::models::{Donation, DonationFilters, DonationIntent, NewDonation, Receipt};
use crate::domain::{Credentials, Error, ListQuery};

/// Donation operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonationsPort: Send + Sync {
    /// Create a pending donation and its payment intent.
    async fn create(&self, credentials: &Credentials, donation: &NewDonation) -> Result<DonationIntent, Error>;

    /// Donations of the signed-in member.
    async fn list_mine(
        &self,
        credentials: &Credentials,
        query: &ListQuery<DonationFilters>,
    ) -> Result<Paginated<Donation>, Error>;

    /// Every donation (admin).
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<DonationFilters>,
    ) -> Result<Paginated<Donation>, Error>;

    /// Donation by identifier.
    async fn get(&self, credentials: &Credentials, id: &str) -> Result<Donation, Error>;

    /// Receipt of a donation; `None` while the backend has not issued it.
    async fn receipt(&self, credentials: &Credentials, id: &str) -> Result<Option<Receipt>, Error>;

    /// Aggregate receipt for a fiscal year.
    async fn annual_receipt(&self, credentials: &Credentials, year: i32) -> Result<Receipt, Error>;
}
