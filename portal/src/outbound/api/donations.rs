//! Donations and fiscal receipts adapter.

use async_trait::async_trait;
use pagination::Paginated;
use reqwest::Method;

use super::client::ApiClient;
use crate::domain::models::{
    AnnualReceiptRequest, Donation, DonationFilters, DonationIntent, NewDonation, Receipt,
};
use crate::domain::ports::DonationsPort;
use crate::domain::{Credentials, Error, ListQuery};

/// [`DonationsPort`] backed by `/donations`.
#[derive(Debug, Clone)]
pub struct DonationsApi {
    client: ApiClient,
}

impl DonationsApi {
    /// Wrap a shared backend client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DonationsPort for DonationsApi {
    async fn create(&self, credentials: &Credentials, donation: &NewDonation) -> Result<DonationIntent, Error> {
        Ok(self
            .client
            .send_data(Method::POST, &["donations"], credentials, Some(donation))
            .await?)
    }

    async fn list_mine(
        &self,
        credentials: &Credentials,
        query: &ListQuery<DonationFilters>,
    ) -> Result<Paginated<Donation>, Error> {
        Ok(self
            .client
            .get_page(&["donations", "me"], credentials, &query.query_pairs())
            .await?)
    }

    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<DonationFilters>,
    ) -> Result<Paginated<Donation>, Error> {
        Ok(self
            .client
            .get_page(&["donations"], credentials, &query.query_pairs())
            .await?)
    }

    async fn get(&self, credentials: &Credentials, id: &str) -> Result<Donation, Error> {
        Ok(self.client.get_data(&["donations", id], credentials, &[]).await?)
    }

    async fn receipt(&self, credentials: &Credentials, id: &str) -> Result<Option<Receipt>, Error> {
        Ok(self
            .client
            .get_optional(&["donations", id, "receipt"], credentials)
            .await?)
    }

    async fn annual_receipt(&self, credentials: &Credentials, year: i32) -> Result<Receipt, Error> {
        let body = AnnualReceiptRequest { year };
        Ok(self
            .client
            .send_data(
                Method::POST,
                &["donations", "receipts", "annual"],
                credentials,
                Some(&body),
            )
            .await?)
    }
}

#[cfg(test)]
mod tests {
    //! Donation calls against a mock backend.
    use super::*;
    use crate::domain::models::DonationStatus;
    use crate::domain::{AccessToken, Amount, ErrorCode};
    use httpmock::prelude::*;
    use reqwest::Url;
    use serde_json::json;
    use std::time::Duration;

    fn adapter(server: &MockServer) -> DonationsApi {
        let url = Url::parse(&server.base_url()).expect("mock URL");
        DonationsApi::new(ApiClient::new(&url, Duration::from_secs(2)).expect("client"))
    }

    fn member() -> Credentials {
        Credentials::Bearer(AccessToken::new("member").expect("token"))
    }

    #[tokio::test]
    async fn creates_pending_donation_with_client_secret() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/donations")
                    .json_body(json!({ "amount": "50", "isAnonymous": false }));
                then.status(201).json_body(json!({
                    "data": {
                        "clientSecret": "pi_secret",
                        "donation": {
                            "id": "d1",
                            "amount": "50",
                            "status": "PENDING",
                            "createdAt": "2024-05-02T08:00:00Z"
                        }
                    }
                }));
            })
            .await;

        let request = NewDonation {
            amount: "50".parse::<Amount>().expect("amount"),
            project_id: None,
            is_anonymous: false,
            message: None,
        };
        let intent = adapter(&server)
            .create(&member(), &request)
            .await
            .expect("intent");
        assert_eq!(intent.client_secret, "pi_secret");
        assert_eq!(intent.donation.status, DonationStatus::Pending);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn receipt_not_yet_issued_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/donations/d1/receipt");
                then.status(404);
            })
            .await;

        let receipt = adapter(&server)
            .receipt(&member(), "d1")
            .await
            .expect("no error");
        assert!(receipt.is_none());
    }

    #[tokio::test]
    async fn annual_receipt_sends_the_year() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/donations/receipts/annual")
                    .json_body(json!({ "year": 2023 }));
                then.status(404).json_body(json!({ "message": "No donations" }));
            })
            .await;

        let err = adapter(&server)
            .annual_receipt(&member(), 2023)
            .await
            .expect_err("no donations that year");
        assert_eq!(err.code(), ErrorCode::NotFound);
        mock.assert_async().await;
    }
}
