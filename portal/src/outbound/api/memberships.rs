//! Memberships and account administration adapters.

use async_trait::async_trait;
use pagination::Paginated;
use reqwest::Method;

use super::client::{ApiClient, NO_BODY};
use crate::domain::models::{
    Membership, MembershipFilters, MembershipStatus, MembershipStatusChange, MembershipType,
    NewMembership, RoleChange, User, UserFilters,
};
use crate::domain::ports::{MembershipsPort, UsersPort};
use crate::domain::{Credentials, Error, ListQuery, Role};

/// [`MembershipsPort`] backed by `/memberships` and `/membership-types`.
#[derive(Debug, Clone)]
pub struct MembershipsApi {
    client: ApiClient,
}

impl MembershipsApi {
    /// Wrap a shared backend client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MembershipsPort for MembershipsApi {
    async fn types(&self, credentials: &Credentials) -> Result<Vec<MembershipType>, Error> {
        Ok(self
            .client
            .get_data(&["membership-types"], credentials, &[])
            .await?)
    }

    async fn create(&self, credentials: &Credentials, request: &NewMembership) -> Result<Membership, Error> {
        Ok(self
            .client
            .send_data(Method::POST, &["memberships"], credentials, Some(request))
            .await?)
    }

    async fn mine(&self, credentials: &Credentials) -> Result<Option<Membership>, Error> {
        Ok(self
            .client
            .get_optional(&["memberships", "me"], credentials)
            .await?)
    }

    async fn renew(&self, credentials: &Credentials, id: &str) -> Result<Membership, Error> {
        Ok(self
            .client
            .send_data(Method::POST, &["memberships", id, "renew"], credentials, NO_BODY)
            .await?)
    }

    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<MembershipFilters>,
    ) -> Result<Paginated<Membership>, Error> {
        Ok(self
            .client
            .get_page(&["memberships"], credentials, &query.query_pairs())
            .await?)
    }

    async fn change_status(
        &self,
        credentials: &Credentials,
        id: &str,
        status: MembershipStatus,
    ) -> Result<Membership, Error> {
        let body = MembershipStatusChange { status };
        Ok(self
            .client
            .send_data(Method::PATCH, &["memberships", id, "status"], credentials, Some(&body))
            .await?)
    }
}

/// [`UsersPort`] backed by `/users`.
#[derive(Debug, Clone)]
pub struct UsersApi {
    client: ApiClient,
}

impl UsersApi {
    /// Wrap a shared backend client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UsersPort for UsersApi {
    async fn list(
        &self,
        credentials: &Credentials,
        query: &ListQuery<UserFilters>,
    ) -> Result<Paginated<User>, Error> {
        Ok(self
            .client
            .get_page(&["users"], credentials, &query.query_pairs())
            .await?)
    }

    async fn change_role(&self, credentials: &Credentials, id: &str, role: Role) -> Result<User, Error> {
        let body = RoleChange { role };
        Ok(self
            .client
            .send_data(Method::PATCH, &["users", id, "role"], credentials, Some(&body))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AccessToken;
    use httpmock::prelude::*;
    use reqwest::Url;
    use serde_json::json;
    use std::time::Duration;

    fn client(server: &MockServer) -> ApiClient {
        let url = Url::parse(&server.base_url()).expect("mock URL");
        ApiClient::new(&url, Duration::from_secs(2)).expect("client")
    }

    fn admin() -> Credentials {
        Credentials::Bearer(AccessToken::new("admin").expect("token"))
    }

    #[tokio::test]
    async fn missing_membership_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/memberships/me");
                then.status(404).json_body(json!({ "message": "No membership" }));
            })
            .await;

        let membership = MembershipsApi::new(client(&server))
            .mine(&admin())
            .await
            .expect("no error");
        assert!(membership.is_none());
    }

    #[tokio::test]
    async fn membership_decodes_number_and_dates() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/memberships/me");
                then.status(200).json_body(json!({
                    "data": {
                        "id": "m1",
                        "memberNumber": "NS-2024-0042",
                        "status": "ACTIVE",
                        "startDate": "2024-01-15",
                        "endDate": "2025-01-15T00:00:00Z"
                    }
                }));
            })
            .await;

        let membership = MembershipsApi::new(client(&server))
            .mine(&admin())
            .await
            .expect("membership")
            .expect("present");
        assert_eq!(membership.member_number.as_deref(), Some("NS-2024-0042"));
        assert!(membership.start_date.is_some());
        assert!(membership.end_date.is_some());
    }

    #[tokio::test]
    async fn status_change_patches_wire_value() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/api/v1/memberships/m1/status")
                    .json_body(json!({ "status": "REJECTED" }));
                then.status(200)
                    .json_body(json!({ "data": { "id": "m1", "status": "REJECTED" } }));
            })
            .await;

        let membership = MembershipsApi::new(client(&server))
            .change_status(&admin(), "m1", MembershipStatus::Rejected)
            .await
            .expect("changed");
        assert_eq!(membership.status, MembershipStatus::Rejected);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn role_change_patches_wire_value() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(PATCH)
                    .path("/api/v1/users/u1/role")
                    .json_body(json!({ "role": "VOLUNTEER" }));
                then.status(200).json_body(json!({
                    "data": { "id": "u1", "email": "ada@example.org", "role": "VOLUNTEER" }
                }));
            })
            .await;

        let user = UsersApi::new(client(&server))
            .change_role(&admin(), "u1", Role::Volunteer)
            .await
            .expect("changed");
        assert_eq!(user.full_name(), "ada@example.org");
        mock.assert_async().await;
    }
}
