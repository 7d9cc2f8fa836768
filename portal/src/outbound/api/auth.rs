//! Auth recipe adapter.

use async_trait::async_trait;
use reqwest::{Method, StatusCode};

use super::client::{ApiClient, NO_BODY};
use super::dto::{PasswordResetBody, SignInBody, SignUpBody, SignedInDto};
use super::error::ApiError;
use crate::domain::ports::AuthGateway;
use crate::domain::{
    AccessToken, Credentials, Error, LoginCredentials, Registration, SessionPayload, SignedIn,
};

/// [`AuthGateway`] backed by the backend's `/auth` endpoints.
#[derive(Debug, Clone)]
pub struct AuthApi {
    client: ApiClient,
}

impl AuthApi {
    /// Wrap a shared backend client.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

fn into_signed_in(dto: SignedInDto) -> Result<SignedIn, Error> {
    let token = AccessToken::new(dto.access_token)
        .ok_or_else(|| Error::from(ApiError::decode("auth recipe returned a blank token")))?;
    Ok(SignedIn {
        token,
        session: dto.user,
    })
}

#[async_trait]
impl AuthGateway for AuthApi {
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<SignedIn, Error> {
        let body = SignInBody {
            email: credentials.email(),
            password: credentials.password(),
        };
        let dto: SignedInDto = self
            .client
            .send_data(Method::POST, &["auth", "signin"], &Credentials::Anonymous, Some(&body))
            .await?;
        into_signed_in(dto)
    }

    async fn sign_up(&self, registration: &Registration) -> Result<SignedIn, Error> {
        let credentials = registration.credentials();
        let body = SignUpBody {
            first_name: registration.first_name(),
            last_name: registration.last_name(),
            email: credentials.email(),
            password: credentials.password(),
        };
        let dto: SignedInDto = self
            .client
            .send_data(Method::POST, &["auth", "signup"], &Credentials::Anonymous, Some(&body))
            .await?;
        into_signed_in(dto)
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), Error> {
        let credentials = Credentials::Bearer(token.clone());
        match self
            .client
            .send_empty(Method::POST, &["auth", "signout"], &credentials, NO_BODY)
            .await
        {
            Ok(()) => Ok(()),
            // Already revoked or expired.
            Err(err) if err.status() == Some(StatusCode::UNAUTHORIZED) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }

    async fn session(&self, token: &AccessToken) -> Result<Option<SessionPayload>, Error> {
        let credentials = Credentials::Bearer(token.clone());
        match self
            .client
            .get_data(&["auth", "session"], &credentials, &[])
            .await
        {
            Ok(payload) => Ok(Some(payload)),
            Err(err)
                if matches!(
                    err.status(),
                    Some(StatusCode::UNAUTHORIZED | StatusCode::NOT_FOUND)
                ) =>
            {
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), Error> {
        let body = PasswordResetBody { email };
        match self
            .client
            .send_empty(
                Method::POST,
                &["auth", "password-reset"],
                &Credentials::Anonymous,
                Some(&body),
            )
            .await
        {
            Ok(()) => Ok(()),
            // Unknown accounts are not disclosed.
            Err(err) if err.status() == Some(StatusCode::NOT_FOUND) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Auth recipe exchanges against a mock backend.
    use super::*;
    use crate::domain::{ErrorCode, Role};
    use httpmock::prelude::*;
    use reqwest::Url;
    use rstest::rstest;
    use serde_json::json;
    use std::time::Duration;

    fn adapter(server: &MockServer) -> AuthApi {
        let url = Url::parse(&server.base_url()).expect("mock URL");
        AuthApi::new(ApiClient::new(&url, Duration::from_secs(2)).expect("client"))
    }

    fn token() -> AccessToken {
        AccessToken::new("tok").expect("token")
    }

    #[tokio::test]
    async fn sign_in_returns_token_and_payload() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/auth/signin")
                    .json_body(json!({ "email": "ada@example.org", "password": "pw" }));
                then.status(200).json_body(json!({
                    "data": {
                        "accessToken": "tok",
                        "user": { "userId": "u1", "email": "ada@example.org", "role": "ADMIN" }
                    }
                }));
            })
            .await;

        let creds = LoginCredentials::try_from_parts("ada@example.org", "pw").expect("creds");
        let signed_in = adapter(&server).sign_in(&creds).await.expect("signed in");
        assert_eq!(signed_in.token.expose(), "tok");
        assert_eq!(signed_in.session.role, Role::Admin);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/auth/signin");
                then.status(401).json_body(json!({ "message": "Wrong credentials" }));
            })
            .await;

        let creds = LoginCredentials::try_from_parts("ada@example.org", "nope").expect("creds");
        let err = adapter(&server).sign_in(&creds).await.expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case(401)]
    #[case(404)]
    #[tokio::test]
    async fn invalid_sessions_are_none(#[case] status: u16) {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/auth/session")
                    .header("authorization", "Bearer tok");
                then.status(status);
            })
            .await;

        let session = adapter(&server).session(&token()).await.expect("no error");
        assert!(session.is_none());
    }

    #[tokio::test]
    async fn unreachable_recipe_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/auth/session");
                then.status(503);
            })
            .await;

        let err = adapter(&server).session(&token()).await.expect_err("503");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn password_reset_hides_unknown_accounts() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/auth/password-reset")
                    .json_body(json!({ "email": "ghost@example.org" }));
                then.status(404);
            })
            .await;

        adapter(&server)
            .request_password_reset("ghost@example.org")
            .await
            .expect("404 is swallowed");
    }
}
