//! Shared reqwest client for the association backend.
//!
//! The client owns transport details only: URL building, credentials, trace
//! propagation, timeout and status mapping, and JSON decoding of the
//! `{ data }` and `{ data, meta }` envelopes.

use std::time::Duration;

use pagination::Paginated;
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::DataEnvelope;
use super::error::{ApiError, map_status_error, map_transport_error};
use crate::domain::{Credentials, TRACE_ID_HEADER, TraceId};

const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Backend client rooted at `<api_url>/api/v1`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    /// Build a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] when `api_url` cannot carry a
    /// path, and [`ApiError::Transport`] when the reqwest client cannot be
    /// constructed.
    pub fn new(api_url: &Url, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_transport_error)?;
        let mut base = api_url.clone();
        base.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl {
                url: api_url.to_string(),
            })?
            .pop_if_empty()
            .extend(API_PREFIX);
        Ok(Self { client, base })
    }

    /// Absolute URL of `segments` below the API prefix; each segment is
    /// percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str], credentials: &Credentials) -> RequestBuilder {
        let url = self.endpoint(segments);
        debug!(%method, %url, "backend request");
        let mut builder = self
            .client
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = credentials.token() {
            builder = builder.bearer_auth(token.expose());
        }
        if let Some(trace_id) = TraceId::current() {
            builder = builder.header(TRACE_ID_HEADER, trace_id.to_string());
        }
        builder
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<(StatusCode, Vec<u8>), ApiError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        Ok((status, body.to_vec()))
    }

    async fn expect_success(&self, builder: RequestBuilder) -> Result<Vec<u8>, ApiError> {
        let (status, body) = self.execute(builder).await?;
        if status.is_success() {
            return Ok(body);
        }
        let error = map_status_error(status, &body);
        if status.is_server_error() {
            warn!(status = status.as_u16(), error = %error, "backend call failed");
        } else {
            debug!(status = status.as_u16(), error = %error, "backend rejected call");
        }
        Err(error)
    }

    /// `GET` a singular resource.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failures, non-success statuses and
    /// bodies that do not decode as `{ data: T }`.
    pub async fn get_data<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        credentials: &Credentials,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::GET, segments, credentials).query(query);
        let body = self.expect_success(builder).await?;
        decode_data(&body)
    }

    /// `GET` a resource that may legitimately be absent; `404` yields `None`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::get_data`], except for `404`.
    pub async fn get_optional<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        credentials: &Credentials,
    ) -> Result<Option<T>, ApiError> {
        match self.get_data(segments, credentials, &[]).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.status() == Some(StatusCode::NOT_FOUND) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// `GET` one page of a collection.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failures, non-success statuses and
    /// bodies that do not decode as `{ data: T[], meta }`.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        credentials: &Credentials,
        query: &[(&str, String)],
    ) -> Result<Paginated<T>, ApiError> {
        let builder = self.request(Method::GET, segments, credentials).query(query);
        let body = self.expect_success(builder).await?;
        serde_json::from_slice(&body).map_err(|err| ApiError::decode(err.to_string()))
    }

    /// Send a JSON body and decode the `{ data: T }` answer.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failures, non-success statuses and
    /// undecodable answers.
    pub async fn send_data<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        credentials: &Credentials,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let mut builder = self.request(method, segments, credentials);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let body = self.expect_success(builder).await?;
        decode_data(&body)
    }

    /// Send an optional JSON body, ignoring the answer's content.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failures and non-success statuses.
    pub async fn send_empty<B>(
        &self,
        method: Method,
        segments: &[&str],
        credentials: &Credentials,
        body: Option<&B>,
    ) -> Result<(), ApiError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let mut builder = self.request(method, segments, credentials);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.expect_success(builder).await.map(|_| ())
    }
}

fn decode_data<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice::<DataEnvelope<T>>(body)
        .map(|envelope| envelope.data)
        .map_err(|err| ApiError::decode(err.to_string()))
}

/// Body placeholder for bodiless calls.
pub(crate) const NO_BODY: Option<&()> = None;
