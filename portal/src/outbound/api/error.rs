//! Backend call failures and their translation into domain errors.

use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde_json::Value;

use super::dto::ErrorBodyDto;
use crate::domain::{Error, ErrorCode};

/// Failure of one backend call.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The configured base URL cannot carry path segments.
    #[error("backend URL cannot be used as a base: {url}")]
    InvalidBaseUrl {
        /// Offending URL.
        url: String,
    },
    /// No response within the client timeout.
    #[error("backend request timed out: {message}")]
    Timeout {
        /// Transport diagnostic.
        message: String,
    },
    /// Connection-level failure.
    #[error("backend unreachable: {message}")]
    Transport {
        /// Transport diagnostic.
        message: String,
    },
    /// Non-success HTTP status.
    #[error("backend answered {status}: {message}")]
    Status {
        /// HTTP status.
        status: StatusCode,
        /// Message from the body, or a body preview.
        message: String,
        /// Field-level validation messages.
        fields: BTreeMap<String, String>,
        /// Structured details from the body.
        details: Option<Value>,
    },
    /// Success status with a body that does not match the expected shape.
    #[error("undecodable backend response: {message}")]
    Decode {
        /// Decoder diagnostic.
        message: String,
    },
}

impl ApiError {
    /// HTTP status, when the backend answered.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(super) fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

pub(super) fn map_transport_error(error: reqwest::Error) -> ApiError {
    if error.is_timeout() {
        ApiError::Timeout {
            message: error.to_string(),
        }
    } else {
        ApiError::Transport {
            message: error.to_string(),
        }
    }
}

pub(super) fn map_status_error(status: StatusCode, body: &[u8]) -> ApiError {
    let parsed: ErrorBodyDto = serde_json::from_slice(body).unwrap_or_default();
    let message = parsed.message().unwrap_or_else(|| {
        let preview = body_preview(body);
        if preview.is_empty() {
            format!("status {}", status.as_u16())
        } else {
            preview
        }
    });
    ApiError::Status {
        status,
        message,
        fields: parsed.field_errors(),
        details: parsed.details,
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

fn code_for_status(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorCode::InvalidRequest,
        StatusCode::UNAUTHORIZED => ErrorCode::Unauthorized,
        StatusCode::FORBIDDEN => ErrorCode::Forbidden,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::CONFLICT => ErrorCode::Conflict,
        StatusCode::REQUEST_TIMEOUT | StatusCode::TOO_MANY_REQUESTS => {
            ErrorCode::ServiceUnavailable
        }
        _ if status.is_server_error() => ErrorCode::ServiceUnavailable,
        _ if status.is_client_error() => ErrorCode::InvalidRequest,
        _ => ErrorCode::InternalError,
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Timeout { message } | ApiError::Transport { message } => {
                Error::service_unavailable(message)
            }
            ApiError::Status {
                status,
                message,
                fields,
                details,
            } => {
                let mut error = Error::new(code_for_status(status), message);
                if let Some(details) = details {
                    error = error.with_details(details);
                }
                error.with_field_errors(fields)
            }
            ApiError::InvalidBaseUrl { .. } | ApiError::Decode { .. } => {
                Error::internal(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for status and body mapping.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::bad_request(StatusCode::BAD_REQUEST, ErrorCode::InvalidRequest)]
    #[case::unprocessable(StatusCode::UNPROCESSABLE_ENTITY, ErrorCode::InvalidRequest)]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized)]
    #[case::forbidden(StatusCode::FORBIDDEN, ErrorCode::Forbidden)]
    #[case::not_found(StatusCode::NOT_FOUND, ErrorCode::NotFound)]
    #[case::conflict(StatusCode::CONFLICT, ErrorCode::Conflict)]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, ErrorCode::ServiceUnavailable)]
    #[case::server_error(StatusCode::BAD_GATEWAY, ErrorCode::ServiceUnavailable)]
    #[case::teapot(StatusCode::IM_A_TEAPOT, ErrorCode::InvalidRequest)]
    fn maps_statuses_to_domain_codes(#[case] status: StatusCode, #[case] expected: ErrorCode) {
        let error: Error = map_status_error(status, b"{}").into();
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn validation_fields_survive_translation() {
        let body = br#"{"message":"Validation failed","fields":{"amount":"must be positive"}}"#;
        let error: Error = map_status_error(StatusCode::UNPROCESSABLE_ENTITY, body).into();
        assert_eq!(error.message(), "Validation failed");
        assert_eq!(
            error.field_errors().get("amount").map(String::as_str),
            Some("must be positive")
        );
    }

    #[rstest]
    fn non_json_bodies_fall_back_to_preview() {
        let error = map_status_error(StatusCode::BAD_GATEWAY, b"<html>  upstream   down </html>");
        assert!(matches!(
            error,
            ApiError::Status { ref message, .. } if message == "<html> upstream down </html>"
        ));
    }

    #[rstest]
    fn empty_bodies_name_the_status() {
        let error = map_status_error(StatusCode::SERVICE_UNAVAILABLE, b"");
        assert!(matches!(
            error,
            ApiError::Status { ref message, .. } if message == "status 503"
        ));
    }

    #[rstest]
    fn decode_failures_are_internal() {
        let error: Error = ApiError::decode("missing field `data`").into();
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
