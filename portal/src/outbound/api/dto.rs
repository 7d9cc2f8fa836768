//! Transport DTOs for backend envelopes and error bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::SessionPayload;

/// `{ data: T }` envelope of singular endpoints.
#[derive(Debug, Deserialize)]
pub(super) struct DataEnvelope<T> {
    pub(super) data: T,
}

/// Error body shapes the backend is known to emit.
///
/// Validation failures arrive either as a `fields` map, an `errors` list, or
/// a list of messages.
#[derive(Debug, Default, Deserialize)]
pub(super) struct ErrorBodyDto {
    #[serde(default)]
    pub(super) message: Option<MessageDto>,
    #[serde(default)]
    pub(super) error: Option<Value>,
    #[serde(default)]
    pub(super) fields: BTreeMap<String, String>,
    #[serde(default)]
    pub(super) errors: Vec<FieldErrorDto>,
    #[serde(default)]
    pub(super) details: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum MessageDto {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
pub(super) struct FieldErrorDto {
    pub(super) field: String,
    pub(super) message: String,
}

impl ErrorBodyDto {
    /// Human-readable message, if the body carries one.
    pub(super) fn message(&self) -> Option<String> {
        let from_message = match &self.message {
            Some(MessageDto::One(text)) => Some(text.clone()),
            Some(MessageDto::Many(lines)) if !lines.is_empty() => Some(lines.join("; ")),
            Some(MessageDto::Many(_)) | None => None,
        };
        from_message
            .or_else(|| match &self.error {
                Some(Value::String(text)) => Some(text.clone()),
                Some(Value::Object(map)) => map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
                _ => None,
            })
            .filter(|text| !text.trim().is_empty())
    }

    /// Field-level validation messages from whichever shape was used.
    pub(super) fn field_errors(&self) -> BTreeMap<String, String> {
        let mut fields = self.fields.clone();
        for entry in &self.errors {
            fields
                .entry(entry.field.clone())
                .or_insert_with(|| entry.message.clone());
        }
        if let Some(nested) = self
            .details
            .as_ref()
            .and_then(|details| details.get("fields"))
            .and_then(Value::as_object)
        {
            for (name, message) in nested {
                if let Some(text) = message.as_str() {
                    fields.entry(name.clone()).or_insert_with(|| text.to_owned());
                }
            }
        }
        fields
    }
}

/// Body of `POST /auth/signin`.
#[derive(Debug, Serialize)]
pub(super) struct SignInBody<'a> {
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

/// Body of `POST /auth/signup`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SignUpBody<'a> {
    pub(super) first_name: &'a str,
    pub(super) last_name: &'a str,
    pub(super) email: &'a str,
    pub(super) password: &'a str,
}

/// Body of `POST /auth/password-reset`.
#[derive(Debug, Serialize)]
pub(super) struct PasswordResetBody<'a> {
    pub(super) email: &'a str,
}

/// Session opened by sign-in or sign-up.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SignedInDto {
    pub(super) access_token: String,
    pub(super) user: SessionPayload,
}
