//! Single reporting entry point for failed backend calls.
//!
//! Every handler routes its port results through [`report`] with the policy
//! that fits the screen:
//!
//! - [`ReportPolicy::Silent`]: list views; the failure is logged and the
//!   view renders its empty state.
//! - [`ReportPolicy::Inline`]: forms and actions; the failure becomes a
//!   [`Banner`] with field errors when the backend returned some.
//! - [`ReportPolicy::Blocking`]: the page cannot render without the value;
//!   the error propagates and becomes an error page.
//!
//! Authorization failures bypass every policy and propagate, so they always
//! end in a redirect.

use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::domain::{Error, ErrorCode};

/// How a failure is surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportPolicy {
    /// Log and fall back to an empty state.
    Silent,
    /// Show an inline banner next to the form or list.
    Inline,
    /// Abort the page with an error response.
    Blocking,
}

/// Visual tone of a banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Failure.
    Error,
    /// Neutral notice, such as "not ready yet".
    Info,
    /// Confirmation after a successful action.
    Success,
}

impl Tone {
    /// CSS class suffix.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Info => "info",
            Self::Success => "success",
        }
    }
}

/// Message shown above a form or list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    /// Visual tone.
    pub tone: Tone,
    /// User-facing message.
    pub message: String,
    /// Field-level messages keyed by form field name.
    pub fields: BTreeMap<String, String>,
}

const UNAVAILABLE_MESSAGE: &str =
    "Le service est momentanément indisponible. Veuillez réessayer dans quelques instants.";
const INTERNAL_MESSAGE: &str = "Une erreur inattendue est survenue.";

/// User-facing text for `error`; internal details are never shown.
#[must_use]
pub fn user_message(error: &Error) -> String {
    match error.code() {
        ErrorCode::ServiceUnavailable => UNAVAILABLE_MESSAGE.to_owned(),
        ErrorCode::InternalError => INTERNAL_MESSAGE.to_owned(),
        _ => error.message().to_owned(),
    }
}

impl Banner {
    /// Informational banner.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::plain(Tone::Info, message)
    }

    /// Success banner.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::plain(Tone::Success, message)
    }

    /// Error banner without field errors.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::plain(Tone::Error, message)
    }

    fn plain(tone: Tone, message: impl Into<String>) -> Self {
        Self {
            tone,
            message: message.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Error banner carrying local validation messages.
    #[must_use]
    pub fn invalid(fields: BTreeMap<String, String>) -> Self {
        Self {
            tone: Tone::Error,
            message: "Le formulaire contient des erreurs.".to_owned(),
            fields,
        }
    }

    /// Field message for `name`, if any.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

impl From<&Error> for Banner {
    fn from(error: &Error) -> Self {
        Self {
            tone: Tone::Error,
            message: user_message(error),
            fields: error.field_errors(),
        }
    }
}

/// Outcome of [`report`] for non-propagated results.
#[derive(Debug, Clone, PartialEq)]
pub enum Reported<T> {
    /// The call succeeded.
    Ready(T),
    /// The failure was logged and swallowed.
    Empty,
    /// The failure should be shown inline.
    Inline(Banner),
}

impl<T> Reported<T> {
    /// Value, if the call succeeded.
    pub fn ready(self) -> Option<T> {
        match self {
            Self::Ready(value) => Some(value),
            Self::Empty | Self::Inline(_) => None,
        }
    }
}

/// Route `result` through `policy`.
///
/// # Errors
///
/// Returns the error unchanged for [`ReportPolicy::Blocking`] and for
/// authorization failures under any policy.
///
/// # Examples
/// ```
/// use portal::domain::Error;
/// use portal::inbound::http::report::{report, ReportPolicy, Reported};
///
/// let outcome = report::<u8>(Err(Error::service_unavailable("down")), ReportPolicy::Silent);
/// assert!(matches!(outcome, Ok(Reported::Empty)));
///
/// let outcome = report::<u8>(Err(Error::unauthorized("expired")), ReportPolicy::Silent);
/// assert!(outcome.is_err());
/// ```
pub fn report<T>(result: Result<T, Error>, policy: ReportPolicy) -> Result<Reported<T>, Error> {
    let error = match result {
        Ok(value) => return Ok(Reported::Ready(value)),
        Err(error) => error,
    };
    if error.code().is_authorization() {
        return Err(error);
    }
    match policy {
        ReportPolicy::Blocking => Err(error),
        ReportPolicy::Silent => {
            warn!(
                code = error.code().as_str(),
                message = error.message(),
                "backend call failed; rendering empty state"
            );
            Ok(Reported::Empty)
        }
        ReportPolicy::Inline => {
            info!(
                code = error.code().as_str(),
                message = error.message(),
                "backend call rejected; reporting inline"
            );
            Ok(Reported::Inline(Banner::from(&error)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ReportPolicy::Silent)]
    #[case(ReportPolicy::Inline)]
    #[case(ReportPolicy::Blocking)]
    fn authorization_failures_always_propagate(#[case] policy: ReportPolicy) {
        for error in [Error::unauthorized("expired"), Error::forbidden("admins only")] {
            assert!(report::<()>(Err(error), policy).is_err());
        }
    }

    #[rstest]
    fn inline_reports_carry_field_errors() {
        let error = Error::invalid_request("Validation failed").with_field_errors(
            [("amount".to_owned(), "must be positive".to_owned())].into(),
        );
        let Ok(Reported::Inline(banner)) = report::<()>(Err(error), ReportPolicy::Inline) else {
            panic!("expected an inline banner");
        };
        assert_eq!(banner.message, "Validation failed");
        assert_eq!(banner.field("amount"), Some("must be positive"));
    }

    #[rstest]
    fn internal_messages_are_redacted() {
        let banner = Banner::from(&Error::internal("db pool exhausted at 10.0.0.3"));
        assert_eq!(banner.message, INTERNAL_MESSAGE);
    }

    #[rstest]
    fn blocking_propagates_not_found() {
        let outcome = report::<()>(Err(Error::not_found("missing")), ReportPolicy::Blocking);
        assert!(outcome.is_err());
    }
}
