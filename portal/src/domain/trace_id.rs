//! Correlation identifier shared by a page request and its backend calls.
//!
//! The `Trace` middleware puts one [`TraceId`] in task-local scope for each
//! browser request. Error pages print it, the `trace-id` response header
//! echoes it, and `ApiClient` forwards it on every call to the association
//! backend so both sides log the same value. An identifier set by a reverse
//! proxy in front of the portal is kept when it parses as a UUID.
//!
//! Task-locals do not cross `tokio::spawn`; wrap spawned work in
//! [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static TRACE_ID: TraceId;
}

/// Header carrying the identifier, inbound from a proxy and outbound to the
/// browser and the backend.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Identifier of one portal request.
///
/// # Examples
/// ```
/// use portal::TraceId;
///
/// async fn render() {
///     if let Some(id) = TraceId::current() {
///         tracing::info!(trace_id = %id, "rendering page");
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Fresh random identifier.
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Identifier supplied upstream in a `trace-id` header.
    ///
    /// Blank, malformed and nil values are ignored so the caller generates
    /// its own.
    ///
    /// # Examples
    /// ```
    /// use portal::TraceId;
    ///
    /// assert!(TraceId::from_header(" 6f1c2f7e-4c1a-4f57-9a53-2d7d2f0c9b11 ").is_some());
    /// assert!(TraceId::from_header("req-42").is_none());
    /// ```
    #[must_use]
    pub fn from_header(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim())
            .ok()
            .filter(|uuid| !uuid.is_nil())
            .map(Self)
    }

    /// Identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    ///
    /// # Examples
    /// ```
    /// use portal::TraceId;
    ///
    /// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
    /// let trace_id: TraceId = "6f1c2f7e-4c1a-4f57-9a53-2d7d2f0c9b11".parse().expect("uuid");
    /// let seen = TraceId::scope(trace_id, async { TraceId::current() }).await;
    /// assert_eq!(seen, Some(trace_id));
    /// # });
    /// ```
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[tokio::test]
    async fn scope_exposes_the_identifier_to_nested_calls() {
        let expected = TraceId::generate();
        let seen = TraceId::scope(expected, async {
            tokio::task::yield_now().await;
            TraceId::current()
        })
        .await;
        assert_eq!(seen, Some(expected));
    }

    #[tokio::test]
    async fn nothing_is_in_scope_outside_a_request() {
        assert!(TraceId::current().is_none());
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("req-42")]
    #[case("00000000-0000-0000-0000-000000000000")]
    fn unusable_upstream_values_are_ignored(#[case] raw: &str) {
        assert!(TraceId::from_header(raw).is_none());
    }

    #[rstest]
    fn upstream_values_keep_their_uuid() {
        let id = TraceId::from_header("6F1C2F7E-4C1A-4F57-9A53-2D7D2F0C9B11").expect("uuid");
        assert_eq!(id.to_string(), "6f1c2f7e-4c1a-4f57-9a53-2d7d2f0c9b11");
    }
}
