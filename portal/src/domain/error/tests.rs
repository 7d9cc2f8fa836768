//! Tests for error construction, field errors and trace propagation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn field_errors() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("amount".to_owned(), "must be positive".to_owned()),
        ("email".to_owned(), "already used".to_owned()),
    ])
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_falls_back_to_generic_message() {
    let err = Error::new(ErrorCode::NotFound, "");
    assert_eq!(err.message(), "not found");
}

#[rstest]
#[case(ErrorCode::Unauthorized, true)]
#[case(ErrorCode::Forbidden, true)]
#[case(ErrorCode::NotFound, false)]
#[case(ErrorCode::ServiceUnavailable, false)]
fn authorization_codes_are_flagged(#[case] code: ErrorCode, #[case] expected: bool) {
    assert_eq!(code.is_authorization(), expected);
}

#[rstest]
fn field_errors_round_trip(field_errors: BTreeMap<String, String>) {
    let err = Error::invalid_request("invalid").with_field_errors(field_errors.clone());
    assert_eq!(err.field_errors(), field_errors);
}

#[rstest]
fn field_errors_merge_with_existing_details(field_errors: BTreeMap<String, String>) {
    let err = Error::invalid_request("invalid")
        .with_details(json!({ "year": 2023 }))
        .with_field_errors(field_errors);
    let details = err.details().expect("details present");
    assert_eq!(details.get("year"), Some(&json!(2023)));
    assert_eq!(err.field_errors().len(), 2);
}

#[rstest]
fn empty_field_errors_leave_details_untouched() {
    let err = Error::invalid_request("invalid").with_field_errors(BTreeMap::new());
    assert!(err.details().is_none());
    assert!(err.field_errors().is_empty());
}

#[tokio::test]
async fn captures_trace_id_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid uuid");
    let err = TraceId::scope(trace_id, async { Error::internal("boom") }).await;
    assert_eq!(err.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn no_trace_id_out_of_scope() {
    assert!(Error::internal("boom").trace_id().is_none());
}
