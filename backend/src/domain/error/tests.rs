//! Serialisation and constructor coverage for the domain error payload.

use rstest::rstest;
use serde_json::json;

use super::{Error, ErrorCode};

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no identity"), ErrorCode::Unauthorized)]
#[case(Error::forbidden("denied"), ErrorCode::Forbidden)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::conflict("already canceled"), ErrorCode::Conflict)]
#[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_codes(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[test]
fn display_shows_message() {
    let err = Error::conflict("already canceled");
    assert_eq!(err.to_string(), "already canceled");
}

#[test]
fn serialises_snake_case_code_and_omits_empty_details() {
    let err = Error::not_found("order not found");
    let value = serde_json::to_value(&err).expect("error serialises");
    assert_eq!(
        value,
        json!({ "code": "not_found", "message": "order not found" })
    );
}

#[test]
fn details_round_trip() {
    let err = Error::invalid_request("bad field").with_details(json!({ "field": "status" }));
    let value = serde_json::to_value(&err).expect("error serialises");
    let decoded: Error = serde_json::from_value(value).expect("error deserialises");
    assert_eq!(decoded, err);
    assert_eq!(
        decoded.details().and_then(|d| d.get("field")),
        Some(&json!("status"))
    );
}
