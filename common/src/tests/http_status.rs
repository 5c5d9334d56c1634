use crate::HttpStatusCode;

#[test]
fn given_2xx_codes_when_classified_then_success() {
    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(204).is_success());
    assert!(!HttpStatusCode(301).is_success());
    assert!(!HttpStatusCode(404).is_success());
}

/// **VALUE**: Verifies the ranges used to tell client from server failures.
///
/// **WHY THIS MATTERS**: The remote adapter treats a 404 on delete as an idempotent
/// success; everything else non-2xx becomes a server error envelope.
#[test]
fn given_error_codes_when_classified_then_ranges_are_disjoint() {
    let not_found = HttpStatusCode::NOT_FOUND;
    assert!(not_found.is_client_error());
    assert!(not_found.is_not_found());
    assert!(!not_found.is_server_error());

    let internal = HttpStatusCode::INTERNAL_SERVER_ERROR;
    assert!(internal.is_server_error());
    assert!(!internal.is_client_error());
}

#[test]
fn given_status_when_converted_to_error_code_then_value_is_preserved() {
    assert_eq!(HttpStatusCode::from(422).as_error_code(), 422);
    assert_eq!(HttpStatusCode(503).to_string(), "503");
}
