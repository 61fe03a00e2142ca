#![allow(dead_code)]

// tests/common/mod.rs
use actix_web::body::BoxBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use backend_test_support::problem_details::{
    assert_problem_details_from_service_response, ProblemDetailsLike,
};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Problem-details assertion plus the header rules from `src/error.rs`:
/// - 401: `WWW-Authenticate: Bearer`, no `Retry-After`
/// - 503: `Retry-After`, no `WWW-Authenticate`
/// - 400/404/409: neither header
pub async fn assert_problem(
    resp: ServiceResponse<BoxBody>,
    expected_status: StatusCode,
    expected_code: &str,
) -> ProblemDetailsLike {
    let headers = resp.headers().clone();

    match expected_status.as_u16() {
        401 => {
            let www_auth = headers
                .get("WWW-Authenticate")
                .expect("401 responses must have WWW-Authenticate");
            assert_eq!(www_auth.to_str().unwrap(), "Bearer");
            assert!(headers.get("Retry-After").is_none());
        }
        503 => {
            assert!(headers.get("Retry-After").is_some());
            assert!(headers.get("WWW-Authenticate").is_none());
        }
        400 | 404 | 409 => {
            assert!(
                headers.get("WWW-Authenticate").is_none(),
                "{expected_status} responses must not have WWW-Authenticate"
            );
            assert!(
                headers.get("Retry-After").is_none(),
                "{expected_status} responses must not have Retry-After"
            );
        }
        _ => {}
    }

    assert_problem_details_from_service_response(resp, expected_code, expected_status, None).await
}
