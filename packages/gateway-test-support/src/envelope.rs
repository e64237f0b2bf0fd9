//! Error envelope test helpers
//!
//! Assertions for the gateway's uniform `{"status":"error","message":...}`
//! error contract, without depending on gateway types.

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::header::{HeaderMap, CONTENT_TYPE};
use actix_web::http::StatusCode;
use serde::Deserialize;

/// Local mirror of the gateway's error envelope.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ErrorEnvelopeLike {
    pub status: String,
    pub message: String,
}

/// Assert that a raw status/headers/body triple is a gateway error envelope.
///
/// Returns the parsed envelope so callers can make further assertions.
pub fn assert_envelope_from_parts(
    status: StatusCode,
    headers: &HeaderMap,
    body: &[u8],
    expected_status: StatusCode,
    expected_message: &str,
) -> ErrorEnvelopeLike {
    assert_eq!(status, expected_status, "unexpected HTTP status");

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(
        content_type.starts_with("application/json"),
        "Content-Type must be application/json (got {content_type})"
    );

    let trace_id = headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(!trace_id.is_empty(), "x-trace-id header should be present");

    let envelope: ErrorEnvelopeLike = serde_json::from_slice(body).unwrap_or_else(|e| {
        panic!(
            "body is not an error envelope ({e}): {}",
            String::from_utf8_lossy(body)
        )
    });

    assert_eq!(envelope.status, "error");
    assert_eq!(envelope.message, expected_message);
    envelope
}

/// Assert that a `ServiceResponse` is a gateway error envelope.
pub async fn assert_error_envelope<B>(
    resp: ServiceResponse<B>,
    expected_status: StatusCode,
    expected_message: &str,
) -> ErrorEnvelopeLike
where
    B: MessageBody,
{
    let status = resp.status();
    let headers = resp.headers().clone();
    let body = actix_web::test::read_body(resp).await;

    assert_envelope_from_parts(status, &headers, &body, expected_status, expected_message)
}
