//! Header rewriting for requests forwarded to backends.

use actix_web::http::header::HeaderMap as InboundHeaders;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::auth::Identity;
use crate::error::AppError;

pub const X_USER_ID: &str = "x-user-id";
pub const X_USER_EMAIL: &str = "x-user-email";
pub const X_USER_ROLE: &str = "x-user-role";
pub const X_REQUEST_ID: &str = "x-request-id";

pub const MSG_IDENTITY_REQUIRED: &str = "Authentication required for this route.";

/// Inbound headers never copied to a backend.
///
/// `host` must be the backend's own and `content-length` is recomputed from
/// the outgoing body. Trust headers are only ever set by the gateway.
const STRIPPED: &[&str] = &[
    "host",
    "content-length",
    // Hop-by-hop (RFC 9110 §7.6.1)
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    // Trust headers
    X_USER_ID,
    X_USER_EMAIL,
    X_USER_ROLE,
    X_REQUEST_ID,
];

fn is_stripped(name: &str) -> bool {
    STRIPPED.iter().any(|stripped| name.eq_ignore_ascii_case(stripped))
}

/// Build the header set sent to a backend.
///
/// When `requires_identity` is set, a missing identity is an error and
/// nothing should be forwarded.
pub fn outbound_headers(
    inbound: &InboundHeaders,
    requires_identity: bool,
    identity: Option<&Identity>,
    request_id: Option<&str>,
) -> Result<HeaderMap, AppError> {
    let identity = match (requires_identity, identity) {
        (true, None) => return Err(AppError::unauthorized(MSG_IDENTITY_REQUIRED)),
        (true, Some(identity)) => Some(identity),
        (false, _) => None,
    };

    let mut headers = HeaderMap::with_capacity(inbound.len() + 4);
    for (name, value) in inbound.iter() {
        if is_stripped(name.as_str()) {
            continue;
        }
        let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) else {
            continue;
        };
        headers.append(name, value);
    }

    if let Some(identity) = identity {
        let id = HeaderValue::from_str(&identity.id)
            .map_err(|_| AppError::internal("User ID cannot be forwarded as a header"))?;
        headers.insert(HeaderName::from_static(X_USER_ID), id);

        let optional = [
            (X_USER_EMAIL, identity.email.as_deref()),
            (X_USER_ROLE, identity.role.as_deref()),
        ];
        for (name, value) in optional {
            if let Some(value) = value.and_then(|v| HeaderValue::from_str(v).ok()) {
                headers.insert(HeaderName::from_static(name), value);
            }
        }
    }

    if let Some(value) = request_id.and_then(|id| HeaderValue::from_str(id).ok()) {
        headers.insert(HeaderName::from_static(X_REQUEST_ID), value);
    }

    Ok(headers)
}
