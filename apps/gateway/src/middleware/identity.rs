//! Bearer token authentication and role gating.
//!
//! These run inside the dispatcher rather than as a `Transform` because
//! whether a request needs an identity is only known after route resolution.

use actix_web::http::header::{HeaderMap, AUTHORIZATION};
use tracing::debug;

use crate::auth::{verify_access_token, Identity, VerificationError};
use crate::error::AppError;
use crate::state::security_config::SecurityConfig;

pub const MSG_TOKEN_MALFORMED: &str = "Authorization token required or malformed.";
pub const MSG_TOKEN_MISSING: &str = "Authorization token is missing.";
pub const MSG_TOKEN_REJECTED: &str = "Invalid or expired token.";
pub const MSG_VERIFICATION_FAILED: &str = "Failed to verify token due to an internal error.";
pub const MSG_NO_IDENTITY: &str = "Unauthorized: No user information found on request.";
pub const MSG_FORBIDDEN: &str = "Forbidden: Insufficient permissions.";

const BEARER_PREFIX: &str = "Bearer ";

impl From<VerificationError> for AppError {
    fn from(err: VerificationError) -> Self {
        match err {
            VerificationError::TokenExpired | VerificationError::TokenInvalid => {
                AppError::unauthorized(MSG_TOKEN_REJECTED)
            }
            VerificationError::InternalVerificationFailure(_) => {
                AppError::internal(MSG_VERIFICATION_FAILED)
            }
        }
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// The token is the first space-delimited segment after the prefix, so
/// `"Bearer "` and `"Bearer  x"` both yield an empty token.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized(MSG_TOKEN_MALFORMED))?;

    let rest = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or_else(|| AppError::unauthorized(MSG_TOKEN_MALFORMED))?;

    match rest.split(' ').next() {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(AppError::unauthorized(MSG_TOKEN_MISSING)),
    }
}

/// Verify the request's bearer token and derive the caller's identity.
pub fn authenticate(headers: &HeaderMap, security: &SecurityConfig) -> Result<Identity, AppError> {
    let token = extract_bearer(headers)?;

    let claims = verify_access_token(token, security).map_err(|e| {
        debug!(reason = %e, "token rejected");
        AppError::from(e)
    })?;

    Identity::from_claims(claims)
}

/// Check the caller's role against a route's permitted roles.
///
/// An empty `allowed_roles` places no restriction on the route.
pub fn authorize(identity: Option<&Identity>, allowed_roles: &[&str]) -> Result<(), AppError> {
    if allowed_roles.is_empty() {
        return Ok(());
    }

    let identity = identity.ok_or_else(|| AppError::unauthorized(MSG_NO_IDENTITY))?;
    if identity.has_role_in(allowed_roles) {
        Ok(())
    } else {
        debug!(user_id = %identity.id, role = ?identity.role, "role not permitted");
        Err(AppError::forbidden(MSG_FORBIDDEN))
    }
}
