//! The gateway's trusted view of the caller.

use serde::Serialize;

use super::claims::Claims;
use crate::AppError;

pub const MSG_MISSING_USER_ID: &str = "User ID not found in token";

/// Caller identity derived from verified claims.
///
/// Only constructed from a verified token; `id` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
}

impl Identity {
    /// Build an identity from verified claims.
    ///
    /// An empty id means the issuer and the gateway disagree on the token
    /// format, so it is a server fault rather than a client error.
    pub fn from_claims(claims: Claims) -> Result<Self, AppError> {
        if claims.id.is_empty() {
            return Err(AppError::internal(MSG_MISSING_USER_ID));
        }

        Ok(Self {
            id: claims.id,
            email: claims.email.filter(|email| !email.is_empty()),
            role: claims.role.filter(|role| !role.is_empty()),
        })
    }

    pub fn has_role_in(&self, roles: &[&str]) -> bool {
        self.role
            .as_deref()
            .is_some_and(|role| roles.contains(&role))
    }
}
