//! Classification of forwarding failures.
//!
//! A backend that answered with any status is not a failure; only transport
//! problems end up here.

use thiserror::Error;

use crate::config::BackendId;
use crate::error::AppError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForwardError {
    /// No connection could be established (backend down, refused, unresolvable)
    #[error("{backend} backend unreachable: {detail}")]
    ServiceUnavailable { backend: BackendId, detail: String },
    /// Any other transport or internal failure while forwarding
    #[error("forwarding to {backend} backend failed: {detail}")]
    InternalForwardingFailure { backend: BackendId, detail: String },
}

impl ForwardError {
    pub fn backend(&self) -> BackendId {
        match self {
            Self::ServiceUnavailable { backend, .. }
            | Self::InternalForwardingFailure { backend, .. } => *backend,
        }
    }

    /// Classify a reqwest transport error.
    pub fn from_transport(backend: BackendId, err: &reqwest::Error) -> Self {
        let detail = err.to_string();
        if err.is_connect() || err.is_timeout() {
            Self::ServiceUnavailable { backend, detail }
        } else {
            Self::InternalForwardingFailure { backend, detail }
        }
    }
}

pub fn unavailable_message(backend: BackendId) -> &'static str {
    match backend {
        BackendId::Auth => "Auth service is currently unavailable.",
        BackendId::Goals => "Goal service is currently unavailable.",
    }
}

pub fn failure_message(backend: BackendId) -> &'static str {
    match backend {
        BackendId::Auth => "Failed to connect to authentication service.",
        BackendId::Goals => "Failed to connect to goal service.",
    }
}

impl From<ForwardError> for AppError {
    fn from(err: ForwardError) -> Self {
        match err {
            ForwardError::ServiceUnavailable { backend, .. } => {
                AppError::service_unavailable(unavailable_message(backend))
            }
            ForwardError::InternalForwardingFailure { backend, .. } => {
                AppError::internal(failure_message(backend))
            }
        }
    }
}
