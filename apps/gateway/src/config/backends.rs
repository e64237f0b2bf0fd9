//! Downstream services the gateway forwards to.

use std::fmt;

use reqwest::Url;

use crate::error::AppError;

/// Identifies one of the gateway's backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendId {
    /// Authentication service (registration, login, sessions)
    Auth,
    /// Goals/task service
    Goals,
}

impl BackendId {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Goals => "goals",
        }
    }

    /// Environment variable holding this backend's base URL.
    pub const fn env_var(&self) -> &'static str {
        match self {
            Self::Auth => "AUTH_SERVICE_URL",
            Self::Goals => "GOAL_SERVICE_URL",
        }
    }
}

impl fmt::Display for BackendId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A backend and the base URL requests to it are built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backend {
    id: BackendId,
    base_url: String,
}

impl Backend {
    /// Validate `raw` as an absolute http(s) URL. A trailing `/` is dropped
    /// so upstream paths can be appended directly.
    pub fn new(id: BackendId, raw: &str) -> Result<Self, AppError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AppError::config(format!("{} must not be empty", id.env_var())));
        }

        let url = Url::parse(trimmed).map_err(|e| {
            AppError::config(format!(
                "{} must be a valid URL, got '{trimmed}': {e}",
                id.env_var()
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(AppError::config(format!(
                "{} must be an absolute http(s) URL, got '{trimmed}'",
                id.env_var()
            )));
        }

        Ok(Self {
            id,
            base_url: trimmed.trim_end_matches('/').to_string(),
        })
    }

    pub fn id(&self) -> BackendId {
        self.id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full upstream URL for `path`, with the raw query string appended verbatim.
    pub fn url_for(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(query) if !query.is_empty() => format!("{}{path}?{query}", self.base_url),
            _ => format!("{}{path}", self.base_url),
        }
    }
}

/// The complete set of backends, validated once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backends {
    pub auth: Backend,
    pub goals: Backend,
}

impl Backends {
    pub fn new(auth_url: &str, goals_url: &str) -> Result<Self, AppError> {
        Ok(Self {
            auth: Backend::new(BackendId::Auth, auth_url)?,
            goals: Backend::new(BackendId::Goals, goals_url)?,
        })
    }

    pub fn get(&self, id: BackendId) -> &Backend {
        match id {
            BackendId::Auth => &self.auth,
            BackendId::Goals => &self.goals,
        }
    }
}
